//! Empirical distribution and quantile-quantile statistics.

use crate::data::DataFrame;
use crate::error::Diagnostics;

/// Empirical CDF of x: one step per distinct value, right-continuous.
pub(crate) fn ecdf(df: &DataFrame, diag: &mut Diagnostics) -> DataFrame {
    let mut values = super::numeric_column(df, "x", "ecdf", diag);
    if values.is_empty() {
        super::too_small("ecdf", 1, 0, diag);
        return DataFrame::new();
    }
    values.sort_by(f64::total_cmp);
    let n = values.len() as f64;

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        // Keep only the last occurrence of each distinct value, so the
        // step height at a tie is the full cumulative fraction.
        if i + 1 == values.len() || values[i + 1] > v {
            xs.push(v);
            ys.push((i + 1) as f64 / n);
        }
    }

    let mut out = DataFrame::new();
    out.add_column_f64("x", &xs);
    out.add_column_f64("y", &ys);
    out
}

/// Sample order statistics of y against theoretical normal quantiles.
pub(crate) fn qq(df: &DataFrame, diag: &mut Diagnostics) -> DataFrame {
    let mut sample = super::numeric_column(df, "y", "qq", diag);
    if sample.len() < 2 {
        super::too_small("qq", 2, sample.len(), diag);
        return DataFrame::new();
    }
    sample.sort_by(f64::total_cmp);

    let theoretical: Vec<f64> = super::ppoints(sample.len())
        .into_iter()
        .map(super::qnorm)
        .collect();

    let mut out = DataFrame::new();
    out.add_column_f64("x", &theoretical);
    out.add_column_f64("y", &sample);
    out
}

/// Reference line through the first and third quartiles of a Q-Q display.
pub(crate) fn qq_line(df: &DataFrame, diag: &mut Diagnostics) -> DataFrame {
    let mut sample = super::numeric_column(df, "y", "qq_line", diag);
    if sample.len() < 2 {
        super::too_small("qq_line", 2, sample.len(), diag);
        return DataFrame::new();
    }
    sample.sort_by(f64::total_cmp);

    let s25 = super::quantile(&sample, 0.25);
    let s75 = super::quantile(&sample, 0.75);
    let t25 = super::qnorm(0.25);
    let t75 = super::qnorm(0.75);
    let slope = (s75 - s25) / (t75 - t25);
    let intercept = s25 - slope * t25;

    let probs = super::ppoints(sample.len());
    let x_lo = super::qnorm(probs[0]);
    let x_hi = super::qnorm(probs[probs.len() - 1]);

    let mut out = DataFrame::new();
    out.add_column_f64("x", &[x_lo, x_hi]);
    out.add_column_f64("y", &[intercept + slope * x_lo, intercept + slope * x_hi]);
    out
}
