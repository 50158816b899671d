//! Statistical transforms.
//!
//! [`apply`] runs one statistic over one group of rows and returns a new
//! frame of computed columns. Groups that cannot support their statistic
//! come back empty with a diagnostic rather than failing the render.

mod bin;
mod boxplot;
mod density;
mod density2d;
mod ecdf;
mod ellipse;
mod hexbin;
mod smooth;
mod summary;

use crate::data::DataFrame;
use crate::error::{DiagnosticKind, Diagnostics};
use crate::grammar::stat::StatKind;

/// Run a statistic over one group of rows.
pub fn apply(kind: &StatKind, input: &DataFrame, diag: &mut Diagnostics) -> DataFrame {
    match kind {
        StatKind::Identity => input.clone(),
        StatKind::Count => summary::count(input),
        StatKind::Bin(params) => bin::bin(input, params, diag),
        StatKind::Boxplot { coef } => boxplot::boxplot(input, *coef, diag),
        StatKind::Smooth(params) => smooth::smooth(input, params, diag),
        StatKind::Density(params) => density::density(input, params, diag),
        StatKind::YDensity(params) => density::ydensity(input, params, diag),
        StatKind::Summary { fun } => summary::summarize(input, *fun, diag),
        StatKind::SummaryBin { fun, bins } => bin::summary_bin(input, *fun, *bins, diag),
        StatKind::Ecdf => ecdf::ecdf(input, diag),
        StatKind::Qq => ecdf::qq(input, diag),
        StatKind::QqLine => ecdf::qq_line(input, diag),
        StatKind::Density2d { n, levels } => density2d::density_2d(input, *n, *levels, diag),
        StatKind::Contour { levels } => density2d::contour(input, *levels, diag),
        StatKind::BinHex { bins } => hexbin::bin_hex(input, *bins, diag),
        StatKind::Ellipse { level, segments } => ellipse::ellipse(input, *level, *segments, diag),
    }
}

/// Type-7 quantile of a sorted slice.
///
/// The caller sorts; this interpolates. Empty input yields NaN.
#[must_use]
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let h = p.clamp(0.0, 1.0) * (n as f64 - 1.0);
            let lo = h.floor() as usize;
            let hi = h.ceil() as usize;
            sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
        }
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with Bessel's correction. NaN for fewer than two values.
pub(crate) fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() as f64 - 1.0)
}

/// Silverman's rule-of-thumb kernel bandwidth.
pub(crate) fn silverman_bandwidth(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let sd = variance(values).sqrt();
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
    let spread = if iqr > 0.0 { sd.min(iqr / 1.349) } else { sd };
    if spread > 0.0 {
        0.9 * spread * n.powf(-0.2)
    } else {
        1.0
    }
}

/// Standard normal density.
pub(crate) fn dnorm(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Inverse standard normal CDF (Acklam's rational approximation).
///
/// Accurate to about 1e-9 over (0, 1); the tails use a separate expansion.
#[allow(clippy::excessive_precision)]
pub(crate) fn qnorm(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if !(0.0..=1.0).contains(&p) || p == 0.0 || p == 1.0 {
        return f64::NAN;
    }
    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -qnorm(1.0 - p)
    }
}

/// Probability points for n order statistics, matching the usual plotting
/// convention: `(i - a) / (n + 1 - 2a)` with `a = 3/8` for small samples.
pub(crate) fn ppoints(n: usize) -> Vec<f64> {
    let a = if n <= 10 { 0.375 } else { 0.5 };
    let nf = n as f64;
    (1..=n).map(|i| (i as f64 - a) / (nf + 1.0 - 2.0 * a)).collect()
}

/// Pull rows where both named columns are numeric, reporting drops.
pub(crate) fn numeric_pairs(
    df: &DataFrame,
    x: &str,
    y: &str,
    context: &str,
    diag: &mut Diagnostics,
) -> Vec<(f64, f64)> {
    let xs = df.numeric(x).unwrap_or_default();
    let ys = df.numeric(y).unwrap_or_default();
    let mut out = Vec::new();
    let mut dropped = 0usize;
    for row in 0..df.nrow() {
        match (xs.get(row).copied().flatten(), ys.get(row).copied().flatten()) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => out.push((a, b)),
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        diag.push(
            DiagnosticKind::NonNumeric,
            format!("{context}: dropped {dropped} row(s) with missing or non-numeric values"),
            dropped,
        );
    }
    out
}

/// Pull finite numeric values from one column, reporting drops.
pub(crate) fn numeric_column(
    df: &DataFrame,
    name: &str,
    context: &str,
    diag: &mut Diagnostics,
) -> Vec<f64> {
    let col = df.numeric(name).unwrap_or_default();
    let out: Vec<f64> = col.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    let dropped = df.nrow().saturating_sub(out.len());
    if dropped > 0 {
        diag.push(
            DiagnosticKind::NonNumeric,
            format!("{context}: dropped {dropped} row(s) with missing or non-numeric values"),
            dropped,
        );
    }
    out
}

/// Record that a group was too small for its statistic.
pub(crate) fn too_small(context: &str, needed: usize, got: usize, diag: &mut Diagnostics) {
    diag.push(
        DiagnosticKind::GroupTooSmall,
        format!("{context}: needs at least {needed} rows, got {got}"),
        got,
    );
}
