//! Regression smoothers with confidence bands.

use crate::data::DataFrame;
use crate::error::{DiagnosticKind, Diagnostics};
use crate::grammar::stat::{SmoothMethod, SmoothParams};

/// Smooth statistic: a fitted curve over an even x grid, with an optional
/// confidence band in ymin/ymax.
pub(crate) fn smooth(df: &DataFrame, params: &SmoothParams, diag: &mut Diagnostics) -> DataFrame {
    let mut pairs = super::numeric_pairs(df, "x", "y", "smooth", diag);
    if pairs.len() < 2 {
        super::too_small("smooth", 2, pairs.len(), diag);
        return DataFrame::new();
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let x_lo = pairs[0].0;
    let x_hi = pairs[pairs.len() - 1].0;
    if x_hi - x_lo < f64::EPSILON {
        diag.push(
            DiagnosticKind::DegenerateGroup,
            "smooth: all x values identical".to_string(),
            pairs.len(),
        );
        return DataFrame::new();
    }

    let n_out = params.n.max(2);
    let grid: Vec<f64> = (0..n_out)
        .map(|i| x_lo + (x_hi - x_lo) * i as f64 / (n_out - 1) as f64)
        .collect();

    let z = super::qnorm((1.0 + params.level) / 2.0);
    let (fit, se): (Vec<f64>, Vec<f64>) = match params.method {
        SmoothMethod::Linear => linear_fit(&pairs, &grid),
        SmoothMethod::Loess { span } => loess_fit(&pairs, &grid, span),
    };

    let mut out = DataFrame::new();
    out.add_column_f64("x", &grid);
    out.add_column_f64("y", &fit);
    if params.se {
        let ymin: Vec<f64> = fit.iter().zip(&se).map(|(y, s)| y - z * s).collect();
        let ymax: Vec<f64> = fit.iter().zip(&se).map(|(y, s)| y + z * s).collect();
        out.add_column_f64("ymin", &ymin);
        out.add_column_f64("ymax", &ymax);
    }
    out
}

/// Ordinary least squares with the exact pointwise standard error of the
/// fitted mean.
fn linear_fit(pairs: &[(f64, f64)], grid: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = pairs.len() as f64;
    let x_bar = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let y_bar = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let sxx: f64 = pairs.iter().map(|p| (p.0 - x_bar) * (p.0 - x_bar)).sum();
    let sxy: f64 = pairs.iter().map(|p| (p.0 - x_bar) * (p.1 - y_bar)).sum();
    let slope = sxy / sxx;
    let intercept = y_bar - slope * x_bar;

    let rss: f64 = pairs
        .iter()
        .map(|p| {
            let r = p.1 - (intercept + slope * p.0);
            r * r
        })
        .sum();
    let s2 = if pairs.len() > 2 { rss / (n - 2.0) } else { 0.0 };

    let fit: Vec<f64> = grid.iter().map(|&x| intercept + slope * x).collect();
    let se: Vec<f64> = grid
        .iter()
        .map(|&x| (s2 * (1.0 / n + (x - x_bar) * (x - x_bar) / sxx)).sqrt())
        .collect();
    (fit, se)
}

/// Local linear regression with tricube weights over the nearest
/// `ceil(span * n)` points.
fn loess_fit(pairs: &[(f64, f64)], grid: &[f64], span: f64) -> (Vec<f64>, Vec<f64>) {
    let n = pairs.len();
    let k = ((span.clamp(0.0, 1.0) * n as f64).ceil() as usize).clamp(2, n);

    let mut fit = Vec::with_capacity(grid.len());
    let mut se = Vec::with_capacity(grid.len());

    for &x0 in grid {
        let mut by_dist: Vec<(f64, f64, f64)> =
            pairs.iter().map(|&(x, y)| ((x - x0).abs(), x, y)).collect();
        by_dist.sort_by(|a, b| a.0.total_cmp(&b.0));
        let window = &by_dist[..k];
        let d_max = window[k - 1].0.max(f64::EPSILON);

        let mut sw = 0.0;
        let mut swx = 0.0;
        let mut swy = 0.0;
        let mut swxx = 0.0;
        let mut swxy = 0.0;
        for &(d, x, y) in window {
            let u = (d / d_max).min(1.0);
            let w = (1.0 - u * u * u).powi(3);
            sw += w;
            swx += w * x;
            swy += w * y;
            swxx += w * x * x;
            swxy += w * x * y;
        }

        let denom = sw * swxx - swx * swx;
        let (b, a) = if denom.abs() > f64::EPSILON {
            let b = (sw * swxy - swx * swy) / denom;
            (b, (swy - b * swx) / sw)
        } else {
            (0.0, swy / sw)
        };
        let y0 = a + b * x0;

        let mut wrss = 0.0;
        for &(d, x, y) in window {
            let u = (d / d_max).min(1.0);
            let w = (1.0 - u * u * u).powi(3);
            let r = y - (a + b * x);
            wrss += w * r * r;
        }
        fit.push(y0);
        se.push((wrss / sw / k as f64).sqrt());
    }
    (fit, se)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(x: &[f64], y: &[f64]) -> DataFrame {
        DataFrame::from_xy(x, y)
    }

    #[test]
    fn test_linear_recovers_exact_line() {
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let mut diag = Diagnostics::new();
        let params = SmoothParams {
            method: SmoothMethod::Linear,
            n: 5,
            se: true,
            level: 0.95,
        };
        let out = smooth(&frame(&x, &y), &params, &mut diag);
        assert_eq!(out.nrow(), 5);
        for row in 0..out.nrow() {
            let gx = out.cell(row, "x").as_f64().unwrap();
            let gy = out.cell(row, "y").as_f64().unwrap();
            assert_relative_eq!(gy, 2.0 * gx + 1.0, epsilon = 1e-9);
        }
        // Perfect fit: the band collapses onto the line.
        assert_relative_eq!(
            out.cell(0, "ymin").as_f64().unwrap(),
            out.cell(0, "ymax").as_f64().unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_grid_spans_data_range() {
        let mut diag = Diagnostics::new();
        let params = SmoothParams { method: SmoothMethod::Linear, ..SmoothParams::default() };
        let out = smooth(&frame(&[2.0, 8.0, 5.0], &[1.0, 2.0, 3.0]), &params, &mut diag);
        assert_eq!(out.nrow(), 80);
        assert_relative_eq!(out.cell(0, "x").as_f64().unwrap(), 2.0);
        assert_relative_eq!(out.cell(79, "x").as_f64().unwrap(), 8.0);
    }

    #[test]
    fn test_no_band_when_se_off() {
        let mut diag = Diagnostics::new();
        let params = SmoothParams { method: SmoothMethod::Linear, se: false, ..SmoothParams::default() };
        let out = smooth(&frame(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), &params, &mut diag);
        assert!(!out.has_column("ymin"));
    }

    #[test]
    fn test_too_few_points_reports() {
        let mut diag = Diagnostics::new();
        let out = smooth(&frame(&[1.0], &[1.0]), &SmoothParams::default(), &mut diag);
        assert_eq!(out.nrow(), 0);
        assert!(diag.has(DiagnosticKind::GroupTooSmall));
    }

    #[test]
    fn test_degenerate_x_reports() {
        let mut diag = Diagnostics::new();
        let out = smooth(&frame(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]), &SmoothParams::default(), &mut diag);
        assert_eq!(out.nrow(), 0);
        assert!(diag.has(DiagnosticKind::DegenerateGroup));
    }

    #[test]
    fn test_loess_interpolates_smooth_data() {
        let x: Vec<f64> = (0..20).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let mut diag = Diagnostics::new();
        let params = SmoothParams { n: 10, se: false, ..SmoothParams::default() };
        let out = smooth(&frame(&x, &y), &params, &mut diag);
        assert_eq!(out.nrow(), 10);
        // A local linear fit of a parabola stays close over a dense window.
        let mid_x = out.cell(5, "x").as_f64().unwrap();
        let mid_y = out.cell(5, "y").as_f64().unwrap();
        assert!((mid_y - mid_x * mid_x).abs() < 15.0);
    }
}
