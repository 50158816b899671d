//! Normal-theory data ellipses.

use crate::data::DataFrame;
use crate::error::{DiagnosticKind, Diagnostics};

/// Coverage ellipse of (x, y) under a bivariate normal model.
///
/// The squared Mahalanobis radius for coverage `level` with two degrees of
/// freedom is `-2 ln(1 - level)`. The output is a closed polygon with
/// `segments` vertices.
pub(crate) fn ellipse(
    df: &DataFrame,
    level: f64,
    segments: usize,
    diag: &mut Diagnostics,
) -> DataFrame {
    let pairs = super::numeric_pairs(df, "x", "y", "ellipse", diag);
    if pairs.len() < 3 {
        super::too_small("ellipse", 3, pairs.len(), diag);
        return DataFrame::new();
    }

    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in &pairs {
        sxx += (x - mx) * (x - mx);
        syy += (y - my) * (y - my);
        sxy += (x - mx) * (y - my);
    }
    sxx /= n - 1.0;
    syy /= n - 1.0;
    sxy /= n - 1.0;

    let det = sxx * syy - sxy * sxy;
    if det <= f64::EPSILON * sxx.max(syy).max(1.0) {
        diag.push(
            DiagnosticKind::DegenerateGroup,
            "ellipse: singular covariance matrix".to_string(),
            pairs.len(),
        );
        return DataFrame::new();
    }

    // Eigen-decomposition of the 2x2 covariance matrix.
    let trace = sxx + syy;
    let disc = ((trace * trace) / 4.0 - det).max(0.0).sqrt();
    let l1 = trace / 2.0 + disc;
    let l2 = trace / 2.0 - disc;
    let angle = if sxy.abs() > f64::EPSILON {
        (l1 - sxx).atan2(sxy)
    } else if sxx >= syy {
        0.0
    } else {
        std::f64::consts::FRAC_PI_2
    };

    let r2 = -2.0 * (1.0 - level).ln();
    let a = (r2 * l1).sqrt();
    let b = (r2 * l2).sqrt();
    let (sin_t, cos_t) = angle.sin_cos();

    let segments = segments.max(8);
    let mut xs = Vec::with_capacity(segments);
    let mut ys = Vec::with_capacity(segments);
    for i in 0..segments {
        let phi = std::f64::consts::TAU * i as f64 / (segments - 1) as f64;
        let ex = a * phi.cos();
        let ey = b * phi.sin();
        xs.push(mx + ex * cos_t - ey * sin_t);
        ys.push(my + ex * sin_t + ey * cos_t);
    }

    let mut out = DataFrame::new();
    out.add_column_f64("x", &xs);
    out.add_column_f64("y", &ys);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closed_polygon() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 2.5, 3.5];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0, 2.0, 4.5];
        let mut diag = Diagnostics::new();
        let out = ellipse(&DataFrame::from_xy(&x, &y), 0.95, 51, &mut diag);
        assert_eq!(out.nrow(), 51);
        assert_relative_eq!(
            out.cell(0, "x").as_f64().unwrap(),
            out.cell(50, "x").as_f64().unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_centered_on_mean() {
        let x = [0.0, 2.0, 0.0, 2.0, 1.0];
        let y = [0.0, 0.0, 2.0, 2.0, 1.0];
        let mut diag = Diagnostics::new();
        let out = ellipse(&DataFrame::from_xy(&x, &y), 0.9, 100, &mut diag);
        let xs: Vec<f64> = out.numeric("x").unwrap().into_iter().flatten().collect();
        let ys: Vec<f64> = out.numeric("y").unwrap().into_iter().flatten().collect();
        let cx = xs.iter().sum::<f64>() / xs.len() as f64;
        let cy = ys.iter().sum::<f64>() / ys.len() as f64;
        assert_relative_eq!(cx, 1.0, epsilon = 0.05);
        assert_relative_eq!(cy, 1.0, epsilon = 0.05);
    }

    #[test]
    fn test_higher_level_is_larger() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 2.5];
        let y = [2.0, 1.5, 3.5, 3.0, 5.5, 2.2];
        let df = DataFrame::from_xy(&x, &y);
        let mut diag = Diagnostics::new();
        let inner = ellipse(&df, 0.5, 51, &mut diag);
        let outer = ellipse(&df, 0.99, 51, &mut diag);
        let span = |f: &DataFrame| {
            let xs: Vec<f64> = f.numeric("x").unwrap().into_iter().flatten().collect();
            xs.iter().copied().fold(f64::NEG_INFINITY, f64::max)
                - xs.iter().copied().fold(f64::INFINITY, f64::min)
        };
        assert!(span(&outer) > span(&inner));
    }

    #[test]
    fn test_collinear_data_reports_singular() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let mut diag = Diagnostics::new();
        let out = ellipse(&DataFrame::from_xy(&x, &y), 0.95, 51, &mut diag);
        assert_eq!(out.nrow(), 0);
        assert!(diag.has(DiagnosticKind::DegenerateGroup));
    }
}
