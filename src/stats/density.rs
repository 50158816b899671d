//! Gaussian kernel density estimates.

use crate::data::{split_by, DataFrame};
use crate::error::Diagnostics;
use crate::grammar::stat::DensityParams;

/// Evaluate a gaussian KDE over an even grid spanning the data plus three
/// bandwidths on each side.
fn kde(values: &[f64], params: &DensityParams) -> (Vec<f64>, Vec<f64>) {
    let bw = params
        .bandwidth
        .unwrap_or_else(|| super::silverman_bandwidth(values))
        * params.adjust;
    let bw = if bw > 0.0 { bw } else { 1.0 };

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min) - 3.0 * bw;
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 3.0 * bw;
    let n_grid = params.n.max(64);
    let n = values.len() as f64;

    let grid: Vec<f64> = (0..n_grid)
        .map(|i| lo + (hi - lo) * i as f64 / (n_grid - 1) as f64)
        .collect();
    let dens: Vec<f64> = grid
        .iter()
        .map(|&g| values.iter().map(|&v| super::dnorm((g - v) / bw)).sum::<f64>() / (n * bw))
        .collect();
    (grid, dens)
}

/// Density statistic along x.
pub(crate) fn density(df: &DataFrame, params: &DensityParams, diag: &mut Diagnostics) -> DataFrame {
    let values = super::numeric_column(df, "x", "density", diag);
    if values.len() < 2 {
        super::too_small("density", 2, values.len(), diag);
        return DataFrame::new();
    }
    let (grid, dens) = kde(&values, params);

    let mut out = DataFrame::new();
    out.add_column_f64("x", &grid);
    out.add_column_f64("density", &dens);
    out.add_column_f64("y", &dens);
    out
}

/// Density statistic along y, one curve per distinct x value.
///
/// Emits a `scaled` column with each curve normalized to a unit maximum,
/// which violin widths draw from.
pub(crate) fn ydensity(
    df: &DataFrame,
    params: &DensityParams,
    diag: &mut Diagnostics,
) -> DataFrame {
    let mut out = DataFrame::new();
    let groups = split_by(df, &["x".to_string()]);

    for (_, rows) in &groups {
        let sub = df.select_rows(rows);
        let values = super::numeric_column(&sub, "y", "ydensity", diag);
        if values.len() < 2 {
            super::too_small("ydensity", 2, values.len(), diag);
            continue;
        }
        let (grid, dens) = kde(&values, params);
        let peak = dens.iter().copied().fold(0.0f64, f64::max).max(f64::EPSILON);

        let x = sub.cell(0, "x");
        let mut piece = DataFrame::new();
        piece.add_column("x", vec![x; grid.len()]);
        piece.add_column_f64("y", &grid);
        piece.add_column_f64("density", &dens);
        let scaled: Vec<f64> = dens.iter().map(|d| d / peak).collect();
        piece.add_column_f64("scaled", &scaled);
        out.append(&piece);
    }
    out
}
