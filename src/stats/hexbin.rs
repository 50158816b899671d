//! Hexagonal 2D binning.

use std::collections::HashMap;

use crate::data::DataFrame;
use crate::error::Diagnostics;

/// Row spacing of a regular hex lattice with unit column spacing.
const ROW_SPACING: f64 = 0.866_025_403_784_438_6;

/// Hex-bin the (x, y) pairs onto a lattice with roughly `bins` hexagons
/// across the x range. Emits one row per occupied hexagon with its center
/// and count.
pub(crate) fn bin_hex(df: &DataFrame, bins: usize, diag: &mut Diagnostics) -> DataFrame {
    let pairs = super::numeric_pairs(df, "x", "y", "bin_hex", diag);
    if pairs.is_empty() {
        super::too_small("bin_hex", 1, 0, diag);
        return DataFrame::new();
    }

    let x_lo = pairs.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_hi = pairs.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let y_lo = pairs.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let y_hi = pairs.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let bins = bins.max(1) as f64;
    let xw = if x_hi > x_lo { (x_hi - x_lo) / bins } else { 1.0 };
    let yw = if y_hi > y_lo { (y_hi - y_lo) / bins } else { 1.0 };

    // Work in a normalized space where the lattice is regular: columns one
    // unit apart, odd rows offset by half a unit.
    let mut counts: HashMap<(i64, i64), usize> = HashMap::new();
    for &(px, py) in &pairs {
        let u = (px - x_lo) / xw;
        let v = (py - y_lo) / yw;
        let cell = nearest_center(u, v);
        *counts.entry(cell).or_insert(0) += 1;
    }

    let mut cells: Vec<((i64, i64), usize)> = counts.into_iter().collect();
    cells.sort_by_key(|&((i, j), _)| (j, i));

    let mut xs = Vec::with_capacity(cells.len());
    let mut ys = Vec::with_capacity(cells.len());
    let mut ns = Vec::with_capacity(cells.len());
    for ((i, j), n) in cells {
        let offset = if j.rem_euclid(2) == 1 { 0.5 } else { 0.0 };
        xs.push(x_lo + (i as f64 + offset) * xw);
        ys.push(y_lo + j as f64 * ROW_SPACING * yw);
        ns.push(n as f64);
    }

    let mut out = DataFrame::new();
    out.add_column_f64("x", &xs);
    out.add_column_f64("y", &ys);
    out.add_column_f64("count", &ns);
    out.add_column_f64("width", &vec![xw; xs.len()]);
    out.add_column_f64("height", &vec![yw * ROW_SPACING; xs.len()]);
    out
}

/// Index of the nearest hexagon center to a normalized point.
fn nearest_center(u: f64, v: f64) -> (i64, i64) {
    let j_lo = (v / ROW_SPACING).floor() as i64;
    let mut best = (0i64, 0i64);
    let mut best_d2 = f64::INFINITY;

    for j in [j_lo, j_lo + 1] {
        let offset = if j.rem_euclid(2) == 1 { 0.5 } else { 0.0 };
        let i = (u - offset).round() as i64;
        let cu = i as f64 + offset;
        let cv = j as f64 * ROW_SPACING;
        let d2 = (u - cu) * (u - cu) + (v - cv) * (v - cv);
        if d2 < best_d2 {
            best_d2 = d2;
            best = (i, j);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(x: &[f64], y: &[f64]) -> DataFrame {
        DataFrame::from_xy(x, y)
    }

    #[test]
    fn test_counts_sum_to_n() {
        let x: Vec<f64> = (0..50).map(|i| f64::from(i % 10)).collect();
        let y: Vec<f64> = (0..50).map(|i| f64::from(i / 10)).collect();
        let mut diag = Diagnostics::new();
        let out = bin_hex(&frame(&x, &y), 5, &mut diag);
        let total: f64 = out.numeric("count").unwrap().into_iter().flatten().sum();
        assert!((total - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_clustered_points_share_a_hexagon() {
        let x = [5.0, 5.01, 5.02, 0.0, 10.0];
        let y = [5.0, 5.01, 4.99, 0.0, 10.0];
        let mut diag = Diagnostics::new();
        let out = bin_hex(&frame(&x, &y), 5, &mut diag);
        let counts: Vec<f64> = out.numeric("count").unwrap().into_iter().flatten().collect();
        assert!(counts.contains(&3.0));
    }

    #[test]
    fn test_nearest_center_on_lattice_points() {
        assert_eq!(nearest_center(0.0, 0.0), (0, 0));
        assert_eq!(nearest_center(2.0, 0.0), (2, 0));
        // Odd rows are offset by half a column.
        assert_eq!(nearest_center(0.5, ROW_SPACING), (0, 1));
    }

    #[test]
    fn test_degenerate_extent_single_cell() {
        let mut diag = Diagnostics::new();
        let out = bin_hex(&frame(&[2.0, 2.0], &[3.0, 3.0]), 10, &mut diag);
        assert_eq!(out.nrow(), 1);
        assert_eq!(out.cell(0, "count").as_f64(), Some(2.0));
    }
}
