//! 2D density estimation and contour extraction.

use crate::data::DataFrame;
use crate::error::{DiagnosticKind, Diagnostics};

/// A regular grid of heights: `z[iy * nx + ix]` at `(xs[ix], ys[iy])`.
struct Grid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    z: Vec<f64>,
}

impl Grid {
    fn at(&self, ix: usize, iy: usize) -> f64 {
        self.z[iy * self.xs.len() + ix]
    }
}

/// Iso-lines of the gaussian 2D kernel density estimate of (x, y).
pub(crate) fn density_2d(
    df: &DataFrame,
    n: usize,
    levels: usize,
    diag: &mut Diagnostics,
) -> DataFrame {
    let pairs = super::numeric_pairs(df, "x", "y", "density_2d", diag);
    if pairs.len() < 3 {
        super::too_small("density_2d", 3, pairs.len(), diag);
        return DataFrame::new();
    }

    let xv: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let yv: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let bwx = super::silverman_bandwidth(&xv);
    let bwy = super::silverman_bandwidth(&yv);

    let n_grid = n.max(10);
    let axis = |v: &[f64], bw: f64| -> Vec<f64> {
        let lo = v.iter().copied().fold(f64::INFINITY, f64::min) - 3.0 * bw;
        let hi = v.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 3.0 * bw;
        (0..n_grid)
            .map(|i| lo + (hi - lo) * i as f64 / (n_grid - 1) as f64)
            .collect()
    };
    let xs = axis(&xv, bwx);
    let ys = axis(&yv, bwy);

    let norm = pairs.len() as f64 * bwx * bwy;
    let mut z = Vec::with_capacity(n_grid * n_grid);
    for &gy in &ys {
        for &gx in &xs {
            let d: f64 = pairs
                .iter()
                .map(|&(px, py)| super::dnorm((gx - px) / bwx) * super::dnorm((gy - py) / bwy))
                .sum();
            z.push(d / norm);
        }
    }

    let grid = Grid { xs, ys, z };
    let z_max = grid.z.iter().copied().fold(0.0f64, f64::max);
    let thresholds: Vec<f64> = (1..=levels.max(1))
        .map(|i| z_max * i as f64 / (levels.max(1) as f64 + 1.0))
        .collect();
    contour_frame(&grid, &thresholds)
}

/// Iso-lines of a gridded z column.
///
/// The rows must cover a complete x-by-y grid; incomplete grids produce a
/// diagnostic and no output.
pub(crate) fn contour(df: &DataFrame, levels: usize, diag: &mut Diagnostics) -> DataFrame {
    let xs_raw = super::numeric_column(df, "x", "contour", diag);
    let ys_raw = super::numeric_column(df, "y", "contour", diag);
    let zs = df.numeric("z").unwrap_or_default();

    let mut xs = xs_raw.clone();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    let mut ys = ys_raw.clone();
    ys.sort_by(f64::total_cmp);
    ys.dedup();

    if xs.len() < 2 || ys.len() < 2 || df.nrow() != xs.len() * ys.len() {
        diag.push(
            DiagnosticKind::DegenerateGroup,
            format!(
                "contour: rows do not form a complete {}x{} grid",
                xs.len(),
                ys.len()
            ),
            df.nrow(),
        );
        return DataFrame::new();
    }

    let mut z = vec![f64::NAN; xs.len() * ys.len()];
    for row in 0..df.nrow() {
        let (Some(x), Some(y), Some(v)) = (
            df.cell(row, "x").as_f64(),
            df.cell(row, "y").as_f64(),
            zs.get(row).copied().flatten(),
        ) else {
            continue;
        };
        let ix = xs.iter().position(|&g| (g - x).abs() < 1e-12);
        let iy = ys.iter().position(|&g| (g - y).abs() < 1e-12);
        if let (Some(ix), Some(iy)) = (ix, iy) {
            z[iy * xs.len() + ix] = v;
        }
    }
    if z.iter().any(|v| v.is_nan()) {
        diag.push(
            DiagnosticKind::DegenerateGroup,
            "contour: grid has missing z cells".to_string(),
            df.nrow(),
        );
        return DataFrame::new();
    }

    let z_lo = z.iter().copied().fold(f64::INFINITY, f64::min);
    let z_hi = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let thresholds: Vec<f64> = (1..=levels.max(1))
        .map(|i| z_lo + (z_hi - z_lo) * i as f64 / (levels.max(1) as f64 + 1.0))
        .collect();
    contour_frame(&Grid { xs, ys, z }, &thresholds)
}

/// Run marching squares for each threshold and emit polyline rows with
/// `x`, `y`, `level`, and `piece` columns.
fn contour_frame(grid: &Grid, thresholds: &[f64]) -> DataFrame {
    let mut xs_out = Vec::new();
    let mut ys_out = Vec::new();
    let mut level_out = Vec::new();
    let mut piece_out = Vec::new();
    let mut piece_id = 0.0f64;

    for &t in thresholds {
        let segments = marching_squares(grid, t);
        for line in chain_segments(segments) {
            piece_id += 1.0;
            for (x, y) in line {
                xs_out.push(x);
                ys_out.push(y);
                level_out.push(t);
                piece_out.push(piece_id);
            }
        }
    }

    let mut out = DataFrame::new();
    out.add_column_f64("x", &xs_out);
    out.add_column_f64("y", &ys_out);
    out.add_column_f64("level", &level_out);
    out.add_column_f64("piece", &piece_out);
    out
}

type Seg = ((f64, f64), (f64, f64));

/// Line segments where the grid surface crosses the threshold.
fn marching_squares(grid: &Grid, t: f64) -> Vec<Seg> {
    let nx = grid.xs.len();
    let ny = grid.ys.len();
    let mut segs = Vec::new();

    let lerp = |a: f64, b: f64, va: f64, vb: f64| a + (t - va) / (vb - va) * (b - a);

    for iy in 0..ny - 1 {
        for ix in 0..nx - 1 {
            let (x0, x1) = (grid.xs[ix], grid.xs[ix + 1]);
            let (y0, y1) = (grid.ys[iy], grid.ys[iy + 1]);
            let v00 = grid.at(ix, iy);
            let v10 = grid.at(ix + 1, iy);
            let v01 = grid.at(ix, iy + 1);
            let v11 = grid.at(ix + 1, iy + 1);

            let mut crossings: Vec<(f64, f64)> = Vec::with_capacity(4);
            let mut tags: Vec<u8> = Vec::with_capacity(4);
            if (v00 >= t) != (v10 >= t) {
                crossings.push((lerp(x0, x1, v00, v10), y0));
                tags.push(0);
            }
            if (v10 >= t) != (v11 >= t) {
                crossings.push((x1, lerp(y0, y1, v10, v11)));
                tags.push(1);
            }
            if (v01 >= t) != (v11 >= t) {
                crossings.push((lerp(x0, x1, v01, v11), y1));
                tags.push(2);
            }
            if (v00 >= t) != (v01 >= t) {
                crossings.push((x0, lerp(y0, y1, v00, v01)));
                tags.push(3);
            }

            match crossings.len() {
                2 => segs.push((crossings[0], crossings[1])),
                4 => {
                    // Saddle: split by the cell center to keep the two
                    // line pieces from crossing each other.
                    let center = (v00 + v10 + v01 + v11) / 4.0;
                    let bottom = tags.iter().position(|&e| e == 0).unwrap_or(0);
                    let right = tags.iter().position(|&e| e == 1).unwrap_or(1);
                    let top = tags.iter().position(|&e| e == 2).unwrap_or(2);
                    let left = tags.iter().position(|&e| e == 3).unwrap_or(3);
                    if (center >= t) == (v00 >= t) {
                        segs.push((crossings[bottom], crossings[right]));
                        segs.push((crossings[top], crossings[left]));
                    } else {
                        segs.push((crossings[bottom], crossings[left]));
                        segs.push((crossings[top], crossings[right]));
                    }
                }
                _ => {}
            }
        }
    }
    segs
}

/// Join segments end to end into polylines.
fn chain_segments(mut segs: Vec<Seg>) -> Vec<Vec<(f64, f64)>> {
    const EPS: f64 = 1e-9;
    let close = |a: (f64, f64), b: (f64, f64)| (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS;

    let mut lines = Vec::new();
    while let Some((start, end)) = segs.pop() {
        let mut line = vec![start, end];
        loop {
            let head = line[0];
            let tail = line[line.len() - 1];
            let next = segs.iter().position(|&(a, b)| {
                close(a, tail) || close(b, tail) || close(a, head) || close(b, head)
            });
            let Some(i) = next else { break };
            let (a, b) = segs.swap_remove(i);
            if close(a, tail) {
                line.push(b);
            } else if close(b, tail) {
                line.push(a);
            } else if close(a, head) {
                line.insert(0, b);
            } else {
                line.insert(0, a);
            }
        }
        lines.push(line);
    }
    lines
}
