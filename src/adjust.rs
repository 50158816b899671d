//! Position adjustments: resolving overlap between marks that share a
//! position.
//!
//! Adjustments run after statistics, on numeric positions (discrete levels
//! have already been resolved to their indices). Every adjustment returns
//! a frame with exactly as many rows as it was given; anything else is a
//! bug and panics.

use crate::data::{DataFrame, DataValue};
use crate::grammar::position::PositionKind;

/// Seed used by jitter when the caller does not supply one, so repeated
/// renders of the same plot agree.
const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Apply a position adjustment to a layer's frame.
///
/// # Panics
///
/// Panics if an adjustment changes the row count, which would desynchronize
/// positions from their source rows.
#[must_use]
pub fn apply(kind: PositionKind, df: &DataFrame) -> DataFrame {
    let out = match kind {
        PositionKind::Identity => df.clone(),
        PositionKind::Dodge { width } => dodge(df, width),
        PositionKind::Dodge2 { padding } => dodge2(df, padding),
        PositionKind::Stack { reverse } => stack(df, reverse, false),
        PositionKind::Fill { reverse } => stack(df, reverse, true),
        PositionKind::Jitter { width, height, seed } => jitter(df, width, height, seed),
        PositionKind::Nudge { x, y } => nudge(df, x, y),
    };
    assert_eq!(out.nrow(), df.nrow(), "position adjustment changed the row count");
    out
}

fn group_of(df: &DataFrame, row: usize) -> i64 {
    df.cell(row, "group").as_f64().map_or(0, |g| g as i64)
}

/// Distinct group indices in ascending order.
fn group_levels(df: &DataFrame) -> Vec<i64> {
    let mut levels: Vec<i64> = (0..df.nrow()).map(|r| group_of(df, r)).collect();
    levels.sort_unstable();
    levels.dedup();
    levels
}

/// Rows sharing each distinct x position, keyed by exact value.
fn slots(df: &DataFrame) -> Vec<(u64, Vec<usize>)> {
    let mut out: Vec<(u64, Vec<usize>)> = Vec::new();
    for row in 0..df.nrow() {
        let Some(x) = df.cell(row, "x").as_f64() else { continue };
        let key = x.to_bits();
        match out.iter_mut().find(|(k, _)| *k == key) {
            Some((_, rows)) => rows.push(row),
            None => out.push((key, vec![row])),
        }
    }
    out
}

fn shift_x(df: &DataFrame, offsets: &[Option<f64>]) -> DataFrame {
    let mut out = df.clone();
    let col: Vec<DataValue> = (0..df.nrow())
        .map(|row| match (df.cell(row, "x").as_f64(), offsets[row]) {
            (Some(x), Some(d)) => DataValue::Number(x + d),
            _ => df.cell(row, "x"),
        })
        .collect();
    out.add_column("x", col);
    out
}

/// Side-by-side placement over the full group set, so a group keeps the
/// same offset in every x slot whether or not it appears there.
fn dodge(df: &DataFrame, width: f64) -> DataFrame {
    let levels = group_levels(df);
    let n = levels.len().max(1) as f64;

    let mut offsets = vec![None; df.nrow()];
    for row in 0..df.nrow() {
        if df.cell(row, "x").as_f64().is_none() {
            continue;
        }
        let idx = levels
            .iter()
            .position(|&g| g == group_of(df, row))
            .unwrap_or(0) as f64;
        offsets[row] = Some(width * ((idx + 0.5) / n - 0.5));
    }

    let mut out = shift_x(df, &offsets);
    scale_width(&mut out, 1.0 / n);
    out
}

/// Side-by-side placement over only the groups present in each x slot,
/// with padding between neighbours.
fn dodge2(df: &DataFrame, padding: f64) -> DataFrame {
    let mut offsets = vec![None; df.nrow()];
    let mut mark_width = 1.0f64;

    for (_, rows) in slots(df) {
        let mut ordered = rows.clone();
        ordered.sort_by_key(|&r| group_of(df, r));
        let n = ordered.len() as f64;
        let step = 0.9 / n;
        mark_width = mark_width.min(step * (1.0 - padding));
        for (i, &row) in ordered.iter().enumerate() {
            offsets[row] = Some(step * (i as f64 + 0.5) - 0.45);
        }
    }

    let mut out = shift_x(df, &offsets);
    set_width(&mut out, mark_width);
    out
}

/// Stack y values within each x slot, bottom to top in group order.
///
/// Writes the stacked extent into ymin/ymax and moves y to the segment
/// midpoint. With `normalize`, each slot is rescaled so the column spans
/// one.
fn stack(df: &DataFrame, reverse: bool, normalize: bool) -> DataFrame {
    let mut ymin = vec![None; df.nrow()];
    let mut ymax = vec![None; df.nrow()];

    for (_, rows) in slots(df) {
        let mut ordered: Vec<usize> = rows
            .iter()
            .copied()
            .filter(|&r| df.cell(r, "y").as_f64().is_some())
            .collect();
        ordered.sort_by_key(|&r| group_of(df, r));
        if reverse {
            ordered.reverse();
        }

        let total: f64 = ordered
            .iter()
            .filter_map(|&r| df.cell(r, "y").as_f64())
            .sum();
        let scale = if normalize && total.abs() > f64::EPSILON { total } else { 1.0 };

        let mut cum = 0.0;
        for &row in &ordered {
            let y = df.cell(row, "y").as_f64().unwrap_or(0.0);
            ymin[row] = Some(cum / scale);
            cum += y;
            ymax[row] = Some(cum / scale);
        }
    }

    let mut out = df.clone();
    let to_col = |vals: &[Option<f64>]| -> Vec<DataValue> {
        vals.iter()
            .map(|v| v.map_or(DataValue::Null, DataValue::Number))
            .collect()
    };
    let mid: Vec<Option<f64>> = ymin
        .iter()
        .zip(&ymax)
        .map(|(lo, hi)| match (lo, hi) {
            (Some(a), Some(b)) => Some((a + b) / 2.0),
            _ => None,
        })
        .collect();
    out.add_column("ymin", to_col(&ymin));
    out.add_column("ymax", to_col(&ymax));
    out.add_column("y", to_col(&mid));
    out
}

/// Deterministic pseudo-random offsets in x and y.
fn jitter(df: &DataFrame, width: Option<f64>, height: Option<f64>, seed: Option<u64>) -> DataFrame {
    let xs: Vec<Option<f64>> = (0..df.nrow()).map(|r| df.cell(r, "x").as_f64()).collect();
    let ys: Vec<Option<f64>> = (0..df.nrow()).map(|r| df.cell(r, "y").as_f64()).collect();

    let w = width.unwrap_or_else(|| 0.4 * resolution(&xs));
    let h = height.unwrap_or_else(|| 0.4 * resolution(&ys));
    let mut rng = XorShift64::new(seed.unwrap_or(DEFAULT_SEED));

    let mut out = df.clone();
    let mut new_x = Vec::with_capacity(df.nrow());
    let mut new_y = Vec::with_capacity(df.nrow());
    for row in 0..df.nrow() {
        // Two draws per row regardless of nulls keeps the stream aligned.
        let dx = rng.uniform(-w, w);
        let dy = rng.uniform(-h, h);
        new_x.push(match xs[row] {
            Some(x) => DataValue::Number(x + dx),
            None => df.cell(row, "x"),
        });
        new_y.push(match ys[row] {
            Some(y) => DataValue::Number(y + dy),
            None => df.cell(row, "y"),
        });
    }
    out.add_column("x", new_x);
    out.add_column("y", new_y);
    out
}

fn nudge(df: &DataFrame, dx: f64, dy: f64) -> DataFrame {
    let mut out = df.clone();
    for (name, delta) in [("x", dx), ("y", dy)] {
        if !df.has_column(name) {
            continue;
        }
        let col: Vec<DataValue> = (0..df.nrow())
            .map(|row| match df.cell(row, name).as_f64() {
                Some(v) => DataValue::Number(v + delta),
                None => df.cell(row, name),
            })
            .collect();
        out.add_column(name, col);
    }
    out
}

/// Smallest gap between distinct values; one data unit when fewer than two
/// distinct values exist.
fn resolution(values: &[Option<f64>]) -> f64 {
    let mut v: Vec<f64> = values.iter().flatten().copied().collect();
    v.sort_by(f64::total_cmp);
    v.dedup();
    let gap = v.windows(2).map(|w| w[1] - w[0]).fold(f64::INFINITY, f64::min);
    if gap.is_finite() {
        gap.max(f64::EPSILON)
    } else {
        1.0
    }
}

fn scale_width(df: &mut DataFrame, factor: f64) {
    if let Some(col) = df.column("width") {
        let scaled: Vec<DataValue> = col
            .iter()
            .map(|v| match v.as_f64() {
                Some(w) => DataValue::Number(w * factor),
                None => v.clone(),
            })
            .collect();
        df.add_column("width", scaled);
    }
}

fn set_width(df: &mut DataFrame, width: f64) {
    if df.has_column("width") {
        let col = vec![DataValue::Number(width); df.nrow()];
        df.add_column("width", col);
    }
}

/// xorshift64* generator. Small, seedable, and good enough for visual
/// jitter.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + unit * (hi - lo)
    }
}


// ============================================================================
// Property-based tests with proptest
// ============================================================================
