//! Histogram binning and binned summaries.

use crate::data::DataFrame;
use crate::error::Diagnostics;
use crate::grammar::stat::{Aggregate, BinParams};

/// Bin layout over a numeric range.
struct Layout {
    origin: f64,
    width: f64,
    count: usize,
}

impl Layout {
    fn new(lo: f64, hi: f64, params: &BinParams) -> Self {
        if hi <= lo {
            let width = params.width.unwrap_or(1.0);
            return Self { origin: lo - width / 2.0, width, count: 1 };
        }
        let width = match params.width {
            Some(w) => w,
            None => (hi - lo) / params.bins.max(1) as f64,
        };
        let origin = match params.boundary {
            // Shift so the boundary lands on a bin edge at or below lo.
            Some(b) => b + ((lo - b) / width).floor() * width,
            None => lo,
        };
        let count = (((hi - origin) / width).ceil() as usize).max(1);
        Self { origin, width, count }
    }

    /// Bin index for a value. A value exactly on an interior edge belongs
    /// to the lower-adjacent bin.
    fn index(&self, v: f64) -> usize {
        let raw = ((v - self.origin) / self.width).ceil() - 1.0;
        let idx = if raw < 0.0 { 0 } else { raw as usize };
        idx.min(self.count - 1)
    }

    fn center(&self, idx: usize) -> f64 {
        self.origin + (idx as f64 + 0.5) * self.width
    }
}

/// Histogram of the x column.
pub(crate) fn bin(df: &DataFrame, params: &BinParams, diag: &mut Diagnostics) -> DataFrame {
    let values = super::numeric_column(df, "x", "bin", diag);
    if values.is_empty() {
        super::too_small("bin", 1, 0, diag);
        return DataFrame::new();
    }

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let layout = Layout::new(lo, hi, params);

    let mut counts = vec![0usize; layout.count];
    for &v in &values {
        counts[layout.index(v)] += 1;
    }

    let total = values.len() as f64;
    let mut out = DataFrame::new();
    let centers: Vec<f64> = (0..layout.count).map(|i| layout.center(i)).collect();
    let count_col: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    let density: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 / (total * layout.width))
        .collect();

    out.add_column_f64("x", &centers);
    out.add_column_f64("count", &count_col);
    out.add_column_f64("y", &count_col);
    out.add_column_f64("density", &density);
    out.add_column_f64("width", &vec![layout.width; layout.count]);
    out
}

/// Aggregate y per x bin.
pub(crate) fn summary_bin(
    df: &DataFrame,
    fun: Aggregate,
    bins: usize,
    diag: &mut Diagnostics,
) -> DataFrame {
    let pairs = super::numeric_pairs(df, "x", "y", "summary_bin", diag);
    if pairs.is_empty() {
        super::too_small("summary_bin", 1, 0, diag);
        return DataFrame::new();
    }

    let lo = pairs.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let hi = pairs.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let params = BinParams { bins, ..BinParams::default() };
    let layout = Layout::new(lo, hi, &params);

    let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); layout.count];
    for &(x, y) in &pairs {
        buckets[layout.index(x)].push(y);
    }

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (i, bucket) in buckets.iter().enumerate() {
        if let Some(v) = fun.reduce(bucket) {
            xs.push(layout.center(i));
            ys.push(v);
        }
    }

    let mut out = DataFrame::new();
    out.add_column_f64("x", &xs);
    out.add_column_f64("y", &ys);
    out.add_column_f64("width", &vec![layout.width; xs.len()]);
    out
}
