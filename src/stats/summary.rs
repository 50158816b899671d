//! Per-position counts and aggregates.

use crate::data::{split_by, DataFrame, DataValue};
use crate::error::Diagnostics;
use crate::grammar::stat::Aggregate;

/// Count rows per distinct x value, in first-seen order.
pub(crate) fn count(df: &DataFrame) -> DataFrame {
    let groups = split_by(df, &["x".to_string()]);
    let mut x_col: Vec<DataValue> = Vec::new();
    let mut counts: Vec<f64> = Vec::new();

    for (_, rows) in &groups {
        x_col.push(df.cell(rows[0], "x"));
        counts.push(rows.len() as f64);
    }

    let mut out = DataFrame::new();
    out.add_column("x", x_col);
    out.add_column_f64("count", &counts);
    out.add_column_f64("y", &counts);
    out
}

/// Aggregate y per distinct x value.
pub(crate) fn summarize(df: &DataFrame, fun: Aggregate, diag: &mut Diagnostics) -> DataFrame {
    let groups = split_by(df, &["x".to_string()]);
    let mut x_col: Vec<DataValue> = Vec::new();
    let mut y_col: Vec<f64> = Vec::new();

    for (_, rows) in &groups {
        let sub = df.select_rows(rows);
        let ys = super::numeric_column(&sub, "y", "summary", diag);
        match fun.reduce(&ys) {
            Some(v) => {
                x_col.push(df.cell(rows[0], "x"));
                y_col.push(v);
            }
            None => super::too_small("summary", 1, 0, diag),
        }
    }

    let mut out = DataFrame::new();
    out.add_column("x", x_col);
    out.add_column_f64("y", &y_col);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_first_seen_order() {
        let mut df = DataFrame::new();
        df.add_column_str("x", &["b", "a", "b", "b", "a"]);
        let out = count(&df);
        assert_eq!(out.nrow(), 2);
        assert_eq!(out.cell(0, "x").label(), "b");
        assert_eq!(out.cell(0, "count").as_f64(), Some(3.0));
        assert_eq!(out.cell(1, "count").as_f64(), Some(2.0));
    }

    #[test]
    fn test_count_total_matches_input() {
        let mut df = DataFrame::new();
        df.add_column_str("x", &["a", "b", "c", "a"]);
        let out = count(&df);
        let total: f64 = out.numeric("count").unwrap().into_iter().flatten().sum();
        assert!((total - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_mean_per_group() {
        let mut df = DataFrame::new();
        df.add_column_str("x", &["a", "a", "b"]);
        df.add_column_f64("y", &[1.0, 3.0, 10.0]);
        let mut diag = Diagnostics::new();
        let out = summarize(&df, Aggregate::Mean, &mut diag);
        assert_eq!(out.nrow(), 2);
        assert_eq!(out.cell(0, "y").as_f64(), Some(2.0));
        assert_eq!(out.cell(1, "y").as_f64(), Some(10.0));
    }

    #[test]
    fn test_summarize_all_non_numeric_group_skipped() {
        let mut df = DataFrame::new();
        df.add_column_str("x", &["a", "b"]);
        df.add_column("y", vec![DataValue::Text("bad".into()), DataValue::Number(5.0)]);
        let mut diag = Diagnostics::new();
        let out = summarize(&df, Aggregate::Sum, &mut diag);
        assert_eq!(out.nrow(), 1);
        assert_eq!(out.cell(0, "x").label(), "b");
        assert!(diag.has(crate::error::DiagnosticKind::GroupTooSmall));
    }
}
