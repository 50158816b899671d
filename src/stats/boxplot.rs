//! Five-number summaries with whiskers and outliers.

use crate::data::{split_by, DataFrame, DataValue};
use crate::error::Diagnostics;

/// Boxplot statistic, one box per distinct x value.
///
/// Emits rows tagged by a `role` column: one `"box"` row per x position
/// with the quartiles and whisker reach, plus one `"outlier"` row per
/// value beyond the whiskers.
pub(crate) fn boxplot(df: &DataFrame, coef: f64, diag: &mut Diagnostics) -> DataFrame {
    let mut out = DataFrame::new();
    let mut x_col: Vec<DataValue> = Vec::new();
    let mut role: Vec<DataValue> = Vec::new();
    let mut ymin = Vec::new();
    let mut lower = Vec::new();
    let mut middle = Vec::new();
    let mut upper = Vec::new();
    let mut ymax = Vec::new();
    let mut y_col: Vec<DataValue> = Vec::new();

    let mut push_box = |x: DataValue, stats: [f64; 5]| {
        x_col.push(x);
        role.push(DataValue::Text("box".to_string()));
        ymin.push(DataValue::Number(stats[0]));
        lower.push(DataValue::Number(stats[1]));
        middle.push(DataValue::Number(stats[2]));
        upper.push(DataValue::Number(stats[3]));
        ymax.push(DataValue::Number(stats[4]));
        y_col.push(DataValue::Null);
    };

    let groups = split_by(df, &["x".to_string()]);
    let mut outliers: Vec<(DataValue, f64)> = Vec::new();

    for (_, rows) in &groups {
        let sub = df.select_rows(rows);
        let mut ys = super::numeric_column(&sub, "y", "boxplot", diag);
        if ys.is_empty() {
            super::too_small("boxplot", 1, 0, diag);
            continue;
        }
        ys.sort_by(f64::total_cmp);

        let q1 = super::quantile(&ys, 0.25);
        let q2 = super::quantile(&ys, 0.5);
        let q3 = super::quantile(&ys, 0.75);
        let iqr = q3 - q1;
        let reach_lo = q1 - coef * iqr;
        let reach_hi = q3 + coef * iqr;

        let whisker_lo = ys.iter().copied().find(|&v| v >= reach_lo).unwrap_or(q1);
        let whisker_hi = ys.iter().rev().copied().find(|&v| v <= reach_hi).unwrap_or(q3);

        let x = sub.cell(0, "x");
        push_box(x.clone(), [whisker_lo, q1, q2, q3, whisker_hi]);
        for &v in &ys {
            if v < whisker_lo || v > whisker_hi {
                outliers.push((x.clone(), v));
            }
        }
    }

    for (x, v) in outliers {
        x_col.push(x);
        role.push(DataValue::Text("outlier".to_string()));
        ymin.push(DataValue::Null);
        lower.push(DataValue::Null);
        middle.push(DataValue::Null);
        upper.push(DataValue::Null);
        ymax.push(DataValue::Null);
        y_col.push(DataValue::Number(v));
    }

    out.add_column("x", x_col);
    out.add_column("role", role);
    out.add_column("ymin", ymin);
    out.add_column("lower", lower);
    out.add_column("middle", middle);
    out.add_column("upper", upper);
    out.add_column("ymax", ymax);
    out.add_column("y", y_col);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(x: &[&str], y: &[f64]) -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column_str("x", x);
        df.add_column_f64("y", y);
        df
    }

    #[test]
    fn test_single_group_quartiles() {
        let df = frame(&["a"; 5], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut diag = Diagnostics::new();
        let out = boxplot(&df, 1.5, &mut diag);
        assert_eq!(out.nrow(), 1);
        assert_relative_eq!(out.cell(0, "middle").as_f64().unwrap(), 3.0);
        assert_relative_eq!(out.cell(0, "lower").as_f64().unwrap(), 2.0);
        assert_relative_eq!(out.cell(0, "upper").as_f64().unwrap(), 4.0);
    }

    #[test]
    fn test_outlier_detected() {
        let df = frame(&["a"; 6], &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
        let mut diag = Diagnostics::new();
        let out = boxplot(&df, 1.5, &mut diag);
        let roles: Vec<String> = (0..out.nrow()).map(|r| out.cell(r, "role").label()).collect();
        assert!(roles.contains(&"outlier".to_string()));
        let outlier_row = roles.iter().position(|r| r == "outlier").unwrap();
        assert_relative_eq!(out.cell(outlier_row, "y").as_f64().unwrap(), 100.0);
        // Whisker stops at the most extreme value inside reach.
        assert_relative_eq!(out.cell(0, "ymax").as_f64().unwrap(), 5.0);
    }

    #[test]
    fn test_two_groups_two_boxes() {
        let df = frame(&["a", "a", "a", "b", "b", "b"], &[1.0, 2.0, 3.0, 10.0, 20.0, 30.0]);
        let mut diag = Diagnostics::new();
        let out = boxplot(&df, 1.5, &mut diag);
        assert_eq!(out.nrow(), 2);
        assert_eq!(out.cell(0, "x").label(), "a");
        assert_eq!(out.cell(1, "x").label(), "b");
        assert_relative_eq!(out.cell(1, "middle").as_f64().unwrap(), 20.0);
    }

    #[test]
    fn test_constant_group_degenerate_box() {
        let df = frame(&["a"; 3], &[4.0, 4.0, 4.0]);
        let mut diag = Diagnostics::new();
        let out = boxplot(&df, 1.5, &mut diag);
        assert_eq!(out.nrow(), 1);
        assert_relative_eq!(out.cell(0, "ymin").as_f64().unwrap(), 4.0);
        assert_relative_eq!(out.cell(0, "ymax").as_f64().unwrap(), 4.0);
    }
}
