//! Columnar data abstraction consumed by the pipeline.
//!
//! A [`DataFrame`] is an ordered, named-column table of heterogeneous typed
//! values. Frames are immutable once handed to the pipeline; every stage
//! builds a new frame rather than mutating in place.

/// A value in a data frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// A numeric value.
    Number(f64),
    /// A text (categorical) value.
    Text(String),
    /// A missing value.
    Null,
}

impl DataValue {
    /// Get as f64, or None if not a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string slice, or None if not text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Whether the value is missing.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// A display form used for grouping keys and facet/strip labels.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            DataValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            DataValue::Text(s) => s.clone(),
            DataValue::Null => "NA".to_string(),
        }
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Number(v)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

/// An ordered columnar data frame.
///
/// Columns keep their insertion order, and all columns share one row count.
/// Shorter columns are padded with [`DataValue::Null`].
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    columns: Vec<(String, Vec<DataValue>)>,
    n_rows: usize,
}

impl DataFrame {
    /// Create a new empty data frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from x and y arrays.
    #[must_use]
    pub fn from_xy(x: &[f64], y: &[f64]) -> Self {
        let n = x.len().min(y.len());
        let mut df = Self::new();
        df.add_column_f64("x", &x[..n]);
        df.add_column_f64("y", &y[..n]);
        df
    }

    /// Add a numeric column, replacing any column of the same name.
    pub fn add_column_f64(&mut self, name: &str, data: &[f64]) {
        let values = data.iter().map(|&v| DataValue::Number(v)).collect();
        self.add_column(name, values);
    }

    /// Add a text column, replacing any column of the same name.
    pub fn add_column_str(&mut self, name: &str, data: &[&str]) {
        let values = data.iter().map(|&s| DataValue::Text(s.to_string())).collect();
        self.add_column(name, values);
    }

    /// Add a column of values, replacing any column of the same name.
    pub fn add_column(&mut self, name: &str, values: Vec<DataValue>) {
        self.n_rows = self.n_rows.max(values.len());
        if let Some(slot) = self.columns.iter_mut().find(|(n, _)| n == name) {
            slot.1 = values;
        } else {
            self.columns.push((name.to_string(), values));
        }
    }

    /// Get a column's values.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[DataValue]> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_slice())
    }

    /// Get one cell, padding short columns with null.
    #[must_use]
    pub fn cell(&self, row: usize, name: &str) -> DataValue {
        match self.column(name) {
            Some(col) => col.get(row).cloned().unwrap_or(DataValue::Null),
            None => DataValue::Null,
        }
    }

    /// Get a column as f64 values, aligned to the row count.
    ///
    /// Non-numeric and missing cells come back as `None` so row alignment is
    /// preserved; use [`DataFrame::column`] for the raw values.
    #[must_use]
    pub fn numeric(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let col = self.column(name)?;
        let mut out: Vec<Option<f64>> = col.iter().map(DataValue::as_f64).collect();
        out.resize(self.n_rows, None);
        Some(out)
    }

    /// Whether any non-null cell of the column is text.
    #[must_use]
    pub fn is_discrete(&self, name: &str) -> bool {
        self.column(name)
            .is_some_and(|col| col.iter().any(|v| matches!(v, DataValue::Text(_))))
    }

    /// Number of rows.
    #[must_use]
    pub fn nrow(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Column names in insertion order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Build a new frame containing only the given rows, in the given order.
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut out = Self::new();
        for (name, _) in &self.columns {
            let values = rows.iter().map(|&r| self.cell(r, name)).collect();
            out.add_column(name, values);
        }
        out.n_rows = rows.len();
        out
    }

    /// Append another frame's rows; the column set is the union of both.
    pub fn append(&mut self, other: &DataFrame) {
        let offset = self.n_rows;
        let total = offset + other.n_rows;

        for (name, _) in &other.columns {
            if !self.has_column(name) {
                self.columns.push((name.clone(), vec![DataValue::Null; offset]));
            }
        }
        for (name, values) in &mut self.columns {
            values.resize(offset, DataValue::Null);
            match other.column(name) {
                Some(col) => {
                    values.extend(col.iter().cloned());
                    values.resize(total, DataValue::Null);
                }
                None => values.resize(total, DataValue::Null),
            }
        }
        self.n_rows = total;
    }
}

/// Split row indices into groups keyed by the given columns.
///
/// Groups appear in first-seen row order; each group's indices keep their
/// original order. Rows with a null key cell group under the "NA" label.
#[must_use]
pub fn split_by(df: &DataFrame, keys: &[String]) -> Vec<(String, Vec<usize>)> {
    if keys.is_empty() {
        return vec![(String::new(), (0..df.nrow()).collect())];
    }

    let mut order: Vec<String> = Vec::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for row in 0..df.nrow() {
        let key = keys
            .iter()
            .map(|k| df.cell(row, k).label())
            .collect::<Vec<_>>()
            .join("\u{1f}");

        match order.iter().position(|k| *k == key) {
            Some(i) => groups[i].push(row),
            None => {
                order.push(key);
                groups.push(vec![row]);
            }
        }
    }

    order.into_iter().zip(groups).collect()
}
