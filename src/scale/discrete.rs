//! Discrete scale: trains an ordered level set, then maps labels to
//! level indices.

use crate::data::DataValue;

/// A discrete scale over text levels.
///
/// Levels accumulate in first-seen order during training, unless an
/// explicit level order was supplied, in which case training never adds
/// levels and unseen labels map to `None`. Like the continuous scale, the
/// life cycle has a training phase and a mapping phase; mapping before
/// [`DiscreteScale::finish`] panics.
#[derive(Debug, Clone)]
pub struct DiscreteScale {
    levels: Vec<String>,
    explicit: bool,
    finished: bool,
}

impl DiscreteScale {
    /// Create an untrained scale that collects levels in first-seen order.
    #[must_use]
    pub fn new() -> Self {
        Self { levels: Vec::new(), explicit: false, finished: false }
    }

    /// Create a scale with a fixed level order.
    #[must_use]
    pub fn with_levels(levels: &[String]) -> Self {
        Self { levels: levels.to_vec(), explicit: true, finished: false }
    }

    /// Fold a batch of cell values into the level set.
    pub fn train(&mut self, values: &[DataValue]) {
        if self.explicit {
            return;
        }
        for v in values {
            if v.is_null() {
                continue;
            }
            let label = v.label();
            if !self.levels.contains(&label) {
                self.levels.push(label);
            }
        }
    }

    /// Merge another scale's levels, preserving this scale's order and
    /// appending unseen levels in the other's order.
    pub fn merge(&mut self, other: &DiscreteScale) {
        if self.explicit {
            return;
        }
        for level in &other.levels {
            if !self.levels.contains(level) {
                self.levels.push(level.clone());
            }
        }
    }

    /// Close training.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Map a label to its level index.
    ///
    /// `None` for labels outside the level set; the caller substitutes the
    /// missing-value visual and records a diagnostic.
    ///
    /// # Panics
    ///
    /// Panics when called before [`DiscreteScale::finish`].
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        assert!(self.finished, "discrete scale used before training was finished");
        self.levels.iter().position(|l| l == label)
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no levels were trained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Levels in scale order.
    #[must_use]
    pub fn levels(&self) -> &[String] {
        &self.levels
    }
}

impl Default for DiscreteScale {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(labels: &[&str]) -> Vec<DataValue> {
        labels.iter().map(|&l| DataValue::Text(l.to_string())).collect()
    }

    #[test]
    fn test_first_seen_order() {
        let mut s = DiscreteScale::new();
        s.train(&values(&["b", "a", "b", "c"]));
        s.finish();
        assert_eq!(s.levels(), &["b", "a", "c"]);
        assert_eq!(s.index_of("a"), Some(1));
    }

    #[test]
    fn test_unknown_level_is_none() {
        let mut s = DiscreteScale::new();
        s.train(&values(&["a"]));
        s.finish();
        assert_eq!(s.index_of("z"), None);
    }

    #[test]
    #[should_panic(expected = "before training was finished")]
    fn test_map_before_finish_panics() {
        let s = DiscreteScale::new();
        let _ = s.index_of("a");
    }

    #[test]
    fn test_explicit_levels_ignore_training() {
        let mut s = DiscreteScale::with_levels(&["hi".to_string(), "lo".to_string()]);
        s.train(&values(&["lo", "other"]));
        s.finish();
        assert_eq!(s.levels(), &["hi", "lo"]);
        assert_eq!(s.index_of("other"), None);
    }

    #[test]
    fn test_nulls_do_not_train() {
        let mut s = DiscreteScale::new();
        s.train(&[DataValue::Null, DataValue::Text("a".into())]);
        s.finish();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_merge_appends_unseen() {
        let mut a = DiscreteScale::new();
        a.train(&values(&["x", "y"]));
        let mut b = DiscreteScale::new();
        b.train(&values(&["y", "z"]));
        a.merge(&b);
        a.finish();
        assert_eq!(a.levels(), &["x", "y", "z"]);
    }

    #[test]
    fn test_numeric_values_train_by_label() {
        let mut s = DiscreteScale::new();
        s.train(&[DataValue::Number(2.0), DataValue::Number(1.0)]);
        s.finish();
        assert_eq!(s.levels(), &["2", "1"]);
    }
}
