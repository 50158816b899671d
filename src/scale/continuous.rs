//! Continuous scale: trains a numeric domain, then maps to `[0, 1]`.

use super::breaks::{format_break, pretty_breaks};
use super::transform::Transform;
use crate::error::{DiagnosticKind, Diagnostics};

/// A continuous scale with an explicit two-phase life cycle.
///
/// The scale trains by folding observed values into a running domain, in
/// scale space. Training is associative, so panels and layers can train in
/// any order and merge. Calling [`ContinuousScale::map`] before
/// [`ContinuousScale::finish`] is a programming error and panics.
#[derive(Debug, Clone)]
pub struct ContinuousScale {
    transform: Transform,
    limits: Option<(f64, f64)>,
    domain: Option<(f64, f64)>,
    expanded: Option<(f64, f64)>,
}

impl ContinuousScale {
    /// Fraction of the domain span added on each side of positional scales.
    pub const DEFAULT_EXPAND: f64 = 0.05;

    /// Create an untrained scale.
    #[must_use]
    pub fn new(transform: Transform) -> Self {
        Self { transform, limits: None, domain: None, expanded: None }
    }

    /// Fix the domain to explicit limits in data units, overriding whatever
    /// training observes.
    #[must_use]
    pub fn with_limits(mut self, lo: f64, hi: f64) -> Self {
        self.limits = Some((lo, hi));
        self
    }

    /// Fold a batch of data-space values into the domain.
    ///
    /// Values outside the transform's domain are skipped and reported once
    /// per batch through `diag`.
    pub fn train(&mut self, values: &[f64], context: &str, diag: &mut Diagnostics) {
        let mut dropped = 0usize;
        for &v in values {
            match self.transform.apply(v) {
                Some(f) => self.extend(f),
                None => {
                    if v.is_finite() {
                        dropped += 1;
                    }
                }
            }
        }
        if dropped > 0 {
            diag.push(
                DiagnosticKind::OutOfTransformDomain,
                format!(
                    "{context}: {dropped} value(s) outside the {} transform domain",
                    self.transform.name()
                ),
                dropped,
            );
        }
    }

    /// Fold a single scale-space value into the domain.
    pub fn extend(&mut self, f: f64) {
        if !f.is_finite() {
            return;
        }
        self.domain = Some(match self.domain {
            None => (f, f),
            Some((lo, hi)) => (lo.min(f), hi.max(f)),
        });
    }

    /// Merge another scale's trained domain into this one.
    pub fn merge(&mut self, other: &ContinuousScale) {
        if let Some((lo, hi)) = other.domain {
            self.extend(lo);
            self.extend(hi);
        }
    }

    /// Close training: apply limits, widen degenerate domains, expand.
    ///
    /// `expand` is the fraction of the span added on each side; pass zero
    /// for non-positional scales.
    pub fn finish(&mut self, expand: f64) {
        let trained = match self.limits {
            Some((lo, hi)) => {
                let flo = self.transform.apply(lo);
                let fhi = self.transform.apply(hi);
                match (flo, fhi) {
                    (Some(a), Some(b)) => Some((a.min(b), a.max(b))),
                    _ => self.domain,
                }
            }
            None => self.domain,
        };

        let (mut lo, mut hi) = trained.unwrap_or((0.0, 1.0));
        if hi - lo < f64::EPSILON {
            lo -= 0.5;
            hi += 0.5;
        }
        let pad = (hi - lo) * expand;
        self.expanded = Some((lo - pad, hi + pad));
    }

    /// Whether training has observed at least one value.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.domain.is_some() || self.limits.is_some()
    }

    /// The trained domain in scale space, before expansion.
    #[must_use]
    pub fn domain(&self) -> Option<(f64, f64)> {
        self.domain
    }

    /// Map a data-space value to `[0, 1]`.
    ///
    /// `None` when the value is outside the transform's domain or not
    /// finite; such rows are dropped by the caller with a diagnostic.
    ///
    /// # Panics
    ///
    /// Panics when called before [`ContinuousScale::finish`].
    #[must_use]
    pub fn map(&self, v: f64) -> Option<f64> {
        let (lo, hi) = self.expanded_domain();
        let f = self.transform.apply(v)?;
        Some((f - lo) / (hi - lo))
    }

    /// Data value at a normalized position, the inverse of
    /// [`ContinuousScale::map`].
    ///
    /// # Panics
    ///
    /// Panics when called before [`ContinuousScale::finish`].
    #[must_use]
    pub fn invert(&self, t: f64) -> f64 {
        let (lo, hi) = self.expanded_domain();
        self.transform.invert(lo + t * (hi - lo))
    }

    /// Axis breaks as (normalized position, label) pairs.
    ///
    /// # Panics
    ///
    /// Panics when called before [`ContinuousScale::finish`].
    #[must_use]
    pub fn breaks(&self, target: usize) -> Vec<(f64, String)> {
        let (lo, hi) = self.expanded_domain();
        pretty_breaks(lo, hi, target)
            .into_iter()
            .map(|b| ((b - lo) / (hi - lo), format_break(self.transform.invert(b))))
            .collect()
    }

    /// Override the break positions with explicit data-unit values.
    ///
    /// # Panics
    ///
    /// Panics when called before [`ContinuousScale::finish`].
    #[must_use]
    pub fn breaks_at(&self, values: &[f64]) -> Vec<(f64, String)> {
        let (lo, hi) = self.expanded_domain();
        values
            .iter()
            .filter_map(|&v| {
                let f = self.transform.apply(v)?;
                Some(((f - lo) / (hi - lo), format_break(v)))
            })
            .collect()
    }

    fn expanded_domain(&self) -> (f64, f64) {
        match self.expanded {
            Some(d) => d,
            None => panic!("continuous scale used before training was finished"),
        }
    }
}


// ============================================================================
// Property-based tests with proptest
// ============================================================================
