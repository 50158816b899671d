//! Scale training and mapping.
//!
//! A scale lives through two phases: a training phase that folds observed
//! values into a domain, and a mapping phase after [`ContinuousScale::finish`]
//! or [`DiscreteScale::finish`] closes the domain. Training is an
//! associative reduction, so facet panels and layers can train
//! independently and merge in any order. Mapping before training has
//! finished is a bug in the pipeline and panics.

mod breaks;
mod continuous;
mod discrete;
mod palette;
mod transform;

pub use breaks::{format_break, pretty_breaks};
pub use continuous::ContinuousScale;
pub use discrete::DiscreteScale;
pub use palette::{blue_gradient, hue_palette, linetype_palette, shape_palette, size_range};
pub use transform::Transform;

/// Caller-supplied overrides for one positional scale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleSpec {
    /// Axis transform.
    pub transform: Transform,
    /// Fixed domain limits in data units.
    pub limits: Option<(f64, f64)>,
    /// Fixed discrete level order.
    pub levels: Option<Vec<String>>,
    /// Explicit break positions in data units.
    pub breaks: Option<Vec<f64>>,
}

impl ScaleSpec {
    /// Base-10 log transform.
    #[must_use]
    pub fn log10() -> Self {
        Self { transform: Transform::Log10, ..Self::default() }
    }

    /// Square-root transform.
    #[must_use]
    pub fn sqrt() -> Self {
        Self { transform: Transform::Sqrt, ..Self::default() }
    }

    /// Reversed axis.
    #[must_use]
    pub fn reverse() -> Self {
        Self { transform: Transform::Reverse, ..Self::default() }
    }

    /// Fixed limits in data units.
    #[must_use]
    pub fn with_limits(mut self, lo: f64, hi: f64) -> Self {
        self.limits = Some((lo, hi));
        self
    }

    /// Fixed discrete level order.
    #[must_use]
    pub fn with_levels(mut self, levels: &[&str]) -> Self {
        self.levels = Some(levels.iter().map(|&s| s.to_string()).collect());
        self
    }

    /// Explicit break positions.
    #[must_use]
    pub fn with_breaks(mut self, breaks: &[f64]) -> Self {
        self.breaks = Some(breaks.to_vec());
        self
    }

    /// A continuous scale honoring this spec.
    #[must_use]
    pub fn continuous(&self) -> ContinuousScale {
        let scale = ContinuousScale::new(self.transform);
        match self.limits {
            Some((lo, hi)) => scale.with_limits(lo, hi),
            None => scale,
        }
    }

    /// A discrete scale honoring this spec.
    #[must_use]
    pub fn discrete(&self) -> DiscreteScale {
        match &self.levels {
            Some(levels) => DiscreteScale::with_levels(levels),
            None => DiscreteScale::new(),
        }
    }
}
