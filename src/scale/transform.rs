//! Monotonic axis transforms applied before continuous training.

/// A monotonic transform between data space and scale space.
///
/// Training and break placement happen in scale space; tick labels show the
/// inverse-transformed data values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    /// No transform.
    #[default]
    Identity,
    /// Base-10 logarithm. Non-positive values are outside the domain.
    Log10,
    /// Square root. Negative values are outside the domain.
    Sqrt,
    /// Negation, which reverses the axis direction.
    Reverse,
}

impl Transform {
    /// Apply the transform. `None` when the value is outside the domain.
    #[must_use]
    pub fn apply(self, v: f64) -> Option<f64> {
        if !v.is_finite() {
            return None;
        }
        match self {
            Transform::Identity => Some(v),
            Transform::Log10 => (v > 0.0).then(|| v.log10()),
            Transform::Sqrt => (v >= 0.0).then(|| v.sqrt()),
            Transform::Reverse => Some(-v),
        }
    }

    /// Invert a scale-space value back to data space.
    #[must_use]
    pub fn invert(self, v: f64) -> f64 {
        match self {
            Transform::Identity => v,
            Transform::Log10 => 10f64.powf(v),
            Transform::Sqrt => v * v,
            Transform::Reverse => -v,
        }
    }

    /// Short name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Transform::Identity => "identity",
            Transform::Log10 => "log10",
            Transform::Sqrt => "sqrt",
            Transform::Reverse => "reverse",
        }
    }
}
