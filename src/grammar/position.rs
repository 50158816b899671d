//! Position adjustment kinds.
//!
//! A position adjustment resolves overlap between marks that share a
//! position after the statistic runs. The engine that applies them lives in
//! [`crate::adjust`].

/// Position adjustment kind attached to a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionKind {
    /// Leave positions as the statistic produced them.
    Identity,
    /// Place grouped marks side by side within each x slot.
    Dodge {
        /// Total width of the dodged cluster as a fraction of one slot.
        width: f64,
    },
    /// Dodge only over groups actually present at each x slot, with padding
    /// between neighbours.
    Dodge2 {
        /// Gap between adjacent marks as a fraction of one mark width.
        padding: f64,
    },
    /// Stack grouped marks on top of each other within each x slot.
    Stack {
        /// Stack in reverse group order.
        reverse: bool,
    },
    /// Stack then rescale each x slot so the column sums to one.
    Fill {
        /// Stack in reverse group order.
        reverse: bool,
    },
    /// Add deterministic pseudo-random offsets to x and y.
    Jitter {
        /// Maximum absolute x offset in data units; default when unset is
        /// 40% of the data resolution.
        width: Option<f64>,
        /// Maximum absolute y offset in data units.
        height: Option<f64>,
        /// PRNG seed; a fixed default seed is used when unset.
        seed: Option<u64>,
    },
    /// Shift every mark by a constant offset.
    Nudge {
        /// X offset in data units.
        x: f64,
        /// Y offset in data units.
        y: f64,
    },
}

impl Default for PositionKind {
    fn default() -> Self {
        PositionKind::Identity
    }
}

impl PositionKind {
    /// Dodge with the default cluster width.
    #[must_use]
    pub fn dodge() -> Self {
        PositionKind::Dodge { width: 0.9 }
    }

    /// Dodge2 with the default padding.
    #[must_use]
    pub fn dodge2() -> Self {
        PositionKind::Dodge2 { padding: 0.1 }
    }

    /// Stack in the usual group order.
    #[must_use]
    pub fn stack() -> Self {
        PositionKind::Stack { reverse: false }
    }

    /// Fill in the usual group order.
    #[must_use]
    pub fn fill() -> Self {
        PositionKind::Fill { reverse: false }
    }

    /// Jitter with default amounts and the fixed default seed.
    #[must_use]
    pub fn jitter() -> Self {
        PositionKind::Jitter { width: None, height: None, seed: None }
    }

    /// Short name used in errors and diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PositionKind::Identity => "identity",
            PositionKind::Dodge { .. } => "dodge",
            PositionKind::Dodge2 { .. } => "dodge2",
            PositionKind::Stack { .. } => "stack",
            PositionKind::Fill { .. } => "fill",
            PositionKind::Jitter { .. } => "jitter",
            PositionKind::Nudge { .. } => "nudge",
        }
    }
}
