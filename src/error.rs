//! Error and diagnostic types for vizgram operations.
//!
//! Configuration problems abort a render before any row is processed and
//! surface as [`Error`]. Recoverable data problems (non-numeric cells,
//! non-positive values under a log transform, degenerate groups) never fail
//! the render; they are recorded as [`Diagnostic`] entries on the render
//! output instead.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or rendering a chart.
///
/// Every variant is a configuration error: it is detectable from the chart
/// specification and the dataset schema alone, before any row is processed.
#[derive(Error, Debug)]
pub enum Error {
    /// The chart has no geometry layers.
    #[error("chart has no layers")]
    NoLayers,

    /// A geometry requires an aesthetic that is neither mapped nor supplied
    /// by the layer's statistic.
    #[error("geom_{geom} requires the `{channel}` aesthetic")]
    MissingAesthetic {
        /// Geometry kind name.
        geom: &'static str,
        /// Missing channel name.
        channel: &'static str,
    },

    /// An aesthetic is mapped to a column that does not exist in the data.
    #[error("column `{column}` mapped to `{channel}` not found in data")]
    UnknownColumn {
        /// Column name that was not found.
        column: String,
        /// Channel the column was mapped to.
        channel: &'static str,
    },

    /// A faceting variable does not exist in the data.
    #[error("facet variable `{0}` not found in data")]
    MissingFacetVariable(String),

    /// A statistic, position, or scale parameter is out of its valid range.
    #[error("invalid parameter for {context}: {message}")]
    InvalidParameter {
        /// Which component the parameter belongs to.
        context: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// A scale was given an empty or inverted explicit domain.
    #[error("scale domain error: {0}")]
    ScaleDomain(String),

    /// Chart dimensions are too small to lay out any panel.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in output units.
        width: f64,
        /// Requested height in output units.
        height: f64,
    },
}

/// Classification of a recovered data problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// A cell expected to be numeric was text or missing.
    NonNumeric,
    /// A value was outside a transform's domain (e.g. log10 of a
    /// non-positive number) and was dropped from training and mapping.
    OutOfTransformDomain,
    /// A group was degenerate for its statistic (zero variance, collinear,
    /// or otherwise unusable) and produced no output rows.
    DegenerateGroup,
    /// A group had fewer rows than its statistic requires.
    GroupTooSmall,
    /// A discrete value not present in the trained domain was mapped to the
    /// designated missing visual.
    UnknownLevel,
}

/// One recovered data problem, observable by callers and tests.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// What kind of problem occurred.
    pub kind: DiagnosticKind,
    /// Human-readable description naming the layer/stat/scale involved.
    pub message: String,
    /// How many rows or values were affected.
    pub affected: usize,
}

/// Accumulator for [`Diagnostic`] entries during one render pass.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recovered data problem.
    pub fn push(&mut self, kind: DiagnosticKind, message: impl Into<String>, affected: usize) {
        let message = message.into();
        crate::log::warn!(?kind, affected, "{message}");
        self.entries.push(Diagnostic { kind, message, affected });
    }

    /// All entries recorded so far.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Whether any problem of the given kind was recorded.
    #[must_use]
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    /// Consume the accumulator, yielding its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
