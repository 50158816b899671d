//! # Vizgram
//!
//! A Grammar of Graphics layout engine producing format-agnostic vector
//! scene graphs.
//!
//! Vizgram turns a declarative plot specification (data, aesthetic
//! mappings, layers, scales, coordinates, facets) into a [`render::SceneGraph`]:
//! a tree of styled drawing primitives in pixel space that any raster,
//! vector, or terminal backend can consume without knowing anything about
//! data or statistics.
//!
//! ## Quick Start
//!
//! ```rust
//! use vizgram::prelude::*;
//!
//! let data = DataFrame::from_xy(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 1.0, 5.0]);
//! let plot = Plot::new(data)
//!     .aes(Aes::new().x("x").y("y"))
//!     .layer(Layer::new(GeomKind::Point))
//!     .title("Example");
//!
//! let output = vizgram::render(&plot)?;
//! assert_eq!(output.scene.panels.len(), 1);
//! # Ok::<(), vizgram::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! Rendering runs a fixed sequence of stages: validation, facet
//! partitioning, per-group statistics, position adjustment, scale
//! training and mapping, coordinate projection, and guide assembly.
//! Configuration problems fail eagerly with an [`Error`]; data problems
//! are recovered and reported through [`error::Diagnostic`] entries.
//!
//! ## Feature Flags
//!
//! - `serde`: Serialize/Deserialize derives on the scene graph and guides
//! - `tracing`: debug events at pipeline stage boundaries

#![warn(missing_docs)]
// Allow unwrap() in tests only; banned in production code.
#![cfg_attr(test, allow(clippy::unwrap_used))]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and color space conversions.
pub mod color;

/// Columnar data frame consumed by the pipeline.
pub mod data;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Scale training, transforms, breaks, and palettes.
pub mod scale;

// ============================================================================
// Grammar Modules
// ============================================================================

/// Grammar of Graphics specification types.
pub mod grammar;

/// Position adjustments (dodge, stack, fill, jitter, nudge).
pub mod adjust;

/// Statistical transforms (bin, boxplot, smooth, density, ...).
pub mod stats;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Facet panel assignment and layout.
pub mod panel;

/// The render pipeline orchestrator.
pub mod pipeline;

/// Scene graph types and geometry renderers.
pub mod render;

// ============================================================================
// Error Types
// ============================================================================

/// Error and diagnostic types.
pub mod error;

mod log;

pub use error::{Error, Result};
pub use pipeline::{render, RenderOutput};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types for convenient imports.
///
/// ```rust
/// use vizgram::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{Hsla, Rgba};
    pub use crate::data::{DataFrame, DataValue};
    pub use crate::error::{Diagnostic, DiagnosticKind, Error, Result};
    pub use crate::geometry::{Point, Rect};
    pub use crate::grammar::aes::Aes;
    pub use crate::grammar::annotation::Annotation;
    pub use crate::grammar::coord::Coord;
    pub use crate::grammar::facet::{Facet, ScaleSharing};
    pub use crate::grammar::geom::{GeomKind, LineType, PointShape};
    pub use crate::grammar::layer::Layer;
    pub use crate::grammar::plot::Plot;
    pub use crate::grammar::position::PositionKind;
    pub use crate::grammar::stat::{Aggregate, SmoothMethod, StatKind};
    pub use crate::grammar::theme::Theme;
    pub use crate::pipeline::{render, RenderOutput};
    pub use crate::render::SceneGraph;
    pub use crate::scale::{ScaleSpec, Transform};
}
