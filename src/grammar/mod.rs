//! The plot grammar: the declarative types a caller assembles before
//! rendering.
//!
//! A [`plot::Plot`] holds data, an aesthetic mapping, layers, and
//! figure-level settings. Nothing here computes; the pipeline consumes the
//! finished specification.

pub mod aes;
pub mod annotation;
pub mod coord;
pub mod facet;
pub mod geom;
pub mod layer;
pub mod plot;
pub mod position;
pub mod stat;
pub mod theme;

pub use aes::Aes;
pub use annotation::{Annotation, AnnotationKind};
pub use coord::{Coord, ThetaAxis};
pub use facet::{Facet, ScaleSharing};
pub use geom::{GeomKind, LineType, PointShape};
pub use layer::Layer;
pub use plot::{Labels, Plot};
pub use position::PositionKind;
pub use stat::{Aggregate, BinParams, DensityParams, SmoothMethod, SmoothParams, StatKind};
pub use theme::Theme;
