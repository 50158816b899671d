//! Rendering: turning computed, scaled data into a scene graph.

pub(crate) mod annotate;
pub mod geoms;
pub(crate) mod guide;
pub mod scene;

pub use geoms::MarkRow;
pub use scene::{
    AxisGuide, LayerGroup, LegendEntry, LegendGuide, PanelGroup, Primitive, PrimitiveKind,
    SceneGraph, Strip, Style, Tick,
};
