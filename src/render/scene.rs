//! The scene graph: resolved drawing instructions in pixel space.
//!
//! Rendering a plot produces a [`SceneGraph`], a backend-neutral tree of
//! styled primitives. A raster or vector backend can walk it without any
//! knowledge of data, scales, or statistics.

use crate::color::Rgba;
use crate::geometry::{Point, Rect};
use crate::grammar::geom::{LineType, PointShape};

/// A drawing style shared by all primitive kinds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    /// Interior color; `None` leaves the shape unfilled.
    pub fill: Option<Rgba>,
    /// Outline color; `None` leaves the shape unstroked.
    pub stroke: Option<Rgba>,
    /// Stroke width in pixels.
    pub stroke_width: f64,
    /// Dash pattern.
    pub linetype: LineType,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: None, stroke: Some(Rgba::BLACK), stroke_width: 1.0, linetype: LineType::Solid }
    }
}

/// A single drawable shape.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    /// A symbol centered on a point.
    Point {
        /// Center in pixels.
        center: Point,
        /// Symbol radius in pixels.
        radius: f64,
        /// Symbol shape.
        shape: PointShape,
    },
    /// An open stroked polyline.
    Polyline {
        /// Vertices in pixels.
        points: Vec<Point>,
    },
    /// A closed shape, filled and/or stroked.
    Polygon {
        /// Vertices in pixels; the last implicitly connects to the first.
        points: Vec<Point>,
    },
    /// An axis-aligned rectangle.
    Rect {
        /// Bounds in pixels.
        rect: Rect,
    },
    /// A text run.
    Text {
        /// Anchor point in pixels; text centers on it horizontally.
        anchor: Point,
        /// Text content.
        content: String,
        /// Font size in pixels.
        size: f64,
    },
}

/// A styled primitive traced back to the row that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Primitive {
    /// Index of the source row in the layer's computed frame.
    pub index: usize,
    /// Shape to draw.
    pub kind: PrimitiveKind,
    /// How to draw it.
    pub style: Style,
}

/// All primitives a layer produced inside one panel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerGroup {
    /// Geometry name, for backends that want per-layer handling.
    pub geom: String,
    /// Primitives in draw order.
    pub primitives: Vec<Primitive>,
}

/// One tick on an axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick {
    /// Pixel position along the axis.
    pub position: f64,
    /// Tick label.
    pub label: String,
}

/// An axis guide attached to a panel edge.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisGuide {
    /// Axis title.
    pub label: String,
    /// Ticks in axis order.
    pub ticks: Vec<Tick>,
}

/// One entry in a legend.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegendEntry {
    /// Entry label.
    pub label: String,
    /// Key swatch color.
    pub swatch: Rgba,
    /// Key symbol, when a shape scale contributed.
    pub shape: Option<PointShape>,
    /// Key line pattern, when a linetype scale contributed.
    pub linetype: Option<LineType>,
}

/// A legend guide. Legends for different channels that share a title and
/// level set merge into one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegendGuide {
    /// Legend title.
    pub title: String,
    /// Entries in scale order.
    pub entries: Vec<LegendEntry>,
}

/// A facet strip above a panel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Strip {
    /// Strip label.
    pub label: String,
    /// Strip bounds in pixels.
    pub rect: Rect,
}

/// Everything drawn inside one panel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelGroup {
    /// Panel drawing area in pixels.
    pub viewport: Rect,
    /// Facet strip, when faceted.
    pub strip: Option<Strip>,
    /// Panel background fill.
    pub backdrop: Option<Rgba>,
    /// Grid lines, drawn beneath the data.
    pub grid: Vec<Primitive>,
    /// X axis guide.
    pub x_axis: AxisGuide,
    /// Y axis guide.
    pub y_axis: AxisGuide,
    /// Data layers in draw order.
    pub layers: Vec<LayerGroup>,
    /// Annotations, drawn above the data.
    pub annotations: Vec<Primitive>,
}

/// The root of the rendered scene.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneGraph {
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
    /// Figure background.
    pub background: Rgba,
    /// Figure title.
    pub title: Option<String>,
    /// Panels in row-major order.
    pub panels: Vec<PanelGroup>,
    /// Merged legends.
    pub legends: Vec<LegendGuide>,
}

impl SceneGraph {
    /// Total primitive count across panels, layers, and annotations.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.panels
            .iter()
            .map(|p| {
                p.layers.iter().map(|l| l.primitives.len()).sum::<usize>()
                    + p.annotations.len()
                    + p.grid.len()
            })
            .sum()
    }

    /// Find a panel's layer group by geometry name.
    #[must_use]
    pub fn layer(&self, panel: usize, geom: &str) -> Option<&LayerGroup> {
        self.panels.get(panel)?.layers.iter().find(|l| l.geom == geom)
    }
}
