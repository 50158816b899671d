//! Geometry kinds and the shape/linetype vocabularies they draw with.

use super::stat::StatKind;

/// Shape codes for point geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointShape {
    /// Filled circle.
    #[default]
    Circle,
    /// Filled square.
    Square,
    /// Filled triangle.
    Triangle,
    /// Diamond shape.
    Diamond,
    /// Cross (+).
    Cross,
    /// X shape.
    X,
}

/// Dash patterns for strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineType {
    /// Solid stroke.
    #[default]
    Solid,
    /// Dashed stroke.
    Dashed,
    /// Dotted stroke.
    Dotted,
    /// Alternating dot-dash stroke.
    DotDash,
    /// Long dashes.
    LongDash,
    /// Two-dash pattern.
    TwoDash,
}

/// Geometry kind: which visual primitive a layer draws.
#[derive(Debug, Clone, PartialEq)]
pub enum GeomKind {
    /// One mark per row.
    Point,
    /// Rows connected in x order, one polyline per group.
    Line,
    /// Rows connected in row order, one polyline per group.
    Path,
    /// Vertical interval bars.
    Bar {
        /// Bar width as a fraction of one categorical unit.
        width: f64,
    },
    /// Filled region between the y series and the baseline.
    Area,
    /// Filled region between ymin and ymax.
    Ribbon,
    /// Closed filled shape, one per group (and per `piece` when present).
    Polygon,
    /// Axis-aligned rectangle centered on (x, y).
    Tile,
    /// Regular grid of tiles emitted as a single raster block.
    Raster,
    /// A text run per row.
    Text {
        /// Font size in output units.
        size: f64,
    },
    /// A line segment per row, from (x, y) to (xend, yend).
    Segment,
    /// Box-and-whisker glyph per x position.
    Boxplot {
        /// Box width as a fraction of one categorical unit.
        width: f64,
    },
}

impl GeomKind {
    /// Bar geometry with the default width.
    #[must_use]
    pub fn bar() -> Self {
        GeomKind::Bar { width: 0.9 }
    }

    /// Text geometry with the default size.
    #[must_use]
    pub fn text() -> Self {
        GeomKind::Text { size: 11.0 }
    }

    /// Boxplot geometry with the default width.
    #[must_use]
    pub fn boxplot() -> Self {
        GeomKind::Boxplot { width: 0.75 }
    }

    /// Short name used in errors and scene graph groups.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GeomKind::Point => "point",
            GeomKind::Line => "line",
            GeomKind::Path => "path",
            GeomKind::Bar { .. } => "bar",
            GeomKind::Area => "area",
            GeomKind::Ribbon => "ribbon",
            GeomKind::Polygon => "polygon",
            GeomKind::Tile => "tile",
            GeomKind::Raster => "raster",
            GeomKind::Text { .. } => "text",
            GeomKind::Segment => "segment",
            GeomKind::Boxplot { .. } => "boxplot",
        }
    }

    /// Aesthetics that must be available after the layer's statistic runs.
    #[must_use]
    pub fn required_aes(&self) -> &'static [&'static str] {
        match self {
            GeomKind::Point | GeomKind::Line | GeomKind::Path | GeomKind::Tile => &["x", "y"],
            GeomKind::Bar { .. } => &["x"],
            GeomKind::Area => &["x", "y"],
            GeomKind::Ribbon => &["x", "ymin", "ymax"],
            GeomKind::Polygon => &["x", "y"],
            GeomKind::Raster => &["x", "y", "fill"],
            GeomKind::Text { .. } => &["x", "y", "label"],
            GeomKind::Segment => &["x", "y", "xend", "yend"],
            GeomKind::Boxplot { .. } => &["x", "y"],
        }
    }

    /// The statistic a layer of this geometry defaults to.
    #[must_use]
    pub fn default_stat(&self) -> StatKind {
        match self {
            GeomKind::Bar { .. } => StatKind::Count,
            GeomKind::Boxplot { .. } => StatKind::boxplot(),
            _ => StatKind::Identity,
        }
    }
}
