//! Annotations: marks placed in data units without passing through the
//! statistics or position engines. They still project through scales and
//! the coordinate system.

use super::geom::LineType;
use crate::color::Rgba;

/// What an annotation draws.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationKind {
    /// Horizontal reference line at a y value.
    HLine {
        /// Y intercept in data units.
        y: f64,
    },
    /// Vertical reference line at an x value.
    VLine {
        /// X intercept in data units.
        x: f64,
    },
    /// Straight line with slope and intercept in data units.
    ABLine {
        /// Slope.
        slope: f64,
        /// Y intercept.
        intercept: f64,
    },
    /// Shaded rectangle spanning a data-unit box.
    Rect {
        /// Lower x bound.
        xmin: f64,
        /// Upper x bound.
        xmax: f64,
        /// Lower y bound.
        ymin: f64,
        /// Upper y bound.
        ymax: f64,
    },
    /// A text label at a data position.
    Text {
        /// X position in data units.
        x: f64,
        /// Y position in data units.
        y: f64,
        /// Text content.
        label: String,
        /// Font size in output units.
        size: f64,
    },
}

/// A single annotation with its visual style.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// What to draw.
    pub kind: AnnotationKind,
    /// Stroke or text color.
    pub color: Rgba,
    /// Fill color for rectangles.
    pub fill: Rgba,
    /// Dash pattern for lines.
    pub linetype: LineType,
    /// Stroke width in output units.
    pub width: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl Annotation {
    fn with_kind(kind: AnnotationKind) -> Self {
        Self {
            kind,
            color: Rgba::BLACK,
            fill: Rgba::new(0, 0, 0, 51),
            linetype: LineType::Dashed,
            width: 1.0,
            alpha: 1.0,
        }
    }

    /// Horizontal reference line.
    #[must_use]
    pub fn hline(y: f64) -> Self {
        Self::with_kind(AnnotationKind::HLine { y })
    }

    /// Vertical reference line.
    #[must_use]
    pub fn vline(x: f64) -> Self {
        Self::with_kind(AnnotationKind::VLine { x })
    }

    /// Slope-intercept reference line.
    #[must_use]
    pub fn abline(slope: f64, intercept: f64) -> Self {
        Self::with_kind(AnnotationKind::ABLine { slope, intercept })
    }

    /// Shaded rectangle.
    #[must_use]
    pub fn rect(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self::with_kind(AnnotationKind::Rect { xmin, xmax, ymin, ymax })
    }

    /// Text label.
    #[must_use]
    pub fn text(x: f64, y: f64, label: &str) -> Self {
        Self::with_kind(AnnotationKind::Text { x, y, label: label.to_string(), size: 11.0 })
    }

    /// Set the stroke or text color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the line type.
    #[must_use]
    pub fn linetype(mut self, linetype: LineType) -> Self {
        self.linetype = linetype;
        self
    }

    /// Set the stroke width.
    #[must_use]
    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
}
