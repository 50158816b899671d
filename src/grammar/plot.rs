//! The plot specification: data, mappings, layers, and figure-level
//! settings assembled with a builder.

use super::aes::Aes;
use super::annotation::Annotation;
use super::coord::Coord;
use super::facet::Facet;
use super::layer::Layer;
use super::theme::Theme;
use crate::color::Rgba;
use crate::data::DataFrame;
use crate::scale::ScaleSpec;

/// Figure and axis labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    /// Figure title.
    pub title: Option<String>,
    /// X axis label; the mapped column name when unset.
    pub x: Option<String>,
    /// Y axis label; the mapped column name when unset.
    pub y: Option<String>,
}

/// A complete plot specification.
///
/// Building a `Plot` never touches the data; all validation and
/// computation happens when the plot is handed to
/// [`crate::pipeline::render`].
#[derive(Debug, Clone)]
pub struct Plot {
    /// Default data for all layers.
    pub data: DataFrame,
    /// Plot-level aesthetic mapping, inherited by every layer.
    pub aes: Aes,
    /// Layers in draw order.
    pub layers: Vec<Layer>,
    /// Coordinate system.
    pub coord: Coord,
    /// Facet specification.
    pub facet: Facet,
    /// Theme.
    pub theme: Theme,
    /// Annotations drawn over every panel.
    pub annotations: Vec<Annotation>,
    /// X scale overrides.
    pub x_scale: ScaleSpec,
    /// Y scale overrides.
    pub y_scale: ScaleSpec,
    /// Color shown for values outside a discrete scale's domain.
    pub missing_color: Rgba,
    /// Figure width in output units.
    pub width: u32,
    /// Figure height in output units.
    pub height: u32,
    /// Figure and axis labels.
    pub labels: Labels,
}

impl Plot {
    /// Create a plot over a data frame.
    #[must_use]
    pub fn new(data: DataFrame) -> Self {
        Self {
            data,
            aes: Aes::new(),
            layers: Vec::new(),
            coord: Coord::Cartesian,
            facet: Facet::None,
            theme: Theme::default(),
            annotations: Vec::new(),
            x_scale: ScaleSpec::default(),
            y_scale: ScaleSpec::default(),
            missing_color: Rgba::GREY50,
            width: 800,
            height: 600,
            labels: Labels::default(),
        }
    }

    /// Set the plot-level aesthetic mapping.
    #[must_use]
    pub fn aes(mut self, aes: Aes) -> Self {
        self.aes = aes;
        self
    }

    /// Add a layer.
    #[must_use]
    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Set the coordinate system.
    #[must_use]
    pub fn coord(mut self, coord: Coord) -> Self {
        self.coord = coord;
        self
    }

    /// Set the facet specification.
    #[must_use]
    pub fn facet(mut self, facet: Facet) -> Self {
        self.facet = facet;
        self
    }

    /// Set the theme.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Add an annotation.
    #[must_use]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Override the x scale.
    #[must_use]
    pub fn scale_x(mut self, spec: ScaleSpec) -> Self {
        self.x_scale = spec;
        self
    }

    /// Override the y scale.
    #[must_use]
    pub fn scale_y(mut self, spec: ScaleSpec) -> Self {
        self.y_scale = spec;
        self
    }

    /// Set the figure size in output units.
    #[must_use]
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the figure title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.labels.title = Some(title.to_string());
        self
    }

    /// Set the x axis label.
    #[must_use]
    pub fn xlab(mut self, label: &str) -> Self {
        self.labels.x = Some(label.to_string());
        self
    }

    /// Set the y axis label.
    #[must_use]
    pub fn ylab(mut self, label: &str) -> Self {
        self.labels.y = Some(label.to_string());
        self
    }

    /// The x axis label to display: explicit label or mapped column name.
    #[must_use]
    pub fn x_label(&self) -> String {
        self.labels
            .x
            .clone()
            .or_else(|| self.aes.mapping("x").map(str::to_string))
            .unwrap_or_default()
    }

    /// The y axis label to display: explicit label or mapped column name.
    #[must_use]
    pub fn y_label(&self) -> String {
        self.labels
            .y
            .clone()
            .or_else(|| self.aes.mapping("y").map(str::to_string))
            .unwrap_or_default()
    }
}
