//! Aesthetic mappings: which data columns drive which visual channels.

use super::geom::{LineType, PointShape};
use crate::color::Rgba;

/// All mappable channels, in a fixed order used by validation and guides.
pub const CHANNELS: &[&str] = &[
    "x", "y", "xmin", "xmax", "ymin", "ymax", "xend", "yend", "z", "color", "fill", "size",
    "shape", "linetype", "alpha", "label", "group",
];

/// An aesthetic specification: column mappings plus fixed visual values.
///
/// A layer's effective mapping is the plot-level `Aes` with the layer-level
/// one merged on top (see [`Aes::merged_over`]). Fixed values apply to every
/// mark in the layer and never train a scale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aes {
    /// Mapped channels as (channel, column) pairs in insertion order.
    mappings: Vec<(String, String)>,
    /// Fixed stroke color.
    pub color_value: Option<Rgba>,
    /// Fixed fill color.
    pub fill_value: Option<Rgba>,
    /// Fixed mark size.
    pub size_value: Option<f64>,
    /// Fixed opacity in `[0, 1]`.
    pub alpha_value: Option<f64>,
    /// Fixed point shape.
    pub shape_value: Option<PointShape>,
    /// Fixed line type.
    pub linetype_value: Option<LineType>,
}

impl Aes {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a channel to a column, replacing any prior mapping of the same
    /// channel. Unknown channel names are kept verbatim and rejected later
    /// by plot validation.
    #[must_use]
    pub fn map(mut self, channel: &str, column: &str) -> Self {
        if let Some(slot) = self.mappings.iter_mut().find(|(c, _)| c == channel) {
            slot.1 = column.to_string();
        } else {
            self.mappings.push((channel.to_string(), column.to_string()));
        }
        self
    }

    /// Map the x channel.
    #[must_use]
    pub fn x(self, column: &str) -> Self {
        self.map("x", column)
    }

    /// Map the y channel.
    #[must_use]
    pub fn y(self, column: &str) -> Self {
        self.map("y", column)
    }

    /// Map the color channel.
    #[must_use]
    pub fn color(self, column: &str) -> Self {
        self.map("color", column)
    }

    /// Map the fill channel.
    #[must_use]
    pub fn fill(self, column: &str) -> Self {
        self.map("fill", column)
    }

    /// Map the group channel.
    #[must_use]
    pub fn group(self, column: &str) -> Self {
        self.map("group", column)
    }

    /// Set a fixed stroke color.
    #[must_use]
    pub fn color_fixed(mut self, color: Rgba) -> Self {
        self.color_value = Some(color);
        self
    }

    /// Set a fixed fill color.
    #[must_use]
    pub fn fill_fixed(mut self, color: Rgba) -> Self {
        self.fill_value = Some(color);
        self
    }

    /// Set a fixed size.
    #[must_use]
    pub fn size_fixed(mut self, size: f64) -> Self {
        self.size_value = Some(size);
        self
    }

    /// Set a fixed opacity.
    #[must_use]
    pub fn alpha_fixed(mut self, alpha: f64) -> Self {
        self.alpha_value = Some(alpha);
        self
    }

    /// The column mapped to a channel, if any.
    #[must_use]
    pub fn mapping(&self, channel: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|(c, _)| c == channel)
            .map(|(_, col)| col.as_str())
    }

    /// All (channel, column) pairs in insertion order.
    #[must_use]
    pub fn mappings(&self) -> &[(String, String)] {
        &self.mappings
    }

    /// Columns that define grouping: the explicit group mapping when
    /// present, otherwise the union of the discrete-ish visual channels.
    #[must_use]
    pub fn group_columns(&self) -> Vec<String> {
        if let Some(g) = self.mapping("group") {
            return vec![g.to_string()];
        }
        let mut out = Vec::new();
        for ch in ["color", "fill", "shape", "linetype"] {
            if let Some(col) = self.mapping(ch) {
                if !out.iter().any(|c| c == col) {
                    out.push(col.to_string());
                }
            }
        }
        out
    }

    /// This mapping layered over a base: mapped channels and fixed values
    /// here win; everything else comes from the base.
    #[must_use]
    pub fn merged_over(&self, base: &Aes) -> Aes {
        let mut out = base.clone();
        for (channel, column) in &self.mappings {
            out = out.map(channel, column);
        }
        out.color_value = self.color_value.or(base.color_value);
        out.fill_value = self.fill_value.or(base.fill_value);
        out.size_value = self.size_value.or(base.size_value);
        out.alpha_value = self.alpha_value.or(base.alpha_value);
        out.shape_value = self.shape_value.or(base.shape_value);
        out.linetype_value = self.linetype_value.or(base.linetype_value);
        out
    }
}
