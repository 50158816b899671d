//! Layers: one geometry plus its statistic, position adjustment, and
//! aesthetic overrides.

use super::aes::Aes;
use super::geom::GeomKind;
use super::position::PositionKind;
use super::stat::StatKind;
use crate::data::DataFrame;

/// One layer of a plot.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Geometry the layer draws.
    pub geom: GeomKind,
    /// Layer-level aesthetics, merged over the plot-level mapping.
    pub aes: Aes,
    /// Statistic; the geometry's default when unset.
    pub stat: Option<StatKind>,
    /// Position adjustment.
    pub position: PositionKind,
    /// Layer-specific data; the plot's data when unset.
    pub data: Option<DataFrame>,
    /// Whether this layer contributes entries to legends.
    pub show_legend: bool,
}

impl Layer {
    /// Create a layer for a geometry with default settings.
    #[must_use]
    pub fn new(geom: GeomKind) -> Self {
        Self {
            geom,
            aes: Aes::new(),
            stat: None,
            position: PositionKind::Identity,
            data: None,
            show_legend: true,
        }
    }

    /// Set layer-level aesthetics.
    #[must_use]
    pub fn aes(mut self, aes: Aes) -> Self {
        self.aes = aes;
        self
    }

    /// Override the statistic.
    #[must_use]
    pub fn stat(mut self, stat: StatKind) -> Self {
        self.stat = Some(stat);
        self
    }

    /// Set the position adjustment.
    #[must_use]
    pub fn position(mut self, position: PositionKind) -> Self {
        self.position = position;
        self
    }

    /// Attach layer-specific data.
    #[must_use]
    pub fn data(mut self, data: DataFrame) -> Self {
        self.data = Some(data);
        self
    }

    /// Exclude this layer from legends.
    #[must_use]
    pub fn hide_legend(mut self) -> Self {
        self.show_legend = false;
        self
    }

    /// The statistic that actually runs: the explicit one or the geometry's
    /// default.
    #[must_use]
    pub fn effective_stat(&self) -> StatKind {
        self.stat.clone().unwrap_or_else(|| self.geom.default_stat())
    }
}
