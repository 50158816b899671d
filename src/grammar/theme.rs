//! Plot themes: non-data visual settings.

use crate::color::Rgba;

/// Non-data visual settings for a plot.
///
/// Themes are plain values attached to a plot; there is no global default
/// registry. [`Theme::grey`] is the default.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Color behind the whole figure.
    pub background: Rgba,
    /// Color behind each panel.
    pub panel_background: Rgba,
    /// Major grid line color; `None` disables the grid.
    pub grid: Option<Rgba>,
    /// Axis tick label color.
    pub axis_text: Rgba,
    /// Axis and legend title color.
    pub title_text: Rgba,
    /// Facet strip background color.
    pub strip_background: Rgba,
    /// Facet strip label color.
    pub strip_text: Rgba,
    /// Base font size in output units.
    pub base_size: f64,
    /// Margin around the figure in output units.
    pub margin: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self::grey()
    }
}

impl Theme {
    /// Grey panels with white grid lines.
    #[must_use]
    pub fn grey() -> Self {
        Self {
            background: Rgba::WHITE,
            panel_background: Rgba::rgb(235, 235, 235),
            grid: Some(Rgba::WHITE),
            axis_text: Rgba::rgb(77, 77, 77),
            title_text: Rgba::BLACK,
            strip_background: Rgba::rgb(217, 217, 217),
            strip_text: Rgba::rgb(26, 26, 26),
            base_size: 11.0,
            margin: 8.0,
        }
    }

    /// White panels with light grey grid lines.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            grid: Some(Rgba::rgb(229, 229, 229)),
            strip_background: Rgba::WHITE,
            ..Self::grey()
        }
    }

    /// White panels, grey grid, black panel border feel.
    #[must_use]
    pub fn bw() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            grid: Some(Rgba::rgb(229, 229, 229)),
            strip_background: Rgba::rgb(217, 217, 217),
            ..Self::grey()
        }
    }

    /// Dark panels with muted grid lines.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            background: Rgba::rgb(38, 38, 38),
            panel_background: Rgba::rgb(51, 51, 51),
            grid: Some(Rgba::rgb(77, 77, 77)),
            axis_text: Rgba::rgb(204, 204, 204),
            title_text: Rgba::WHITE,
            strip_background: Rgba::rgb(26, 26, 26),
            strip_text: Rgba::rgb(204, 204, 204),
            base_size: 11.0,
            margin: 8.0,
        }
    }

    /// No panel decoration at all.
    #[must_use]
    pub fn void() -> Self {
        Self {
            panel_background: Rgba::TRANSPARENT,
            grid: None,
            strip_background: Rgba::TRANSPARENT,
            ..Self::grey()
        }
    }
}
