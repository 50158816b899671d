//! Faceting: partitioning rows into a grid of panels.

/// How positional scales are shared across facet panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleSharing {
    /// One x and one y scale shared by every panel.
    #[default]
    Shared,
    /// Each panel trains its own x and y scales.
    Free,
    /// Free x, shared y.
    FreeX,
    /// Shared x, free y.
    FreeY,
}

impl ScaleSharing {
    /// Whether panels share the x scale.
    #[must_use]
    pub fn shares_x(self) -> bool {
        matches!(self, ScaleSharing::Shared | ScaleSharing::FreeY)
    }

    /// Whether panels share the y scale.
    #[must_use]
    pub fn shares_y(self) -> bool {
        matches!(self, ScaleSharing::Shared | ScaleSharing::FreeX)
    }
}

/// Facet specification attached to a plot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Facet {
    /// A single panel containing every row.
    #[default]
    None,
    /// One panel per level of a variable, wrapped into rows.
    Wrap {
        /// Faceting column name.
        var: String,
        /// Number of panel columns; computed from the level count when
        /// unset.
        ncol: Option<usize>,
        /// Scale sharing across panels.
        scales: ScaleSharing,
    },
    /// A panel grid with rows keyed by one variable and columns by another.
    Grid {
        /// Column name for grid rows; `None` means one grid row.
        rows: Option<String>,
        /// Column name for grid columns; `None` means one grid column.
        cols: Option<String>,
        /// Scale sharing across panels.
        scales: ScaleSharing,
    },
}

impl Facet {
    /// Wrap faceting with shared scales and automatic column count.
    #[must_use]
    pub fn wrap(var: &str) -> Self {
        Facet::Wrap { var: var.to_string(), ncol: None, scales: ScaleSharing::Shared }
    }

    /// Grid faceting with shared scales.
    #[must_use]
    pub fn grid(rows: Option<&str>, cols: Option<&str>) -> Self {
        Facet::Grid {
            rows: rows.map(str::to_string),
            cols: cols.map(str::to_string),
            scales: ScaleSharing::Shared,
        }
    }

    /// The scale sharing mode; a single panel always behaves as shared.
    #[must_use]
    pub fn scales(&self) -> ScaleSharing {
        match self {
            Facet::None => ScaleSharing::Shared,
            Facet::Wrap { scales, .. } | Facet::Grid { scales, .. } => *scales,
        }
    }

    /// Column names the facet partitions on.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        match self {
            Facet::None => Vec::new(),
            Facet::Wrap { var, .. } => vec![var.as_str()],
            Facet::Grid { rows, cols, .. } => {
                rows.iter().chain(cols.iter()).map(String::as_str).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sharing_axes() {
        assert!(ScaleSharing::Shared.shares_x());
        assert!(ScaleSharing::Shared.shares_y());
        assert!(!ScaleSharing::Free.shares_x());
        assert!(ScaleSharing::FreeX.shares_y());
        assert!(!ScaleSharing::FreeX.shares_x());
        assert!(ScaleSharing::FreeY.shares_x());
    }

    #[test]
    fn test_facet_variables() {
        assert!(Facet::None.variables().is_empty());
        assert_eq!(Facet::wrap("cyl").variables(), vec!["cyl"]);
        assert_eq!(Facet::grid(Some("a"), Some("b")).variables(), vec!["a", "b"]);
        assert_eq!(Facet::grid(None, Some("b")).variables(), vec!["b"]);
    }
}
