//! Facet panel assignment and layout.
//!
//! Assignment partitions data rows into panels; layout turns the panel
//! grid into pixel viewports. Every data row lands in exactly one panel.

use crate::data::DataFrame;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::grammar::facet::Facet;

/// One panel of a faceted plot.
#[derive(Debug, Clone)]
pub struct PanelDef {
    /// Panel index in row-major order.
    pub index: usize,
    /// Zero-based grid row.
    pub grid_row: usize,
    /// Zero-based grid column.
    pub grid_col: usize,
    /// Strip label; `None` for an unfaceted plot.
    pub strip: Option<String>,
    /// Indices into the plot data belonging to this panel.
    pub rows: Vec<usize>,
}

/// The full set of panels and the grid shape they occupy.
#[derive(Debug, Clone)]
pub struct PanelSet {
    /// Panels in row-major order.
    pub panels: Vec<PanelDef>,
    /// Grid rows.
    pub nrow: usize,
    /// Grid columns.
    pub ncol: usize,
}

/// Distinct labels of a column in first-seen row order; nulls label as
/// "NA" and form their own level.
fn levels_of(df: &DataFrame, var: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in 0..df.nrow() {
        let label = df.cell(row, var).label();
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

/// Partition data rows into panels per the facet specification.
///
/// # Errors
///
/// Returns [`Error::MissingFacetVariable`] when a faceting column does not
/// exist in the data.
pub fn assign(df: &DataFrame, facet: &Facet) -> Result<PanelSet> {
    for var in facet.variables() {
        if !df.has_column(var) {
            return Err(Error::MissingFacetVariable(var.to_string()));
        }
    }

    match facet {
        Facet::None => Ok(PanelSet {
            panels: vec![PanelDef {
                index: 0,
                grid_row: 0,
                grid_col: 0,
                strip: None,
                rows: (0..df.nrow()).collect(),
            }],
            nrow: 1,
            ncol: 1,
        }),
        Facet::Wrap { var, ncol, .. } => {
            let levels = levels_of(df, var);
            let n = levels.len().max(1);
            let ncol = ncol.unwrap_or_else(|| (n as f64).sqrt().ceil() as usize).max(1);
            let nrow = n.div_ceil(ncol);

            let mut panels: Vec<PanelDef> = levels
                .iter()
                .enumerate()
                .map(|(i, level)| PanelDef {
                    index: i,
                    grid_row: i / ncol,
                    grid_col: i % ncol,
                    strip: Some(level.clone()),
                    rows: Vec::new(),
                })
                .collect();

            for row in 0..df.nrow() {
                let label = df.cell(row, var).label();
                if let Some(i) = levels.iter().position(|l| *l == label) {
                    panels[i].rows.push(row);
                }
            }
            Ok(PanelSet { panels, nrow, ncol })
        }
        Facet::Grid { rows, cols, .. } => {
            let row_levels = match rows {
                Some(var) => levels_of(df, var),
                None => vec![String::new()],
            };
            let col_levels = match cols {
                Some(var) => levels_of(df, var),
                None => vec![String::new()],
            };
            let nrow = row_levels.len().max(1);
            let ncol = col_levels.len().max(1);

            // The grid is complete: a combination with no data still gets
            // an (empty) panel.
            let mut panels = Vec::with_capacity(nrow * ncol);
            for (ri, rl) in row_levels.iter().enumerate() {
                for (ci, cl) in col_levels.iter().enumerate() {
                    let strip = match (rl.is_empty(), cl.is_empty()) {
                        (true, true) => None,
                        (true, false) => Some(cl.clone()),
                        (false, true) => Some(rl.clone()),
                        (false, false) => Some(format!("{rl} / {cl}")),
                    };
                    panels.push(PanelDef {
                        index: ri * ncol + ci,
                        grid_row: ri,
                        grid_col: ci,
                        strip,
                        rows: Vec::new(),
                    });
                }
            }

            for row in 0..df.nrow() {
                let ri = match rows {
                    Some(var) => {
                        let label = df.cell(row, var).label();
                        row_levels.iter().position(|l| *l == label).unwrap_or(0)
                    }
                    None => 0,
                };
                let ci = match cols {
                    Some(var) => {
                        let label = df.cell(row, var).label();
                        col_levels.iter().position(|l| *l == label).unwrap_or(0)
                    }
                    None => 0,
                };
                panels[ri * ncol + ci].rows.push(row);
            }
            Ok(PanelSet { panels, nrow, ncol })
        }
    }
}

/// Per-panel strip and drawing viewports inside a content area.
///
/// Returns `(strip, panel)` rectangles in row-major order. The strip rect
/// has zero height when `strip_height` is zero.
#[must_use]
pub fn viewports(
    area: Rect,
    nrow: usize,
    ncol: usize,
    gap: f64,
    strip_height: f64,
) -> Vec<(Rect, Rect)> {
    let nrow = nrow.max(1);
    let ncol = ncol.max(1);
    let cell_w = (area.width - gap * (ncol as f64 - 1.0)) / ncol as f64;
    let cell_h = (area.height - gap * (nrow as f64 - 1.0)) / nrow as f64;

    let mut out = Vec::with_capacity(nrow * ncol);
    for r in 0..nrow {
        for c in 0..ncol {
            let x = area.x + c as f64 * (cell_w + gap);
            let y = area.y + r as f64 * (cell_h + gap);
            let strip = Rect::new(x, y, cell_w, strip_height);
            let panel = Rect::new(x, y + strip_height, cell_w, (cell_h - strip_height).max(0.0));
            out.push((strip, panel));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faceted_frame() -> DataFrame {
        let mut df = DataFrame::from_xy(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        df.add_column_str("g", &["b", "a", "b", "c", "a"]);
        df
    }

    #[test]
    fn test_no_facet_single_panel() {
        let set = assign(&faceted_frame(), &Facet::None).unwrap();
        assert_eq!(set.panels.len(), 1);
        assert_eq!(set.panels[0].rows.len(), 5);
        assert!(set.panels[0].strip.is_none());
    }

    #[test]
    fn test_wrap_first_seen_levels() {
        let set = assign(&faceted_frame(), &Facet::wrap("g")).unwrap();
        assert_eq!(set.panels.len(), 3);
        let strips: Vec<&str> = set
            .panels
            .iter()
            .map(|p| p.strip.as_deref().unwrap())
            .collect();
        assert_eq!(strips, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_every_row_in_exactly_one_panel() {
        let set = assign(&faceted_frame(), &Facet::wrap("g")).unwrap();
        let mut seen = vec![0usize; 5];
        for p in &set.panels {
            for &r in &p.rows {
                seen[r] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_wrap_layout_shape() {
        let set = assign(&faceted_frame(), &Facet::wrap("g")).unwrap();
        // Three levels wrap into a 2x2 grid with one empty cell.
        assert_eq!(set.ncol, 2);
        assert_eq!(set.nrow, 2);
        assert_eq!(set.panels[2].grid_row, 1);
        assert_eq!(set.panels[2].grid_col, 0);
    }

    #[test]
    fn test_wrap_explicit_ncol() {
        let facet = Facet::Wrap {
            var: "g".to_string(),
            ncol: Some(3),
            scales: crate::grammar::facet::ScaleSharing::Shared,
        };
        let set = assign(&faceted_frame(), &facet).unwrap();
        assert_eq!(set.ncol, 3);
        assert_eq!(set.nrow, 1);
    }

    #[test]
    fn test_grid_complete_even_when_empty() {
        let mut df = faceted_frame();
        df.add_column_str("h", &["x", "y", "x", "x", "y"]);
        // "c" only pairs with "x", but the c/y panel still exists.
        let set = assign(&df, &Facet::grid(Some("g"), Some("h"))).unwrap();
        assert_eq!(set.panels.len(), 6);
        let empty = set.panels.iter().filter(|p| p.rows.is_empty()).count();
        assert_eq!(empty, 1);
    }

    #[test]
    fn test_missing_variable_errors() {
        let err = assign(&faceted_frame(), &Facet::wrap("nope")).unwrap_err();
        assert!(matches!(err, Error::MissingFacetVariable(_)));
    }

    #[test]
    fn test_viewports_tile_the_area() {
        let area = Rect::new(0.0, 0.0, 210.0, 100.0);
        let vps = viewports(area, 1, 2, 10.0, 0.0);
        assert_eq!(vps.len(), 2);
        assert!((vps[0].1.width - 100.0).abs() < 1e-9);
        assert!((vps[1].1.x - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_viewports_strip_above_panel() {
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        let vps = viewports(area, 1, 1, 0.0, 15.0);
        let (strip, panel) = vps[0];
        assert!((strip.height - 15.0).abs() < 1e-9);
        assert!((panel.y - 15.0).abs() < 1e-9);
        assert!((panel.height - 85.0).abs() < 1e-9);
    }
}
