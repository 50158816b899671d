//! Geometry renderers: normalized mark rows in, styled primitives out.

use crate::color::Rgba;
use crate::geometry::{Point, Rect};
use crate::grammar::coord::Coord;
use crate::grammar::geom::{GeomKind, LineType, PointShape};
use crate::render::scene::{LayerGroup, Primitive, PrimitiveKind, Style};

/// Segments per edge when projecting straight edges through a curved
/// coordinate system.
const CURVE_STEPS: usize = 16;

/// One data row with its positions normalized to `[0, 1]` and every visual
/// channel resolved to a concrete value.
#[derive(Debug, Clone)]
pub struct MarkRow {
    /// Index of the source row in the layer's computed frame.
    pub index: usize,
    /// Group index the row belongs to.
    pub group: i64,
    /// Normalized x position.
    pub x: Option<f64>,
    /// Normalized y position.
    pub y: Option<f64>,
    /// Normalized lower x bound.
    pub xmin: Option<f64>,
    /// Normalized upper x bound.
    pub xmax: Option<f64>,
    /// Normalized lower y bound.
    pub ymin: Option<f64>,
    /// Normalized upper y bound.
    pub ymax: Option<f64>,
    /// Normalized segment end x.
    pub xend: Option<f64>,
    /// Normalized segment end y.
    pub yend: Option<f64>,
    /// Normalized box lower hinge.
    pub lower: Option<f64>,
    /// Normalized box median.
    pub middle: Option<f64>,
    /// Normalized box upper hinge.
    pub upper: Option<f64>,
    /// Normalized mark width.
    pub width: Option<f64>,
    /// Normalized mark height.
    pub height: Option<f64>,
    /// Polygon piece id.
    pub piece: Option<i64>,
    /// Text content for label-bearing geometries.
    pub label: Option<String>,
    /// Row role emitted by compound statistics.
    pub role: Option<String>,
    /// Stroke color.
    pub color: Rgba,
    /// Fill color.
    pub fill: Rgba,
    /// Mark size in pixels.
    pub size: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Point shape.
    pub shape: PointShape,
    /// Line pattern.
    pub linetype: LineType,
}

impl Default for MarkRow {
    fn default() -> Self {
        Self {
            index: 0,
            group: 0,
            x: None,
            y: None,
            xmin: None,
            xmax: None,
            ymin: None,
            ymax: None,
            xend: None,
            yend: None,
            lower: None,
            middle: None,
            upper: None,
            width: None,
            height: None,
            piece: None,
            label: None,
            role: None,
            color: Rgba::BLACK,
            fill: Rgba::rgb(89, 89, 89),
            size: 1.5,
            alpha: 1.0,
            shape: PointShape::Circle,
            linetype: LineType::Solid,
        }
    }
}

fn fade(c: Rgba, alpha: f64) -> Rgba {
    c.with_alpha((f64::from(c.a) * alpha.clamp(0.0, 1.0)) as u8)
}

fn stroke_style(row: &MarkRow) -> Style {
    Style {
        fill: None,
        stroke: Some(fade(row.color, row.alpha)),
        stroke_width: row.size.max(0.5),
        linetype: row.linetype,
    }
}

fn fill_style(row: &MarkRow) -> Style {
    Style {
        fill: Some(fade(row.fill, row.alpha)),
        stroke: Some(fade(row.color, row.alpha)),
        stroke_width: 0.5,
        linetype: LineType::Solid,
    }
}

/// Project a normalized polyline, subdividing edges when the coordinate
/// system bends straight lines.
fn project_path(points: &[(f64, f64)], coord: &Coord, viewport: Rect) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }
    if !coord.is_curved() || points.len() < 2 {
        return points.iter().map(|&(x, y)| coord.project(x, y, viewport)).collect();
    }
    let mut out = vec![coord.project(points[0].0, points[0].1, viewport)];
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        for step in 1..=CURVE_STEPS {
            let t = step as f64 / CURVE_STEPS as f64;
            out.push(coord.project(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, viewport));
        }
    }
    out
}

/// An axis-aligned box in normalized space, projected into the viewport.
/// Flat coordinate systems produce a rect; curved ones a subdivided
/// polygon.
fn project_box(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    coord: &Coord,
    viewport: Rect,
) -> PrimitiveKind {
    if coord.is_curved() {
        let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)];
        PrimitiveKind::Polygon { points: project_path(&corners, coord, viewport) }
    } else {
        let a = coord.project(x0, y0, viewport);
        let b = coord.project(x1, y1, viewport);
        PrimitiveKind::Rect { rect: Rect::from_corners(a, b) }
    }
}

/// Rows bucketed by group index, ascending.
fn by_group(rows: &[MarkRow]) -> Vec<Vec<&MarkRow>> {
    let mut keys: Vec<i64> = rows.iter().map(|r| r.group).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.iter()
        .map(|&g| rows.iter().filter(|r| r.group == g).collect())
        .collect()
}

/// Render one layer's rows into primitives.
pub(crate) fn render(
    geom: &GeomKind,
    rows: &[MarkRow],
    coord: &Coord,
    viewport: Rect,
) -> LayerGroup {
    let primitives = match geom {
        GeomKind::Point => points(rows, coord, viewport),
        GeomKind::Line => lines(rows, coord, viewport, true),
        GeomKind::Path => lines(rows, coord, viewport, false),
        GeomKind::Bar { width } => bars(rows, *width, coord, viewport),
        GeomKind::Area => areas(rows, coord, viewport),
        GeomKind::Ribbon => ribbons(rows, coord, viewport),
        GeomKind::Polygon => polygons(rows, coord, viewport),
        GeomKind::Tile | GeomKind::Raster => tiles(rows, coord, viewport),
        GeomKind::Text { size } => texts(rows, *size, coord, viewport),
        GeomKind::Segment => segments(rows, coord, viewport),
        GeomKind::Boxplot { width } => boxplots(rows, *width, coord, viewport),
    };
    LayerGroup { geom: geom.name().to_string(), primitives }
}

fn points(rows: &[MarkRow], coord: &Coord, viewport: Rect) -> Vec<Primitive> {
    rows.iter()
        .filter_map(|row| {
            let (x, y) = (row.x?, row.y?);
            Some(Primitive {
                index: row.index,
                kind: PrimitiveKind::Point {
                    center: coord.project(x, y, viewport),
                    radius: row.size,
                    shape: row.shape,
                },
                style: Style {
                    fill: Some(fade(row.color, row.alpha)),
                    stroke: None,
                    stroke_width: 0.0,
                    linetype: LineType::Solid,
                },
            })
        })
        .collect()
}

fn lines(rows: &[MarkRow], coord: &Coord, viewport: Rect, sort_by_x: bool) -> Vec<Primitive> {
    let mut out = Vec::new();
    for group in by_group(rows) {
        let mut pts: Vec<(&MarkRow, (f64, f64))> = group
            .iter()
            .filter_map(|r| Some((*r, (r.x?, r.y?))))
            .collect();
        if pts.len() < 2 {
            continue;
        }
        if sort_by_x {
            pts.sort_by(|a, b| a.1 .0.total_cmp(&b.1 .0));
        }
        let coords: Vec<(f64, f64)> = pts.iter().map(|p| p.1).collect();
        out.push(Primitive {
            index: pts[0].0.index,
            kind: PrimitiveKind::Polyline { points: project_path(&coords, coord, viewport) },
            style: stroke_style(pts[0].0),
        });
    }
    out
}

fn bars(rows: &[MarkRow], default_width: f64, coord: &Coord, viewport: Rect) -> Vec<Primitive> {
    rows.iter()
        .filter_map(|row| {
            let x = row.x?;
            let top = row.ymax.or(row.y)?;
            let bottom = row.ymin.unwrap_or(0.0);
            let w = row.width.unwrap_or(default_width * 0.05);
            Some(Primitive {
                index: row.index,
                kind: project_box(x - w / 2.0, bottom, x + w / 2.0, top, coord, viewport),
                style: fill_style(row),
            })
        })
        .collect()
}

fn areas(rows: &[MarkRow], coord: &Coord, viewport: Rect) -> Vec<Primitive> {
    let mut out = Vec::new();
    for group in by_group(rows) {
        let mut pts: Vec<(&MarkRow, f64, f64, f64)> = group
            .iter()
            .filter_map(|r| Some((*r, r.x?, r.y?, r.ymin.unwrap_or(0.0))))
            .collect();
        if pts.len() < 2 {
            continue;
        }
        pts.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut ring: Vec<(f64, f64)> = pts.iter().map(|p| (p.1, p.2)).collect();
        ring.extend(pts.iter().rev().map(|p| (p.1, p.3)));
        out.push(Primitive {
            index: pts[0].0.index,
            kind: PrimitiveKind::Polygon { points: project_path(&ring, coord, viewport) },
            style: fill_style(pts[0].0),
        });
    }
    out
}

fn ribbons(rows: &[MarkRow], coord: &Coord, viewport: Rect) -> Vec<Primitive> {
    let mut out = Vec::new();
    for group in by_group(rows) {
        let mut pts: Vec<(&MarkRow, f64, f64, f64)> = group
            .iter()
            .filter_map(|r| Some((*r, r.x?, r.ymax?, r.ymin?)))
            .collect();
        if pts.len() < 2 {
            continue;
        }
        pts.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut ring: Vec<(f64, f64)> = pts.iter().map(|p| (p.1, p.2)).collect();
        ring.extend(pts.iter().rev().map(|p| (p.1, p.3)));
        out.push(Primitive {
            index: pts[0].0.index,
            kind: PrimitiveKind::Polygon { points: project_path(&ring, coord, viewport) },
            style: fill_style(pts[0].0),
        });
    }
    out
}

fn polygons(rows: &[MarkRow], coord: &Coord, viewport: Rect) -> Vec<Primitive> {
    let mut out = Vec::new();
    for group in by_group(rows) {
        // A group may hold several pieces, e.g. one per contour ring.
        let mut pieces: Vec<i64> = group.iter().map(|r| r.piece.unwrap_or(0)).collect();
        pieces.sort_unstable();
        pieces.dedup();

        for piece in pieces {
            let pts: Vec<(&MarkRow, (f64, f64))> = group
                .iter()
                .filter(|r| r.piece.unwrap_or(0) == piece)
                .filter_map(|r| Some((*r, (r.x?, r.y?))))
                .collect();
            if pts.len() < 3 {
                continue;
            }
            let coords: Vec<(f64, f64)> = pts.iter().map(|p| p.1).collect();
            out.push(Primitive {
                index: pts[0].0.index,
                kind: PrimitiveKind::Polygon { points: project_path(&coords, coord, viewport) },
                style: fill_style(pts[0].0),
            });
        }
    }
    out
}

fn tiles(rows: &[MarkRow], coord: &Coord, viewport: Rect) -> Vec<Primitive> {
    rows.iter()
        .filter_map(|row| {
            let (x, y) = (row.x?, row.y?);
            let w = row.width.unwrap_or(0.05);
            let h = row.height.unwrap_or(0.05);
            Some(Primitive {
                index: row.index,
                kind: project_box(x - w / 2.0, y - h / 2.0, x + w / 2.0, y + h / 2.0, coord, viewport),
                style: Style {
                    fill: Some(fade(row.fill, row.alpha)),
                    stroke: None,
                    stroke_width: 0.0,
                    linetype: LineType::Solid,
                },
            })
        })
        .collect()
}

fn texts(rows: &[MarkRow], size: f64, coord: &Coord, viewport: Rect) -> Vec<Primitive> {
    rows.iter()
        .filter_map(|row| {
            let (x, y) = (row.x?, row.y?);
            let content = row.label.clone()?;
            Some(Primitive {
                index: row.index,
                kind: PrimitiveKind::Text {
                    anchor: coord.project(x, y, viewport),
                    content,
                    size,
                },
                style: Style {
                    fill: Some(fade(row.color, row.alpha)),
                    stroke: None,
                    stroke_width: 0.0,
                    linetype: LineType::Solid,
                },
            })
        })
        .collect()
}

fn segments(rows: &[MarkRow], coord: &Coord, viewport: Rect) -> Vec<Primitive> {
    rows.iter()
        .filter_map(|row| {
            let line = [(row.x?, row.y?), (row.xend?, row.yend?)];
            Some(Primitive {
                index: row.index,
                kind: PrimitiveKind::Polyline { points: project_path(&line, coord, viewport) },
                style: stroke_style(row),
            })
        })
        .collect()
}

fn boxplots(rows: &[MarkRow], default_width: f64, coord: &Coord, viewport: Rect) -> Vec<Primitive> {
    let mut out = Vec::new();
    for row in rows {
        match row.role.as_deref() {
            Some("outlier") => {
                if let (Some(x), Some(y)) = (row.x, row.y) {
                    out.push(Primitive {
                        index: row.index,
                        kind: PrimitiveKind::Point {
                            center: coord.project(x, y, viewport),
                            radius: row.size,
                            shape: row.shape,
                        },
                        style: Style {
                            fill: Some(fade(row.color, row.alpha)),
                            stroke: None,
                            stroke_width: 0.0,
                            linetype: LineType::Solid,
                        },
                    });
                }
            }
            _ => {
                let (Some(x), Some(lo), Some(mid), Some(hi), Some(wlo), Some(whi)) =
                    (row.x, row.lower, row.middle, row.upper, row.ymin, row.ymax)
                else {
                    continue;
                };
                let w = row.width.unwrap_or(default_width * 0.05);
                let half = w / 2.0;

                // Whiskers, then the box, then the median on top.
                for (a, b) in [(wlo, lo), (hi, whi)] {
                    out.push(Primitive {
                        index: row.index,
                        kind: PrimitiveKind::Polyline {
                            points: project_path(&[(x, a), (x, b)], coord, viewport),
                        },
                        style: stroke_style(row),
                    });
                }
                out.push(Primitive {
                    index: row.index,
                    kind: project_box(x - half, lo, x + half, hi, coord, viewport),
                    style: fill_style(row),
                });
                out.push(Primitive {
                    index: row.index,
                    kind: PrimitiveKind::Polyline {
                        points: project_path(&[(x - half, mid), (x + half, mid)], coord, viewport),
                    },
                    style: stroke_style(row),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    fn xy(x: f64, y: f64) -> MarkRow {
        MarkRow { x: Some(x), y: Some(y), ..MarkRow::default() }
    }

    #[test]
    fn test_points_skip_missing() {
        let rows = vec![xy(0.5, 0.5), MarkRow::default()];
        let group = render(&GeomKind::Point, &rows, &Coord::Cartesian, VP);
        assert_eq!(group.primitives.len(), 1);
    }

    #[test]
    fn test_line_sorts_by_x() {
        let rows = vec![xy(0.9, 0.1), xy(0.1, 0.9), xy(0.5, 0.5)];
        let group = render(&GeomKind::Line, &rows, &Coord::Cartesian, VP);
        assert_eq!(group.primitives.len(), 1);
        match &group.primitives[0].kind {
            PrimitiveKind::Polyline { points } => {
                assert!(points.windows(2).all(|w| w[0].x <= w[1].x));
            }
            _ => panic!("expected polyline"),
        }
    }

    #[test]
    fn test_path_keeps_row_order() {
        let rows = vec![xy(0.9, 0.1), xy(0.1, 0.9)];
        let group = render(&GeomKind::Path, &rows, &Coord::Cartesian, VP);
        match &group.primitives[0].kind {
            PrimitiveKind::Polyline { points } => {
                assert!(points[0].x > points[1].x);
            }
            _ => panic!("expected polyline"),
        }
    }

    #[test]
    fn test_separate_groups_separate_lines() {
        let mut a = xy(0.1, 0.1);
        a.group = 0;
        let mut b = xy(0.2, 0.2);
        b.group = 0;
        let mut c = xy(0.3, 0.3);
        c.group = 1;
        let mut d = xy(0.4, 0.4);
        d.group = 1;
        let group = render(&GeomKind::Line, &[a, b, c, d], &Coord::Cartesian, VP);
        assert_eq!(group.primitives.len(), 2);
    }

    #[test]
    fn test_bar_spans_ymin_to_ymax() {
        let row = MarkRow {
            x: Some(0.5),
            ymin: Some(0.2),
            ymax: Some(0.8),
            width: Some(0.2),
            ..MarkRow::default()
        };
        let group = render(&GeomKind::bar(), &[row], &Coord::Cartesian, VP);
        match &group.primitives[0].kind {
            PrimitiveKind::Rect { rect } => {
                assert!((rect.height - 60.0).abs() < 1e-9);
                assert!((rect.width - 20.0).abs() < 1e-9);
            }
            _ => panic!("expected rect"),
        }
    }

    #[test]
    fn test_bar_in_polar_becomes_polygon() {
        let row = MarkRow {
            x: Some(0.5),
            ymin: Some(0.0),
            ymax: Some(0.8),
            width: Some(0.2),
            ..MarkRow::default()
        };
        let group = render(&GeomKind::bar(), &[row], &Coord::polar(), VP);
        assert!(matches!(group.primitives[0].kind, PrimitiveKind::Polygon { .. }));
    }

    #[test]
    fn test_ribbon_needs_bounds() {
        let row = MarkRow { x: Some(0.5), ymax: Some(0.8), ..MarkRow::default() };
        let group = render(&GeomKind::Ribbon, &[row], &Coord::Cartesian, VP);
        assert!(group.primitives.is_empty());
    }

    #[test]
    fn test_boxplot_box_and_whiskers() {
        let row = MarkRow {
            x: Some(0.5),
            ymin: Some(0.1),
            lower: Some(0.3),
            middle: Some(0.5),
            upper: Some(0.7),
            ymax: Some(0.9),
            width: Some(0.2),
            role: Some("box".to_string()),
            ..MarkRow::default()
        };
        let group = render(&GeomKind::boxplot(), &[row], &Coord::Cartesian, VP);
        // Two whiskers, one box, one median line.
        assert_eq!(group.primitives.len(), 4);
        let rects = group
            .primitives
            .iter()
            .filter(|p| matches!(p.kind, PrimitiveKind::Rect { .. }))
            .count();
        assert_eq!(rects, 1);
    }

    #[test]
    fn test_text_uses_label() {
        let row = MarkRow {
            x: Some(0.5),
            y: Some(0.5),
            label: Some("hi".to_string()),
            ..MarkRow::default()
        };
        let group = render(&GeomKind::text(), &[row], &Coord::Cartesian, VP);
        match &group.primitives[0].kind {
            PrimitiveKind::Text { content, .. } => assert_eq!(content, "hi"),
            _ => panic!("expected text"),
        }
    }

    #[test]
    fn test_curved_path_subdivides() {
        let rows = vec![xy(0.0, 1.0), xy(0.5, 1.0)];
        let group = render(&GeomKind::Path, &rows, &Coord::polar(), VP);
        match &group.primitives[0].kind {
            PrimitiveKind::Polyline { points } => assert!(points.len() > 2),
            _ => panic!("expected polyline"),
        }
    }
}
