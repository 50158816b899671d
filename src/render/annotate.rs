//! Annotation rendering.
//!
//! Annotations carry data-unit positions; they map through the positional
//! scales and project through the coordinate system like any mark, but
//! never train the scales.

use crate::geometry::Rect;
use crate::grammar::annotation::{Annotation, AnnotationKind};
use crate::grammar::coord::Coord;
use crate::render::scene::{Primitive, PrimitiveKind, Style};
use crate::scale::ContinuousScale;

/// Sample count for reference lines, so they stay smooth under curved or
/// warped coordinate systems.
const LINE_SAMPLES: usize = 32;

/// Render the plot's annotations into one panel.
pub(crate) fn render(
    annotations: &[Annotation],
    x_scale: &ContinuousScale,
    y_scale: &ContinuousScale,
    coord: &Coord,
    viewport: Rect,
) -> Vec<Primitive> {
    annotations
        .iter()
        .enumerate()
        .filter_map(|(i, a)| one(i, a, x_scale, y_scale, coord, viewport))
        .collect()
}

fn line_style(a: &Annotation) -> Style {
    Style {
        fill: None,
        stroke: Some(a.color.with_alpha((f64::from(a.color.a) * a.alpha) as u8)),
        stroke_width: a.width,
        linetype: a.linetype,
    }
}

fn one(
    index: usize,
    a: &Annotation,
    x_scale: &ContinuousScale,
    y_scale: &ContinuousScale,
    coord: &Coord,
    viewport: Rect,
) -> Option<Primitive> {
    let kind = match &a.kind {
        AnnotationKind::HLine { y } => {
            let ty = y_scale.map(*y)?;
            let points = (0..=LINE_SAMPLES)
                .map(|i| {
                    let tx = i as f64 / LINE_SAMPLES as f64;
                    coord.project(tx, ty, viewport)
                })
                .collect();
            PrimitiveKind::Polyline { points }
        }
        AnnotationKind::VLine { x } => {
            let tx = x_scale.map(*x)?;
            let points = (0..=LINE_SAMPLES)
                .map(|i| {
                    let ty = i as f64 / LINE_SAMPLES as f64;
                    coord.project(tx, ty, viewport)
                })
                .collect();
            PrimitiveKind::Polyline { points }
        }
        AnnotationKind::ABLine { slope, intercept } => {
            // Sample in normalized x so the line tracks axis transforms.
            let points: Vec<_> = (0..=LINE_SAMPLES)
                .filter_map(|i| {
                    let tx = i as f64 / LINE_SAMPLES as f64;
                    let x = x_scale.invert(tx);
                    let ty = y_scale.map(slope * x + intercept)?;
                    Some(coord.project(tx, ty, viewport))
                })
                .collect();
            if points.len() < 2 {
                return None;
            }
            PrimitiveKind::Polyline { points }
        }
        AnnotationKind::Rect { xmin, xmax, ymin, ymax } => {
            let x0 = x_scale.map(*xmin)?;
            let x1 = x_scale.map(*xmax)?;
            let y0 = y_scale.map(*ymin)?;
            let y1 = y_scale.map(*ymax)?;
            if coord.is_curved() {
                let ring = [(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)];
                let points = ring
                    .windows(2)
                    .flat_map(|pair| {
                        (0..LINE_SAMPLES).map(move |i| {
                            let t = i as f64 / LINE_SAMPLES as f64;
                            let x = pair[0].0 + (pair[1].0 - pair[0].0) * t;
                            let y = pair[0].1 + (pair[1].1 - pair[0].1) * t;
                            coord.project(x, y, viewport)
                        })
                    })
                    .collect();
                PrimitiveKind::Polygon { points }
            } else {
                let a_px = coord.project(x0, y0, viewport);
                let b_px = coord.project(x1, y1, viewport);
                PrimitiveKind::Rect { rect: crate::geometry::Rect::from_corners(a_px, b_px) }
            }
        }
        AnnotationKind::Text { x, y, label, size } => {
            let tx = x_scale.map(*x)?;
            let ty = y_scale.map(*y)?;
            PrimitiveKind::Text {
                anchor: coord.project(tx, ty, viewport),
                content: label.clone(),
                size: *size,
            }
        }
    };

    let style = match &a.kind {
        AnnotationKind::Rect { .. } => Style {
            fill: Some(a.fill.with_alpha((f64::from(a.fill.a) * a.alpha) as u8)),
            stroke: None,
            stroke_width: 0.0,
            linetype: a.linetype,
        },
        AnnotationKind::Text { .. } => Style {
            fill: Some(a.color),
            stroke: None,
            stroke_width: 0.0,
            linetype: a.linetype,
        },
        _ => line_style(a),
    };

    Some(Primitive { index, kind, style })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostics;
    use crate::scale::Transform;

    const VP: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    fn scale(lo: f64, hi: f64) -> ContinuousScale {
        let mut s = ContinuousScale::new(Transform::Identity);
        let mut diag = Diagnostics::new();
        s.train(&[lo, hi], "test", &mut diag);
        s.finish(0.0);
        s
    }

    #[test]
    fn test_hline_is_horizontal() {
        let prims = render(
            &[Annotation::hline(5.0)],
            &scale(0.0, 10.0),
            &scale(0.0, 10.0),
            &Coord::Cartesian,
            VP,
        );
        assert_eq!(prims.len(), 1);
        match &prims[0].kind {
            PrimitiveKind::Polyline { points } => {
                assert!(points.iter().all(|p| (p.y - 50.0).abs() < 1e-9));
            }
            _ => panic!("expected polyline"),
        }
    }

    #[test]
    fn test_vline_out_of_domain_dropped() {
        // log10 scale cannot place a line at a non-positive x.
        let mut s = ContinuousScale::new(Transform::Log10);
        let mut diag = Diagnostics::new();
        s.train(&[1.0, 100.0], "x", &mut diag);
        s.finish(0.0);
        let prims = render(
            &[Annotation::vline(-1.0)],
            &s,
            &scale(0.0, 10.0),
            &Coord::Cartesian,
            VP,
        );
        assert!(prims.is_empty());
    }

    #[test]
    fn test_abline_endpoints() {
        let prims = render(
            &[Annotation::abline(1.0, 0.0)],
            &scale(0.0, 10.0),
            &scale(0.0, 10.0),
            &Coord::Cartesian,
            VP,
        );
        match &prims[0].kind {
            PrimitiveKind::Polyline { points } => {
                let first = points[0];
                let last = points[points.len() - 1];
                assert!((first.x - 0.0).abs() < 1e-9 && (first.y - 100.0).abs() < 1e-9);
                assert!((last.x - 100.0).abs() < 1e-9 && (last.y - 0.0).abs() < 1e-9);
            }
            _ => panic!("expected polyline"),
        }
    }

    #[test]
    fn test_rect_annotation() {
        let prims = render(
            &[Annotation::rect(2.0, 8.0, 2.0, 8.0)],
            &scale(0.0, 10.0),
            &scale(0.0, 10.0),
            &Coord::Cartesian,
            VP,
        );
        match &prims[0].kind {
            PrimitiveKind::Rect { rect } => {
                assert!((rect.width - 60.0).abs() < 1e-9);
                assert!((rect.height - 60.0).abs() < 1e-9);
            }
            _ => panic!("expected rect"),
        }
    }

    #[test]
    fn test_text_annotation_projected() {
        let prims = render(
            &[Annotation::text(5.0, 5.0, "mid")],
            &scale(0.0, 10.0),
            &scale(0.0, 10.0),
            &Coord::Cartesian,
            VP,
        );
        match &prims[0].kind {
            PrimitiveKind::Text { anchor, content, .. } => {
                assert_eq!(content, "mid");
                assert!((anchor.x - 50.0).abs() < 1e-9);
            }
            _ => panic!("expected text"),
        }
    }
}
