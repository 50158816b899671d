//! End-to-end pipeline tests.
//!
//! Each test drives the full render path (statistics, position
//! adjustment, scale training, projection, guides) through the public API
//! and checks an observable property of the scene graph or diagnostics.

#![allow(clippy::unwrap_used)]

use vizgram::prelude::*;
use vizgram::render::{Primitive, PrimitiveKind};

// ============================================================================
// Helpers
// ============================================================================

/// Every pixel position a primitive touches.
fn primitive_points(p: &Primitive) -> Vec<Point> {
    match &p.kind {
        PrimitiveKind::Point { center, .. } => vec![*center],
        PrimitiveKind::Polyline { points } | PrimitiveKind::Polygon { points } => points.clone(),
        PrimitiveKind::Rect { rect } => vec![
            Point::new(rect.x, rect.y),
            Point::new(rect.x + rect.width, rect.y + rect.height),
        ],
        PrimitiveKind::Text { anchor, .. } => vec![*anchor],
    }
}

fn rects(prims: &[Primitive]) -> Vec<Rect> {
    prims
        .iter()
        .filter_map(|p| match &p.kind {
            PrimitiveKind::Rect { rect } => Some(*rect),
            _ => None,
        })
        .collect()
}

fn category_counts() -> DataFrame {
    let mut df = DataFrame::new();
    df.add_column_str("kind", &["a", "a", "a", "v", "v", "a", "v", "a", "v", "a"]);
    df.add_column_str("grp", &["u", "u", "w", "u", "w", "u", "w", "w", "u", "u"]);
    df
}

// ============================================================================
// Statistics through the pipeline
// ============================================================================

/// A histogram never draws more bars than it has bins.
#[test]
fn test_histogram_respects_bin_budget() {
    let values: Vec<f64> = (0..200).map(|i| (f64::from(i) * 0.37).sin() * 10.0).collect();
    let mut df = DataFrame::new();
    df.add_column_f64("v", &values);

    let plot = Plot::new(df)
        .aes(Aes::new().x("v"))
        .layer(Layer::new(GeomKind::bar()).stat(StatKind::bin(10)));
    let out = render(&plot).unwrap();

    let bars = &out.scene.layer(0, "bar").unwrap().primitives;
    assert!(!bars.is_empty());
    assert!(bars.len() <= 10, "{} bars from 10 bins", bars.len());
}

/// A linear smooth draws one polyline with the configured grid size.
#[test]
fn test_smooth_line_has_prediction_grid() {
    let x: Vec<f64> = (0..10).map(f64::from).collect();
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
    let plot = Plot::new(DataFrame::from_xy(&x, &y))
        .aes(Aes::new().x("x").y("y"))
        .layer(Layer::new(GeomKind::Line).stat(StatKind::smooth_linear()));
    let out = render(&plot).unwrap();

    let lines = &out.scene.layer(0, "line").unwrap().primitives;
    assert_eq!(lines.len(), 1);
    match &lines[0].kind {
        PrimitiveKind::Polyline { points } => assert_eq!(points.len(), 80),
        other => panic!("expected polyline, got {other:?}"),
    }
    assert!(!out
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::DegenerateGroup));
}

/// A boxplot without outliers draws two whiskers, a box, and a median per
/// level.
#[test]
fn test_boxplot_compound_glyph() {
    let mut df = DataFrame::new();
    df.add_column_str("lvl", &["a", "a", "a", "a", "a", "b", "b", "b", "b", "b"]);
    df.add_column_f64("y", &[1.0, 2.0, 3.0, 4.0, 5.0, 10.0, 11.0, 12.0, 13.0, 14.0]);

    let plot = Plot::new(df)
        .aes(Aes::new().x("lvl").y("y"))
        .layer(Layer::new(GeomKind::boxplot()));
    let out = render(&plot).unwrap();

    let prims = &out.scene.layer(0, "boxplot").unwrap().primitives;
    assert_eq!(prims.len(), 8);
    assert_eq!(rects(prims).len(), 2);
}

// ============================================================================
// Position adjustments through the pipeline
// ============================================================================

/// Dodged bars in the same slot never overlap horizontally.
#[test]
fn test_dodged_bars_disjoint() {
    let plot = Plot::new(category_counts())
        .aes(Aes::new().x("kind").fill("grp"))
        .layer(Layer::new(GeomKind::bar()).position(PositionKind::dodge()));
    let out = render(&plot).unwrap();

    let bars = rects(&out.scene.layer(0, "bar").unwrap().primitives);
    assert_eq!(bars.len(), 4);
    for (i, a) in bars.iter().enumerate() {
        for b in &bars[i + 1..] {
            let disjoint =
                a.x + a.width <= b.x + 1e-6 || b.x + b.width <= a.x + 1e-6;
            assert!(disjoint, "bars overlap: {a:?} vs {b:?}");
        }
    }
}

/// Filled bars span the same total height in every slot.
#[test]
fn test_filled_bars_equal_height() {
    let plot = Plot::new(category_counts())
        .aes(Aes::new().x("kind").fill("grp"))
        .layer(Layer::new(GeomKind::bar()).position(PositionKind::fill()));
    let out = render(&plot).unwrap();

    let bars = rects(&out.scene.layer(0, "bar").unwrap().primitives);
    assert_eq!(bars.len(), 4);

    // Bucket by horizontal center: one bucket per x slot.
    let mut centers: Vec<f64> = bars.iter().map(|r| r.x + r.width / 2.0).collect();
    centers.sort_by(f64::total_cmp);
    centers.dedup_by(|a, b| (*a - *b).abs() < 1.0);
    assert_eq!(centers.len(), 2);

    let total = |c: f64| -> f64 {
        bars.iter()
            .filter(|r| (r.x + r.width / 2.0 - c).abs() < 1.0)
            .map(|r| r.height)
            .sum()
    };
    assert!((total(centers[0]) - total(centers[1])).abs() < 1e-6);
}

/// Stacked bars pile contiguously from the baseline, and each slot's
/// total height tracks its data total.
#[test]
fn test_stacked_bars_contiguous_per_slot() {
    let mut df = DataFrame::new();
    df.add_column_str("kind", &["A", "A", "B", "B"]);
    df.add_column_f64("y", &[1.0, 3.0, 2.0, 4.0]);
    df.add_column_str("grp", &["u", "v", "u", "v"]);

    let plot = Plot::new(df)
        .aes(Aes::new().x("kind").y("y").fill("grp"))
        .layer(
            Layer::new(GeomKind::bar())
                .stat(StatKind::Identity)
                .position(PositionKind::stack()),
        );
    let out = render(&plot).unwrap();

    let bars = rects(&out.scene.layer(0, "bar").unwrap().primitives);
    assert_eq!(bars.len(), 4);

    let mut centers: Vec<f64> = bars.iter().map(|r| r.x + r.width / 2.0).collect();
    centers.sort_by(f64::total_cmp);
    centers.dedup_by(|a, b| (*a - *b).abs() < 1.0);
    assert_eq!(centers.len(), 2);

    let mut totals = Vec::new();
    for &c in &centers {
        let mut slot: Vec<&Rect> = bars
            .iter()
            .filter(|r| (r.x + r.width / 2.0 - c).abs() < 1.0)
            .collect();
        slot.sort_by(|a, b| a.y.total_cmp(&b.y));
        // Top of the lower segment meets the bottom of the upper one.
        assert!((slot[0].y + slot[0].height - slot[1].y).abs() < 1e-6);
        totals.push(slot.iter().map(|r| r.height).sum::<f64>());
    }
    // Slot totals 4 and 6 in data units keep their 2:3 ratio in pixels.
    assert!((totals[0] / totals[1] - 4.0 / 6.0).abs() < 1e-6);
}

/// The same plot renders to the same scene, jitter included.
#[test]
fn test_render_is_deterministic() {
    let x: Vec<f64> = (0..30).map(|i| f64::from(i % 3)).collect();
    let y: Vec<f64> = (0..30).map(|i| f64::from(i) * 0.5).collect();
    let plot = Plot::new(DataFrame::from_xy(&x, &y))
        .aes(Aes::new().x("x").y("y"))
        .layer(Layer::new(GeomKind::Point).position(PositionKind::jitter()));

    let a = render(&plot).unwrap();
    let b = render(&plot).unwrap();
    assert_eq!(a.scene, b.scene);
}

// ============================================================================
// Scales and diagnostics
// ============================================================================

/// Non-positive values under a log axis are dropped and reported, not
/// fatal.
#[test]
fn test_log_scale_reports_dropped_values() {
    let plot = Plot::new(DataFrame::from_xy(&[1.0, -5.0, 100.0], &[1.0, 2.0, 3.0]))
        .aes(Aes::new().x("x").y("y"))
        .layer(Layer::new(GeomKind::Point))
        .scale_x(ScaleSpec::log10());
    let out = render(&plot).unwrap();

    assert_eq!(out.scene.layer(0, "point").unwrap().primitives.len(), 2);
    assert!(out
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::OutOfTransformDomain));
}

/// Under a log10 axis every decade spans the same number of pixels.
#[test]
fn test_log_scale_decades_evenly_spaced() {
    let plot = Plot::new(DataFrame::from_xy(
        &[1.0, 10.0, 100.0, 1000.0],
        &[1.0, 2.0, 3.0, 4.0],
    ))
    .aes(Aes::new().x("x").y("y"))
    .layer(Layer::new(GeomKind::Point))
    .scale_x(ScaleSpec::log10());
    let out = render(&plot).unwrap();

    let mut xs: Vec<f64> = out
        .scene
        .layer(0, "point")
        .unwrap()
        .primitives
        .iter()
        .filter_map(|p| match &p.kind {
            PrimitiveKind::Point { center, .. } => Some(center.x),
            _ => None,
        })
        .collect();
    xs.sort_by(f64::total_cmp);
    assert_eq!(xs.len(), 4);

    let gaps: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    assert!((gaps[0] - gaps[1]).abs() < 1e-6);
    assert!((gaps[1] - gaps[2]).abs() < 1e-6);
}

/// Explicit level order freezes the domain; rows outside it are dropped
/// with a diagnostic.
#[test]
fn test_explicit_levels_drop_unknown() {
    let mut df = DataFrame::new();
    df.add_column_str("lvl", &["a", "b", "c"]);
    df.add_column_f64("y", &[1.0, 2.0, 3.0]);

    let plot = Plot::new(df)
        .aes(Aes::new().x("lvl").y("y"))
        .layer(Layer::new(GeomKind::Point))
        .scale_x(ScaleSpec::default().with_levels(&["a", "b"]));
    let out = render(&plot).unwrap();

    assert_eq!(out.scene.layer(0, "point").unwrap().primitives.len(), 2);
    assert!(out
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::UnknownLevel));
    assert_eq!(out.scene.panels[0].x_axis.ticks.len(), 2);
}

// ============================================================================
// Coordinates
// ============================================================================

/// Every mark of a polar bar chart lands inside the panel viewport.
#[test]
fn test_polar_marks_stay_inside_viewport() {
    let mut df = DataFrame::new();
    df.add_column_str("slice", &["a", "a", "a", "b", "b", "c"]);

    let plot = Plot::new(df)
        .aes(Aes::new().x("slice"))
        .layer(Layer::new(GeomKind::bar()))
        .coord(Coord::polar());
    let out = render(&plot).unwrap();

    let panel = &out.scene.panels[0];
    let bounds = Rect::new(
        panel.viewport.x - 1e-6,
        panel.viewport.y - 1e-6,
        panel.viewport.width + 2e-6,
        panel.viewport.height + 2e-6,
    );
    for prim in &panel.layers[0].primitives {
        for pt in primitive_points(prim) {
            assert!(bounds.contains(pt), "{pt:?} outside {bounds:?}");
        }
    }
}

/// Flipping the coordinate system swaps which scale drives which axis
/// guide.
#[test]
fn test_flip_swaps_axis_guides() {
    let plot = Plot::new(DataFrame::from_xy(&[1.0, 2.0], &[10.0, 20.0]))
        .aes(Aes::new().x("x").y("y"))
        .xlab("horizontal")
        .ylab("vertical")
        .coord(Coord::Flip)
        .layer(Layer::new(GeomKind::Point));
    let out = render(&plot).unwrap();

    let panel = &out.scene.panels[0];
    assert_eq!(panel.x_axis.label, "vertical");
    assert_eq!(panel.y_axis.label, "horizontal");
}

// ============================================================================
// Facets
// ============================================================================

/// Faceting partitions rows: the marks across panels add up to the input.
#[test]
fn test_facet_rows_partition() {
    let mut df = DataFrame::from_xy(
        &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    );
    df.add_column_str("g", &["p", "q", "p", "r", "q", "p"]);

    let plot = Plot::new(df)
        .aes(Aes::new().x("x").y("y"))
        .layer(Layer::new(GeomKind::Point))
        .facet(Facet::wrap("g"));
    let out = render(&plot).unwrap();

    assert_eq!(out.scene.panels.len(), 3);
    let total: usize = out
        .scene
        .panels
        .iter()
        .map(|p| p.layers[0].primitives.len())
        .sum();
    assert_eq!(total, 6);
    assert!(out.scene.panels.iter().all(|p| p.strip.is_some()));
}

/// Wrapping five levels into two columns produces a three-row grid.
#[test]
fn test_facet_wrap_fills_rows() {
    let n = 10;
    let mut df = DataFrame::from_xy(
        &(0..n).map(f64::from).collect::<Vec<_>>(),
        &(0..n).map(f64::from).collect::<Vec<_>>(),
    );
    let labels: Vec<String> = (0..n).map(|i| format!("g{}", i % 5)).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    df.add_column_str("g", &refs);

    let facet = Facet::Wrap {
        var: "g".to_string(),
        ncol: Some(2),
        scales: ScaleSharing::Shared,
    };
    let plot = Plot::new(df)
        .aes(Aes::new().x("x").y("y"))
        .layer(Layer::new(GeomKind::Point))
        .facet(facet);
    let out = render(&plot).unwrap();

    assert_eq!(out.scene.panels.len(), 5);
    let mut row_tops: Vec<f64> = out.scene.panels.iter().map(|p| p.viewport.y).collect();
    row_tops.sort_by(f64::total_cmp);
    row_tops.dedup_by(|a, b| (*a - *b).abs() < 1e-6);
    assert_eq!(row_tops.len(), 3);

    let mut col_lefts: Vec<f64> = out.scene.panels.iter().map(|p| p.viewport.x).collect();
    col_lefts.sort_by(f64::total_cmp);
    col_lefts.dedup_by(|a, b| (*a - *b).abs() < 1e-6);
    assert_eq!(col_lefts.len(), 2);
}

/// Free scales give each panel its own axis domain.
#[test]
fn test_free_scales_differ_by_panel() {
    let mut df = DataFrame::from_xy(
        &[0.0, 1.0, 2.0, 1000.0, 2000.0, 3000.0],
        &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0],
    );
    df.add_column_str("g", &["lo", "lo", "lo", "hi", "hi", "hi"]);

    let facet = Facet::Wrap {
        var: "g".to_string(),
        ncol: None,
        scales: ScaleSharing::Free,
    };
    let plot = Plot::new(df)
        .aes(Aes::new().x("x").y("y"))
        .layer(Layer::new(GeomKind::Point))
        .facet(facet);
    let out = render(&plot).unwrap();

    let labels = |i: usize| -> Vec<String> {
        out.scene.panels[i]
            .x_axis
            .ticks
            .iter()
            .map(|t| t.label.clone())
            .collect()
    };
    assert_ne!(labels(0), labels(1));
}

/// Annotations repeat on every panel.
#[test]
fn test_annotations_on_every_panel() {
    let mut df = DataFrame::from_xy(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);
    df.add_column_str("g", &["a", "a", "b", "b"]);

    let plot = Plot::new(df)
        .aes(Aes::new().x("x").y("y"))
        .layer(Layer::new(GeomKind::Point))
        .facet(Facet::wrap("g"))
        .annotate(Annotation::hline(2.5));
    let out = render(&plot).unwrap();

    for panel in &out.scene.panels {
        assert_eq!(panel.annotations.len(), 1);
    }
}

// ============================================================================
// Guides
// ============================================================================

/// Color and shape mapped to the same column merge into one legend whose
/// entries carry both key visuals.
#[test]
fn test_legend_merges_color_and_shape() {
    let mut df = DataFrame::from_xy(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
    df.add_column_str("g", &["u", "v", "u"]);

    let plot = Plot::new(df)
        .aes(Aes::new().x("x").y("y").color("g").map("shape", "g"))
        .layer(Layer::new(GeomKind::Point));
    let out = render(&plot).unwrap();

    assert_eq!(out.scene.legends.len(), 1);
    let legend = &out.scene.legends[0];
    assert_eq!(legend.title, "g");
    assert_eq!(legend.entries.len(), 2);
    assert!(legend.entries.iter().all(|e| e.shape.is_some()));
}

/// Layers excluded from the legend leave the scene legendless.
#[test]
fn test_hidden_legend() {
    let mut df = DataFrame::from_xy(&[1.0, 2.0], &[1.0, 2.0]);
    df.add_column_str("g", &["u", "v"]);

    let plot = Plot::new(df)
        .aes(Aes::new().x("x").y("y").color("g"))
        .layer(Layer::new(GeomKind::Point).hide_legend());
    let out = render(&plot).unwrap();
    assert!(out.scene.legends.is_empty());
}

// ============================================================================
// Figure assembly
// ============================================================================

/// The scene carries the requested size, title, and theme background.
#[test]
fn test_scene_figure_settings() {
    let plot = Plot::new(DataFrame::from_xy(&[1.0], &[1.0]))
        .aes(Aes::new().x("x").y("y"))
        .layer(Layer::new(GeomKind::Point))
        .size(640, 480)
        .title("weights")
        .theme(Theme::dark());
    let out = render(&plot).unwrap();

    assert_eq!(out.scene.width, 640);
    assert_eq!(out.scene.height, 480);
    assert_eq!(out.scene.title.as_deref(), Some("weights"));
    assert_eq!(out.scene.background, Theme::dark().background);
}
