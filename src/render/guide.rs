//! Axis and legend guides.

use crate::color::Rgba;
use crate::geometry::Rect;
use crate::render::scene::{AxisGuide, LegendEntry, LegendGuide, Tick};
use crate::scale::{
    blue_gradient, hue_palette, linetype_palette, shape_palette, ContinuousScale, DiscreteScale,
};

/// Which panel edge an axis runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisSide {
    /// Horizontal axis along the panel bottom.
    Bottom,
    /// Vertical axis along the panel left edge.
    Left,
}

/// Build an axis guide from normalized break positions.
///
/// Positions outside the unit interval are dropped; they would land off
/// the panel.
pub(crate) fn axis(
    label: &str,
    breaks: &[(f64, String)],
    side: AxisSide,
    viewport: Rect,
) -> AxisGuide {
    let ticks = breaks
        .iter()
        .filter(|(t, _)| (0.0..=1.0).contains(t))
        .map(|(t, text)| Tick {
            position: match side {
                AxisSide::Bottom => viewport.x + t * viewport.width,
                AxisSide::Left => viewport.y + (1.0 - t) * viewport.height,
            },
            label: text.clone(),
        })
        .collect();
    AxisGuide { label: label.to_string(), ticks }
}

/// Legend for a discrete color or fill scale.
pub(crate) fn discrete_color_legend(title: &str, scale: &DiscreteScale) -> LegendGuide {
    let palette = hue_palette(scale.len());
    LegendGuide {
        title: title.to_string(),
        entries: scale
            .levels()
            .iter()
            .zip(palette)
            .map(|(label, swatch)| LegendEntry {
                label: label.clone(),
                swatch,
                shape: None,
                linetype: None,
            })
            .collect(),
    }
}

/// Legend for a continuous color or fill scale: one entry per break,
/// keyed by the gradient color at that break.
pub(crate) fn continuous_color_legend(title: &str, scale: &ContinuousScale) -> LegendGuide {
    LegendGuide {
        title: title.to_string(),
        entries: scale
            .breaks(5)
            .into_iter()
            .map(|(t, label)| LegendEntry {
                label,
                swatch: blue_gradient(t),
                shape: None,
                linetype: None,
            })
            .collect(),
    }
}

/// Legend for a discrete shape scale.
pub(crate) fn shape_legend(title: &str, scale: &DiscreteScale) -> LegendGuide {
    LegendGuide {
        title: title.to_string(),
        entries: scale
            .levels()
            .iter()
            .enumerate()
            .map(|(i, label)| LegendEntry {
                label: label.clone(),
                swatch: Rgba::BLACK,
                shape: Some(shape_palette(i)),
                linetype: None,
            })
            .collect(),
    }
}

/// Legend for a discrete linetype scale.
pub(crate) fn linetype_legend(title: &str, scale: &DiscreteScale) -> LegendGuide {
    LegendGuide {
        title: title.to_string(),
        entries: scale
            .levels()
            .iter()
            .enumerate()
            .map(|(i, label)| LegendEntry {
                label: label.clone(),
                swatch: Rgba::BLACK,
                shape: None,
                linetype: Some(linetype_palette(i)),
            })
            .collect(),
    }
}

/// Merge legends that agree on title and label sequence.
///
/// Channels mapped to the same column produce one combined legend whose
/// entries carry every channel's key visual.
pub(crate) fn merge(guides: Vec<LegendGuide>) -> Vec<LegendGuide> {
    let mut out: Vec<LegendGuide> = Vec::new();
    for guide in guides {
        let existing = out.iter_mut().find(|g| {
            g.title == guide.title
                && g.entries.len() == guide.entries.len()
                && g.entries
                    .iter()
                    .zip(&guide.entries)
                    .all(|(a, b)| a.label == b.label)
        });
        match existing {
            Some(target) => {
                for (slot, entry) in target.entries.iter_mut().zip(guide.entries) {
                    if slot.shape.is_none() {
                        slot.shape = entry.shape;
                    }
                    if slot.linetype.is_none() {
                        slot.linetype = entry.linetype;
                    }
                    if slot.swatch == Rgba::BLACK && entry.swatch != Rgba::BLACK {
                        slot.swatch = entry.swatch;
                    }
                }
            }
            None => out.push(guide),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataValue;
    use crate::error::Diagnostics;
    use crate::scale::Transform;

    const VP: Rect = Rect::new(10.0, 10.0, 100.0, 100.0);

    fn trained_discrete(labels: &[&str]) -> DiscreteScale {
        let mut s = DiscreteScale::new();
        let values: Vec<DataValue> = labels.iter().map(|&l| DataValue::Text(l.into())).collect();
        s.train(&values);
        s.finish();
        s
    }

    #[test]
    fn test_axis_tick_positions() {
        let breaks = vec![(0.0, "0".to_string()), (0.5, "5".to_string()), (1.0, "10".to_string())];
        let x = axis("x", &breaks, AxisSide::Bottom, VP);
        assert_eq!(x.ticks.len(), 3);
        assert!((x.ticks[1].position - 60.0).abs() < 1e-9);

        let y = axis("y", &breaks, AxisSide::Left, VP);
        // Vertical axes grow downward in pixels.
        assert!((y.ticks[0].position - 110.0).abs() < 1e-9);
        assert!((y.ticks[2].position - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_drops_out_of_range() {
        let breaks = vec![(-0.1, "a".to_string()), (0.5, "b".to_string()), (1.2, "c".to_string())];
        let g = axis("x", &breaks, AxisSide::Bottom, VP);
        assert_eq!(g.ticks.len(), 1);
        assert_eq!(g.ticks[0].label, "b");
    }

    #[test]
    fn test_color_legend_order_matches_levels() {
        let g = discrete_color_legend("grp", &trained_discrete(&["b", "a"]));
        assert_eq!(g.entries[0].label, "b");
        assert_eq!(g.entries[1].label, "a");
        assert_ne!(g.entries[0].swatch, g.entries[1].swatch);
    }

    #[test]
    fn test_continuous_legend_has_break_entries() {
        let mut s = ContinuousScale::new(Transform::Identity);
        let mut diag = Diagnostics::new();
        s.train(&[0.0, 100.0], "fill", &mut diag);
        s.finish(0.0);
        let g = continuous_color_legend("v", &s);
        assert!(!g.entries.is_empty());
        assert!(g.entries.iter().all(|e| e.shape.is_none()));
    }

    #[test]
    fn test_merge_same_title_and_labels() {
        let color = discrete_color_legend("grp", &trained_discrete(&["a", "b"]));
        let shape = shape_legend("grp", &trained_discrete(&["a", "b"]));
        let merged = merge(vec![color.clone(), shape]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].entries[0].swatch, color.entries[0].swatch);
        assert!(merged[0].entries[0].shape.is_some());
    }

    #[test]
    fn test_merge_keeps_distinct_titles_apart() {
        let a = discrete_color_legend("one", &trained_discrete(&["a"]));
        let b = shape_legend("two", &trained_discrete(&["a"]));
        assert_eq!(merge(vec![a, b]).len(), 2);
    }

    #[test]
    fn test_merge_different_labels_apart() {
        let a = discrete_color_legend("grp", &trained_discrete(&["a", "b"]));
        let b = shape_legend("grp", &trained_discrete(&["a", "c"]));
        assert_eq!(merge(vec![a, b]).len(), 2);
    }
}
