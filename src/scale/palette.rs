//! Palettes: how trained domains become visual values.

use crate::color::{Hsla, Rgba};
use crate::grammar::geom::{LineType, PointShape};

/// Evenly spaced hues around the color wheel, one per level.
///
/// Hues start at 15 degrees so the first level reads as red rather than
/// pure magenta; lightness and saturation stay fixed so levels differ only
/// in hue.
#[must_use]
pub fn hue_palette(n: usize) -> Vec<Rgba> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let h = 15.0 + 360.0 * (i as f64) / (n as f64);
            Hsla::hsl(h, 0.6, 0.55).to_rgba()
        })
        .collect()
}

/// Dark-to-light blue gradient for continuous color channels.
///
/// `t` is a normalized scale output; values are clamped to `[0, 1]`.
#[must_use]
pub fn blue_gradient(t: f64) -> Rgba {
    let dark = Rgba::rgb(19, 43, 67);
    let light = Rgba::rgb(86, 177, 247);
    dark.lerp(light, t)
}

/// Shapes assigned to discrete shape levels, cycling past six.
#[must_use]
pub fn shape_palette(index: usize) -> PointShape {
    const SHAPES: [PointShape; 6] = [
        PointShape::Circle,
        PointShape::Triangle,
        PointShape::Square,
        PointShape::Cross,
        PointShape::Diamond,
        PointShape::X,
    ];
    SHAPES[index % SHAPES.len()]
}

/// Line types assigned to discrete linetype levels, cycling past six.
#[must_use]
pub fn linetype_palette(index: usize) -> LineType {
    const TYPES: [LineType; 6] = [
        LineType::Solid,
        LineType::Dashed,
        LineType::Dotted,
        LineType::DotDash,
        LineType::LongDash,
        LineType::TwoDash,
    ];
    TYPES[index % TYPES.len()]
}

/// Map a normalized size value onto the output size range.
///
/// Sizes interpolate over area rather than radius so perceived magnitude
/// tracks the data.
#[must_use]
pub fn size_range(t: f64, min: f64, max: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let a = min * min + (max * max - min * min) * t;
    a.sqrt()
}
