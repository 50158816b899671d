//! Coordinate systems.
//!
//! A coordinate system maps normalized positions in the unit square to
//! pixels inside a panel viewport. Scales never see pixels; everything
//! pixel-shaped goes through [`Coord::project`].

use crate::geometry::{Point, Rect};
use crate::scale::Transform;

/// Which positional channel a polar system maps to angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThetaAxis {
    /// x becomes angle, y becomes radius.
    #[default]
    X,
    /// y becomes angle, x becomes radius.
    Y,
}

/// Coordinate system attached to a plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    /// Plain linear mapping of the unit square onto the viewport.
    Cartesian,
    /// Cartesian with x and y swapped.
    Flip,
    /// Cartesian with a fixed y/x unit aspect ratio; the drawing area is the
    /// largest centered sub-rectangle of the viewport that honors the ratio.
    Fixed {
        /// Pixels per y unit divided by pixels per x unit.
        ratio: f64,
    },
    /// Polar mapping. Angle zero points at 12 o'clock; `direction = 1` runs
    /// clockwise, `-1` counter-clockwise.
    Polar {
        /// Which channel maps to angle.
        theta: ThetaAxis,
        /// Angular offset in radians added to every angle.
        start: f64,
        /// Rotation direction, `1` or `-1`.
        direction: i8,
    },
    /// Cartesian with monotonic transforms applied to each axis after
    /// normalization. The transform is renormalized over the unit interval,
    /// so it warps spacing without changing the endpoints.
    Trans {
        /// Transform applied to normalized x.
        x: Transform,
        /// Transform applied to normalized y.
        y: Transform,
    },
}

impl Default for Coord {
    fn default() -> Self {
        Coord::Cartesian
    }
}

impl Coord {
    /// Polar with the default convention: x is angle, clockwise from the top.
    #[must_use]
    pub fn polar() -> Self {
        Coord::Polar { theta: ThetaAxis::X, start: 0.0, direction: 1 }
    }

    /// Whether straight lines in data space bend under this system.
    ///
    /// Curved systems render lines and rectangle edges as interpolated
    /// polylines instead of two-point segments.
    #[must_use]
    pub fn is_curved(&self) -> bool {
        matches!(self, Coord::Polar { .. })
    }

    /// Whether the system swaps the positional channels.
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        matches!(self, Coord::Flip)
    }

    /// Project a normalized position into the viewport.
    ///
    /// `tx` and `ty` are scale outputs in `[0, 1]`; values outside that
    /// range project outside the viewport rather than clamping, so marks
    /// that fall beyond fixed limits land off-panel.
    #[must_use]
    pub fn project(&self, tx: f64, ty: f64, viewport: Rect) -> Point {
        match self {
            Coord::Cartesian => linear(tx, ty, viewport),
            Coord::Flip => linear(ty, tx, viewport),
            Coord::Fixed { ratio } => linear(tx, ty, fixed_area(*ratio, viewport)),
            Coord::Polar { theta, start, direction } => {
                let (ta, tr) = match theta {
                    ThetaAxis::X => (tx, ty),
                    ThetaAxis::Y => (ty, tx),
                };
                let angle = start + f64::from(*direction) * ta * std::f64::consts::TAU;
                let center = viewport.center();
                let max_r = viewport.width.min(viewport.height) / 2.0;
                let r = tr.clamp(0.0, 1.0) * max_r;
                Point::new(center.x + r * angle.sin(), center.y - r * angle.cos())
            }
            Coord::Trans { x, y } => linear(warp_unit(*x, tx), warp_unit(*y, ty), viewport),
        }
    }
}

/// Map the unit square to the viewport; normalized y grows upward while
/// pixel y grows downward.
fn linear(tx: f64, ty: f64, viewport: Rect) -> Point {
    Point::new(
        viewport.x + tx * viewport.width,
        viewport.y + (1.0 - ty) * viewport.height,
    )
}

/// Largest centered sub-rectangle of the viewport with the given y/x unit
/// aspect ratio.
fn fixed_area(ratio: f64, viewport: Rect) -> Rect {
    if !(ratio.is_finite() && ratio > 0.0) || viewport.width <= 0.0 || viewport.height <= 0.0 {
        return viewport;
    }
    let current = viewport.height / viewport.width;
    if current > ratio {
        let h = viewport.width * ratio;
        Rect::new(viewport.x, viewport.y + (viewport.height - h) / 2.0, viewport.width, h)
    } else {
        let w = viewport.height / ratio;
        Rect::new(viewport.x + (viewport.width - w) / 2.0, viewport.y, w, viewport.height)
    }
}

/// Apply a monotonic transform to a unit-interval value, renormalized so 0
/// maps to 0 and 1 maps to 1. Values outside the unit interval pass through
/// linearly extrapolated at the nearest endpoint.
fn warp_unit(transform: Transform, t: f64) -> f64 {
    match transform {
        Transform::Identity => t,
        _ => {
            // Renormalize over a domain offset from zero so log stays finite.
            let (lo, hi) = (0.1, 1.1);
            let clamped = t.clamp(0.0, 1.0);
            let v = lo + clamped * (hi - lo);
            let (flo, fhi) = (transform.apply(lo), transform.apply(hi));
            match (flo, fhi) {
                (Some(a), Some(b)) if (b - a).abs() > f64::EPSILON => {
                    let warped = transform.apply(v).map_or(clamped, |f| (f - a) / (b - a));
                    warped + (t - clamped)
                }
                _ => t,
            }
        }
    }
}
