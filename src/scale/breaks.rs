//! Nice tick placement for continuous axes.

/// Round up to a nice step of the form 1, 2, or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let mag = 10f64.powf(raw.log10().floor());
    let frac = raw / mag;
    let nice = if frac <= 1.0 {
        1.0
    } else if frac <= 2.0 {
        2.0
    } else if frac <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

/// Evenly spaced breaks at nice values covering `[lo, hi]`.
///
/// Returns roughly `target` breaks clipped to the interval. Degenerate or
/// inverted intervals yield a single break.
#[must_use]
pub fn pretty_breaks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite()) {
        return Vec::new();
    }
    if hi <= lo {
        return vec![lo];
    }
    let target = target.max(2);
    let step = nice_step((hi - lo) / (target as f64 - 1.0));
    let first = (lo / step).ceil() * step;

    let mut out = Vec::new();
    let mut i = 0u32;
    loop {
        let v = first + f64::from(i) * step;
        if v > hi + step * 1e-9 {
            break;
        }
        // Snap values like 0.30000000000000004 back onto the grid.
        out.push((v / step).round() * step);
        i += 1;
    }
    if out.is_empty() {
        out.push((lo + hi) / 2.0);
    }
    out
}

/// Label a break value compactly: integers without a decimal point, other
/// values with up to four significant decimals.
#[must_use]
pub fn format_break(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    let s = format!("{v:.4}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_interval() {
        let b = pretty_breaks(0.0, 1.0, 5);
        assert_eq!(b, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_breaks_inside_range() {
        let b = pretty_breaks(3.1, 47.2, 5);
        assert!(!b.is_empty());
        assert!(b.iter().all(|&v| v >= 3.1 && v <= 47.2 + 1e-9));
    }

    #[test]
    fn test_breaks_are_nice_multiples() {
        let b = pretty_breaks(0.0, 100.0, 5);
        for w in b.windows(2) {
            let step = w[1] - w[0];
            assert!((step - 25.0).abs() < 1e-9, "step was {step}");
        }
    }

    #[test]
    fn test_degenerate_interval() {
        assert_eq!(pretty_breaks(5.0, 5.0, 5), vec![5.0]);
    }

    #[test]
    fn test_format_break() {
        assert_eq!(format_break(0.0), "0");
        assert_eq!(format_break(25.0), "25");
        assert_eq!(format_break(0.25), "0.25");
        assert_eq!(format_break(-3.0), "-3");
    }
}
