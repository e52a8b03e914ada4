//! Cubic soft clipper for the resonator bank output

/// Hard-clamp to [-1, 1], then shape with `1.5x - 0.5x^3`.
///
/// The curve is odd, passes through 0 and +/-1 unchanged, and has zero slope
/// at the clamp boundary so the transition into clipping is smooth.
#[inline]
pub fn soft_clip(x: f64) -> f64 {
    let x = x.clamp(-1.0, 1.0);
    1.5 * x - 0.5 * x * x * x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_points() {
        assert_eq!(soft_clip(0.0), 0.0);
        assert_eq!(soft_clip(1.0), 1.0);
        assert_eq!(soft_clip(-1.0), -1.0);
    }

    #[test]
    fn test_bounded_and_odd() {
        for i in -400..=400 {
            let x = i as f64 * 0.025;
            let y = soft_clip(x);
            assert!((-1.0..=1.0).contains(&y), "soft_clip({}) = {}", x, y);
            assert_eq!(soft_clip(-x), -y);
        }
    }

    #[test]
    fn test_large_inputs_saturate() {
        assert_eq!(soft_clip(50.0), 1.0);
        assert_eq!(soft_clip(-1e9), -1.0);
    }

    #[test]
    fn test_monotonic_inside_range() {
        let mut prev = soft_clip(-1.0);
        for i in -99..=100 {
            let y = soft_clip(i as f64 / 100.0);
            assert!(y >= prev);
            prev = y;
        }
    }
}
