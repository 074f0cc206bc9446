//! Brightness easing curve shared by both animations.
//!
//! A flattened exponential rather than a plain sigmoid: acceleration is
//! steeper near the midpoint, which reads as an organic "breath" on the
//! strip instead of a mechanical ramp.

/// Controls how flat the curve is near its endpoints. Tweakable.
const FLATNESS_FACTOR: f32 = 2.0;

/// Maps a normalized time position to a normalized intensity.
///
/// `fade_curve(0) == 0` and `fade_curve(1) == 1` (both reached via the
/// clamp), and the curve is monotone non-decreasing in between.
pub fn fade_curve(t: f32) -> f32 {
    let v = (FLATNESS_FACTOR * (t - 1.0) / 2.0).exp()
        - (1.0 - 2.0 * t) * (-FLATNESS_FACTOR / 2.0).exp();
    v.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_zero_and_one() {
        assert_eq!(fade_curve(0.0), 0.0);
        assert_eq!(fade_curve(1.0), 1.0);
    }

    #[test]
    fn stays_in_unit_range() {
        for i in 0..=1000 {
            let t = i as f32 / 1000.0;
            let v = fade_curve(t);
            assert!((0.0..=1.0).contains(&v), "fade_curve({t}) = {v}");
        }
    }

    #[test]
    fn monotone_non_decreasing() {
        let mut prev = fade_curve(0.0);
        for i in 1..=1000 {
            let v = fade_curve(i as f32 / 1000.0);
            assert!(v >= prev, "curve dipped at step {i}: {v} < {prev}");
            prev = v;
        }
    }
}
