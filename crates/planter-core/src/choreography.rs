//! Per-pixel timing for the breathe animation.
//!
//! Pixels near the strip center run through the fade curve faster and
//! hold at full brightness longer; outer pixels ramp slowly and barely
//! hold. Every pixel still completes a full fade-in / hold / fade-out
//! within one cycle, so all eight reach maximum brightness.

use crate::easing::fade_curve;
use crate::strip::{distance_from_center, NUM_PIXELS};

/// Longest hold at full brightness, used by the center pixels.
const MAX_HOLD_CENTER: f32 = 0.5;
/// Hold for the outermost pixels. Must be <= MAX_HOLD_CENTER.
const MIN_HOLD_OUTER: f32 = 0.0;
/// Fade-in budget for the outermost pixels. Must be >= the center's.
const MAX_FADE_IN_OUTER: f32 = 0.5;

/// Breathe animation uses a quarter-strip normalization for distance.
const DFC_DIVISOR: f32 = 4.0;

/// Brightness of `pixel` at normalized cycle progress `t_pct`.
///
/// `t_pct` is clamped to [0, 1]; the result is always in [0, 1] and is
/// exactly 0.0 at both ends of the cycle.
pub fn brightness_at(pixel: usize, t_pct: f32) -> f32 {
    debug_assert!(pixel < NUM_PIXELS);
    let t_pct = t_pct.clamp(0.0, 1.0);

    let pct_dfc = distance_from_center(pixel) / DFC_DIVISOR;

    // Center pixels fade in over (1 - hold)/2 of the cycle.
    let min_fade_in = (1.0 - MAX_HOLD_CENTER) / 2.0;

    let fade_in_end = min_fade_in + pct_dfc * (MAX_FADE_IN_OUTER - min_fade_in);
    let hold = MIN_HOLD_OUTER + (1.0 - pct_dfc) * (MAX_HOLD_CENTER - MIN_HOLD_OUTER);
    let fade_out_start = fade_in_end + hold;
    let fade_out_duration = 1.0 - fade_out_start;

    if t_pct < fade_in_end {
        // A zero-width fade-in would already have fallen through.
        return fade_curve(t_pct / fade_in_end);
    }

    if t_pct < fade_out_start {
        return 1.0;
    }

    if fade_out_duration <= 0.0 {
        // Window collapsed to nothing: the cycle is over.
        return 0.0;
    }

    // Fade out is the fade-in curve run backwards.
    let pct_into_fade = (t_pct - fade_out_start) / fade_out_duration;
    fade_curve(1.0 - pct_into_fade)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_at_cycle_boundaries() {
        for pixel in 0..NUM_PIXELS {
            assert_eq!(brightness_at(pixel, 0.0), 0.0, "pixel {pixel} lit at t=0");
            assert_eq!(brightness_at(pixel, 1.0), 0.0, "pixel {pixel} lit at t=1");
        }
    }

    #[test]
    fn every_pixel_reaches_full_brightness() {
        for pixel in 0..NUM_PIXELS {
            let peak = (1..1000)
                .map(|i| brightness_at(pixel, i as f32 / 1000.0))
                .fold(0.0f32, f32::max);
            assert_eq!(peak, 1.0, "pixel {pixel} peaked at {peak}");
        }
    }

    #[test]
    fn output_stays_normalized() {
        for pixel in 0..NUM_PIXELS {
            for i in 0..=200 {
                let v = brightness_at(pixel, i as f32 / 200.0);
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    /// Center pixels finish their fade-in before the outer ones do.
    #[test]
    fn center_peaks_before_edge() {
        let first_full = |pixel: usize| {
            (1..1000)
                .find(|&i| brightness_at(pixel, i as f32 / 1000.0) >= 1.0)
                .expect("pixel never reached full brightness")
        };
        assert!(first_full(3) <= first_full(0));
        assert!(first_full(4) <= first_full(7));
    }
}
