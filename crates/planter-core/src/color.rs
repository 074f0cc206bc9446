//! HSV color handling for the strip.
//!
//! All three components are normalized to [0, 1); hue wraps. RGB
//! conversion floors each channel so frames are bit-reproducible.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    pub const fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    /// Desaturates toward white as brightness rises.
    ///
    /// `s' = s - s * brightness * whiteness_factor`, so at brightness 0
    /// the color is untouched and at brightness 1 with factor 1 it is
    /// fully white. The source color is never mutated.
    pub fn with_whiteness(&self, brightness: f32, whiteness_factor: f32) -> Self {
        Self {
            h: self.h,
            s: self.s - self.s * brightness * whiteness_factor,
            v: self.v,
        }
    }

    /// Standard HSV→RGB, channels floored to 0..=255.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let h = self.h.rem_euclid(1.0);
        let s = self.s.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0);

        let sector = (h * 6.0).floor();
        let f = h * 6.0 - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as i32 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        (
            (r * 255.0).floor() as u8,
            (g * 255.0).floor() as u8,
            (b * 255.0).floor() as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_convert() {
        assert_eq!(Hsv::new(0.0, 1.0, 1.0).to_rgb(), (255, 0, 0));
        assert_eq!(Hsv::new(1.0 / 3.0, 1.0, 1.0).to_rgb(), (0, 255, 0));
        assert_eq!(Hsv::new(2.0 / 3.0, 1.0, 1.0).to_rgb(), (0, 0, 255));
        assert_eq!(Hsv::new(0.2, 0.0, 1.0).to_rgb(), (255, 255, 255));
        assert_eq!(Hsv::new(0.2, 1.0, 0.0).to_rgb(), (0, 0, 0));
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(Hsv::new(1.0, 1.0, 1.0).to_rgb(), Hsv::new(0.0, 1.0, 1.0).to_rgb());
    }

    #[test]
    fn whiteness_bias_is_monotone_in_brightness() {
        let base = Hsv::new(161.0 / 360.0, 0.98, 1.0);
        let mut prev = base.with_whiteness(0.0, 0.8).s;
        for i in 1..=10 {
            let s = base.with_whiteness(i as f32 / 10.0, 0.8).s;
            assert!(s <= prev, "saturation rose at step {i}");
            prev = s;
        }
    }

    #[test]
    fn whiteness_bias_endpoints() {
        let base = Hsv::new(0.5, 0.7, 1.0);
        assert_eq!(base.with_whiteness(0.0, 1.0).s, base.s);
        assert_eq!(base.with_whiteness(1.0, 1.0).s, 0.0);
        // Source color untouched
        assert_eq!(base.s, 0.7);
    }
}
