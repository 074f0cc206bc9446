//! LED strip capability trait and fixed geometry.

use crate::color::Hsv;

/// Fixed strip geometry: eight pixels, center between indices 3 and 4.
pub const NUM_PIXELS: usize = 8;

/// Absolute offset of a pixel from the strip midpoint (3.5), in 0.5..=3.5.
pub fn distance_from_center(pixel: usize) -> f32 {
    (pixel as f32 - (NUM_PIXELS as f32 - 1.0) / 2.0).abs()
}

/// Abstraction over the pixel bus (APA102/blinkt-style strips, or the
/// daemon's terminal stand-in). Failures are hardware failures and are
/// not locally recoverable; callers propagate them.
pub trait PixelStrip: Send {
    /// Stages a pixel; `brightness` is the hardware brightness channel
    /// in [0, 1] and is independent of the RGB values.
    fn set_pixel(&mut self, pixel: usize, r: u8, g: u8, b: u8, brightness: f32)
        -> anyhow::Result<()>;

    /// Pushes staged pixels to the strip.
    fn show(&mut self) -> anyhow::Result<()>;

    /// Stages all pixels off. Takes effect on the next `show`.
    fn clear(&mut self) -> anyhow::Result<()>;
}

/// Stages one pixel from an HSV color plus a hardware brightness.
pub fn set_pixel_hsv(
    strip: &mut dyn PixelStrip,
    pixel: usize,
    color: Hsv,
    brightness: f32,
) -> anyhow::Result<()> {
    let (r, g, b) = color.to_rgb();
    strip.set_pixel(pixel, r, g, b, brightness)
}
