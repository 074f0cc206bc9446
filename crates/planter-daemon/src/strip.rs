//! Strip backends.
//!
//! The real sculpture drives an APA102/blinkt strip; here the bus is a
//! terminal row of eight truecolor cells (or nothing at all), which is
//! enough to watch the animations without hardware.

use std::io::Write;

use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::QueueableCommand;

use planter_core::config::StripConfig;
use planter_core::{PixelStrip, NUM_PIXELS};

pub fn build(config: &StripConfig) -> anyhow::Result<Box<dyn PixelStrip>> {
    match config.backend.as_str() {
        "terminal" => Ok(Box::new(TerminalStrip::new())),
        "null" => Ok(Box::new(NullStrip)),
        other => anyhow::bail!("unknown strip backend {:?}", other),
    }
}

/// Renders the strip as a single rewritten line on stdout.
pub struct TerminalStrip {
    staged: [(u8, u8, u8, f32); NUM_PIXELS],
}

impl TerminalStrip {
    pub fn new() -> Self {
        Self {
            staged: [(0, 0, 0, 0.0); NUM_PIXELS],
        }
    }
}

impl PixelStrip for TerminalStrip {
    fn set_pixel(
        &mut self,
        pixel: usize,
        r: u8,
        g: u8,
        b: u8,
        brightness: f32,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(pixel < NUM_PIXELS, "pixel {} out of range", pixel);
        self.staged[pixel] = (r, g, b, brightness.clamp(0.0, 1.0));
        Ok(())
    }

    fn show(&mut self) -> anyhow::Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(b"\r")?;
        for &(r, g, b, brightness) in &self.staged {
            // No hardware brightness channel in a terminal; fold it
            // into the color.
            let color = Color::Rgb {
                r: (r as f32 * brightness) as u8,
                g: (g as f32 * brightness) as u8,
                b: (b as f32 * brightness) as u8,
            };
            stdout.queue(SetForegroundColor(color))?;
            stdout.write_all("⬤ ".as_bytes())?;
        }
        stdout.queue(ResetColor)?;
        stdout.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.staged = [(0, 0, 0, 0.0); NUM_PIXELS];
        Ok(())
    }
}

/// Discards everything; for headless runs and tests.
pub struct NullStrip;

impl PixelStrip for NullStrip {
    fn set_pixel(&mut self, _: usize, _: u8, _: u8, _: u8, _: f32) -> anyhow::Result<()> {
        Ok(())
    }

    fn show(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_pixels() {
        let mut strip = TerminalStrip::new();
        assert!(strip.set_pixel(NUM_PIXELS, 255, 0, 0, 1.0).is_err());
        assert!(strip.set_pixel(7, 255, 0, 0, 1.0).is_ok());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let config = StripConfig {
            backend: "hologram".into(),
        };
        assert!(build(&config).is_err());
    }
}
