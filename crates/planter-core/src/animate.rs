//! The two animations: breathe and cough.
//!
//! Both are construct-once configuration objects; each run call carries
//! no state over from prior runs. Runs are deliberately blocking (the
//! future is awaited to completion) so the mood engine controls
//! sequencing explicitly — animations never overlap.

use std::time::Duration;

use tracing::debug;

use crate::audio::AudioOutput;
use crate::choreography;
use crate::color::Hsv;
use crate::envelope::Envelope;
use crate::strip::{self, distance_from_center, PixelStrip, NUM_PIXELS};

/// Slow full-cycle brightness pulse across the strip, run on good air.
#[derive(Debug, Clone)]
pub struct Breather {
    pub color: Hsv,
    pub cycle: Duration,
    pub frame_interval: Duration,
    pub max_brightness: f32,
    pub whiteness: f32,
}

impl Breather {
    pub fn new(color: Hsv) -> Self {
        Self {
            color,
            cycle: Duration::from_secs(4),
            frame_interval: Duration::from_millis(100),
            max_brightness: 0.15,
            whiteness: 0.8,
        }
    }

    /// Runs one full breathe cycle, then clears the strip. The strip is
    /// cleared even when a frame fails mid-cycle.
    pub async fn breathe(&self, strip: &mut dyn PixelStrip) -> anyhow::Result<()> {
        debug!("breathe: {}s cycle", self.cycle.as_secs_f32());
        let result = self.run_cycle(strip).await;
        let cleanup = strip.clear().and_then(|_| strip.show());
        result.and(cleanup)
    }

    async fn run_cycle(&self, strip: &mut dyn PixelStrip) -> anyhow::Result<()> {
        let cycle_secs = self.cycle.as_secs_f32();
        let frame_secs = self.frame_interval.as_secs_f32();
        let mut t = 0.0f32;

        loop {
            let t_pct = (t / cycle_secs).min(1.0);

            for pixel in 0..NUM_PIXELS {
                let brightness = choreography::brightness_at(pixel, t_pct);
                let color = self.color.with_whiteness(brightness, self.whiteness);
                strip::set_pixel_hsv(strip, pixel, color, brightness * self.max_brightness)?;
            }
            strip.show()?;

            tokio::time::sleep(self.frame_interval).await;

            t += frame_secs;
            if t > cycle_secs {
                return Ok(());
            }
        }
    }
}

/// Fully silent strides still show a dim flicker instead of going dark.
const ENVELOPE_FLOOR: f32 = 0.2;

/// The cough dims outer pixels less aggressively than the breathe
/// animation does (divisor 6 here vs 4 there); the asymmetry is part of
/// the look.
const COUGH_DFC_DIVISOR: f32 = 6.0;

/// Audio-synchronized brightness flicker, run when the air turns bad.
#[derive(Debug, Clone)]
pub struct Cougher {
    pub color: Hsv,
    pub stride_ms: usize,
    pub max_brightness: f32,
    pub whiteness: f32,
}

impl Cougher {
    pub fn new(color: Hsv) -> Self {
        Self {
            color,
            stride_ms: 20,
            max_brightness: 0.15,
            whiteness: 0.8,
        }
    }

    /// Starts asynchronous playback, drives the lights through the
    /// precomputed envelope at the configured stride, then waits for
    /// playback to report inactive. The playback handle is dropped (and
    /// the stream released) on every exit path, and the strip is
    /// cleared even when the light loop fails.
    pub async fn cough(
        &self,
        strip: &mut dyn PixelStrip,
        audio: &mut dyn AudioOutput,
        envelope: &Envelope,
    ) -> anyhow::Result<()> {
        debug!("cough: {}ms envelope", envelope.len());
        let playback = audio.begin()?;

        let result = self.run_lights(strip, envelope).await;
        let cleanup = strip.clear().and_then(|_| strip.show());

        if result.is_ok() && cleanup.is_ok() {
            // Lights usually finish first; let the sound ring out.
            while playback.is_active() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }

        drop(playback);
        result.and(cleanup)
    }

    async fn run_lights(
        &self,
        strip: &mut dyn PixelStrip,
        envelope: &Envelope,
    ) -> anyhow::Result<()> {
        let stride = Duration::from_millis(self.stride_ms as u64);

        for pos in (0..envelope.len()).step_by(self.stride_ms.max(1)) {
            let val = envelope.get(pos).max(ENVELOPE_FLOOR);
            let color = self.color.with_whiteness(val, self.whiteness);

            for pixel in 0..NUM_PIXELS {
                let pct_dfc = distance_from_center(pixel) / COUGH_DFC_DIVISOR;
                let brightness = (1.0 - pct_dfc) * val * self.max_brightness;
                strip::set_pixel_hsv(strip, pixel, color, brightness)?;
            }
            strip.show()?;

            tokio::time::sleep(stride).await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::PlaybackHandle;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingStrip {
        pixels: [(u8, u8, u8, f32); NUM_PIXELS],
        shows: usize,
        max_seen: f32,
    }

    impl RecordingStrip {
        fn is_dark(&self) -> bool {
            self.pixels.iter().all(|&(r, g, b, _)| r == 0 && g == 0 && b == 0)
        }
    }

    impl PixelStrip for RecordingStrip {
        fn set_pixel(
            &mut self,
            pixel: usize,
            r: u8,
            g: u8,
            b: u8,
            brightness: f32,
        ) -> anyhow::Result<()> {
            self.pixels[pixel] = (r, g, b, brightness);
            self.max_seen = self.max_seen.max(brightness);
            Ok(())
        }

        fn show(&mut self) -> anyhow::Result<()> {
            self.shows += 1;
            Ok(())
        }

        fn clear(&mut self) -> anyhow::Result<()> {
            self.pixels = [(0, 0, 0, 0.0); NUM_PIXELS];
            Ok(())
        }
    }

    /// Fails on the nth show, for exercising cleanup paths.
    struct FlakyStrip {
        inner: RecordingStrip,
        fail_on_show: usize,
    }

    impl PixelStrip for FlakyStrip {
        fn set_pixel(&mut self, p: usize, r: u8, g: u8, b: u8, br: f32) -> anyhow::Result<()> {
            self.inner.set_pixel(p, r, g, b, br)
        }

        fn show(&mut self) -> anyhow::Result<()> {
            self.inner.show()?;
            if self.inner.shows == self.fail_on_show {
                anyhow::bail!("bus write failed");
            }
            Ok(())
        }

        fn clear(&mut self) -> anyhow::Result<()> {
            self.inner.clear()
        }
    }

    struct FakeAudio {
        begun: usize,
        active_polls: usize,
        released: Arc<AtomicBool>,
    }

    impl FakeAudio {
        fn new(active_polls: usize) -> Self {
            Self {
                begun: 0,
                active_polls,
                released: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    struct FakePlayback {
        polls_left: AtomicUsize,
        released: Arc<AtomicBool>,
    }

    impl AudioOutput for FakeAudio {
        fn begin(&mut self) -> anyhow::Result<Box<dyn PlaybackHandle>> {
            self.begun += 1;
            self.released.store(false, Ordering::SeqCst);
            Ok(Box::new(FakePlayback {
                polls_left: AtomicUsize::new(self.active_polls),
                released: self.released.clone(),
            }))
        }
    }

    impl PlaybackHandle for FakePlayback {
        fn is_active(&self) -> bool {
            self.polls_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        }
    }

    impl Drop for FakePlayback {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    fn fast_breather() -> Breather {
        Breather {
            color: Hsv::new(161.0 / 360.0, 0.98, 1.0),
            cycle: Duration::from_millis(100),
            frame_interval: Duration::from_millis(20),
            max_brightness: 0.15,
            whiteness: 0.8,
        }
    }

    fn fast_cougher() -> Cougher {
        Cougher {
            color: Hsv::new(0.0, 1.0, 1.0),
            stride_ms: 20,
            max_brightness: 0.15,
            whiteness: 0.8,
        }
    }

    fn short_envelope() -> Envelope {
        let samples: Vec<f32> = (0..100).map(|i| if i % 3 == 0 { 0.9 } else { 0.05 }).collect();
        Envelope::from_samples(&samples, 1000, 1)
    }

    #[tokio::test]
    async fn breathe_lights_up_and_clears() {
        let mut strip = RecordingStrip::default();
        let breather = fast_breather();

        breather.breathe(&mut strip).await.unwrap();

        assert!(strip.is_dark(), "strip left lit after breathe");
        assert!(strip.max_seen > 0.0, "breathe never lit a pixel");
        // 6 frames for a 100ms cycle at 20ms, plus the cleanup show.
        assert_eq!(strip.shows, 7);
    }

    #[tokio::test]
    async fn breathe_is_idempotent_across_runs() {
        let mut strip = RecordingStrip::default();
        let breather = fast_breather();
        breather.breathe(&mut strip).await.unwrap();
        assert!(strip.is_dark());
        breather.breathe(&mut strip).await.unwrap();
        assert!(strip.is_dark());
    }

    #[tokio::test]
    async fn breathe_clears_even_when_the_bus_fails() {
        let mut strip = FlakyStrip {
            inner: RecordingStrip::default(),
            fail_on_show: 2,
        };
        let res = fast_breather().breathe(&mut strip).await;
        assert!(res.is_err());
        assert!(strip.inner.is_dark(), "strip left lit after failed breathe");
    }

    #[tokio::test]
    async fn cough_plays_steps_and_releases() {
        let mut strip = RecordingStrip::default();
        let mut audio = FakeAudio::new(2);
        let released = audio.released.clone();

        fast_cougher()
            .cough(&mut strip, &mut audio, &short_envelope())
            .await
            .unwrap();

        assert_eq!(audio.begun, 1);
        assert!(released.load(Ordering::SeqCst), "playback handle leaked");
        assert!(strip.is_dark(), "strip left lit after cough");
        // 100ms envelope at a 20ms stride = 5 light frames + cleanup.
        assert_eq!(strip.shows, 6);
    }

    #[tokio::test]
    async fn cough_releases_playback_when_lights_fail() {
        let mut strip = FlakyStrip {
            inner: RecordingStrip::default(),
            fail_on_show: 1,
        };
        let mut audio = FakeAudio::new(1000);
        let released = audio.released.clone();

        let res = fast_cougher()
            .cough(&mut strip, &mut audio, &short_envelope())
            .await;

        assert!(res.is_err());
        assert!(released.load(Ordering::SeqCst), "stream not released on error");
        assert!(strip.inner.is_dark());
    }

    #[tokio::test]
    async fn silent_strides_keep_a_dim_floor() {
        let mut strip = RecordingStrip::default();
        let mut audio = FakeAudio::new(0);
        // Constant quiet clip: normalized envelope bottoms out near 0.
        let samples = vec![0.01f32; 40];
        let env = Envelope::from_samples(&samples, 1000, 1);

        let cougher = fast_cougher();
        cougher.cough(&mut strip, &mut audio, &env).await.unwrap();

        // Center pixel brightness at the floor: (1 - 0.5/6) * 0.2 * 0.15.
        let expected = (1.0 - 0.5 / 6.0) * ENVELOPE_FLOOR * cougher.max_brightness;
        assert!((strip.max_seen - expected).abs() < 1e-6);
    }
}
