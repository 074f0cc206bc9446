//! The engine loop: sense, decide, animate.
//!
//! One task owns the sensor, the strip, and the mood timers. Each
//! iteration: check the cancellation token, take a reading, publish it
//! for the logger task, maybe persist the baseline, tick the mood
//! state machine, and run whichever animation it returns to
//! completion. Cancellation is cooperative — it only takes effect
//! between iterations, never mid-animation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use planter_core::config::Config;
use planter_core::{
    AirQualitySample, AirQualitySensor, AudioOutput, Breather, Cougher, Envelope, MoodAction,
    MoodStateMachine, PixelStrip,
};

use crate::baseline;

pub struct Engine {
    config: Config,
    sensor: Box<dyn AirQualitySensor>,
    strip: Box<dyn PixelStrip>,
    audio: Box<dyn AudioOutput>,
    envelope: Envelope,
    mood: MoodStateMachine,
    breather: Breather,
    cougher: Cougher,
    last_sample: Arc<RwLock<Option<AirQualitySample>>>,
    warming_up: bool,
    samples_until_baseline_store: u32,
    /// Minimum spacing between control ticks.
    min_tick_interval: Duration,
}

impl Engine {
    pub fn new(
        config: Config,
        sensor: Box<dyn AirQualitySensor>,
        strip: Box<dyn PixelStrip>,
        audio: Box<dyn AudioOutput>,
        envelope: Envelope,
    ) -> Self {
        let anim = &config.animation;

        let breather = Breather {
            color: anim.breathe_color,
            cycle: Duration::from_secs_f32(anim.breathe_cycle_secs),
            frame_interval: Duration::from_millis(anim.breathe_frame_ms),
            max_brightness: anim.max_brightness,
            whiteness: anim.whiteness_factor,
        };

        let cougher = Cougher {
            color: anim.cough_color,
            stride_ms: anim.cough_stride_ms,
            max_brightness: anim.max_brightness,
            whiteness: anim.whiteness_factor,
        };

        let mood = MoodStateMachine::new(config.mood.clone());
        let samples_until_baseline_store = config.paths.baseline_store_interval.max(1);

        Self {
            config,
            sensor,
            strip,
            audio,
            envelope,
            mood,
            breather,
            cougher,
            last_sample: Arc::new(RwLock::new(None)),
            warming_up: true,
            samples_until_baseline_store,
            min_tick_interval: Duration::from_millis(200),
        }
    }

    /// Shared view of the most recent sample, for the logger task.
    pub fn last_sample(&self) -> Arc<RwLock<Option<AirQualitySample>>> {
        self.last_sample.clone()
    }

    pub async fn run(mut self, cancel: CancellationToken) -> anyhow::Result<()> {
        self.restore_baseline();

        let result = self.run_loop(&cancel).await;
        if let Err(e) = &result {
            error!("engine going down: {:#}", e);
        }

        // Teardown runs on every path: park the calibration, darken the
        // strip.
        self.store_baseline();
        if let Err(e) = self.strip.clear().and_then(|_| self.strip.show()) {
            warn!("failed to clear strip on shutdown: {}", e);
        }

        result
    }

    async fn run_loop(&mut self, cancel: &CancellationToken) -> anyhow::Result<()> {
        let mut last_tick = Instant::now();

        while !cancel.is_cancelled() {
            let now = Instant::now();
            let dt = (now - last_tick).as_secs_f64();
            last_tick = now;

            match self.sensor.measure() {
                Ok(sample) => self.accept_sample(sample).await,
                Err(e) => {
                    // Transient read error: skip this tick, keep going.
                    warn!("sensor read failed: {}", e);
                    self.pace(last_tick, cancel).await;
                    continue;
                }
            }

            let sample = { self.last_sample.read().await.clone() };
            match self.mood.step(sample.as_ref(), dt) {
                Some(MoodAction::Breathe) => {
                    self.breather.breathe(self.strip.as_mut()).await?;
                }
                Some(MoodAction::Cough) => {
                    self.cougher
                        .cough(self.strip.as_mut(), self.audio.as_mut(), &self.envelope)
                        .await?;
                }
                None => {}
            }

            self.pace(last_tick, cancel).await;
        }

        info!("engine loop cancelled");
        Ok(())
    }

    async fn accept_sample(&mut self, sample: AirQualitySample) {
        if self.warming_up && sample.is_probably_warmup_value() {
            return;
        }
        self.warming_up = false;

        debug!("sample: {} ppm CO2, {} ppb VOC", sample.co2_ppm, sample.voc_ppb);
        *self.last_sample.write().await = Some(sample);

        self.samples_until_baseline_store -= 1;
        if self.samples_until_baseline_store == 0 {
            self.samples_until_baseline_store = self.config.paths.baseline_store_interval.max(1);
            self.store_baseline();
        }
    }

    fn restore_baseline(&mut self) {
        match baseline::load(&self.config.paths.baseline_file) {
            Ok(b) => match self.sensor.set_baseline(b) {
                Ok(()) => info!("restored baseline {:?}", b),
                Err(e) => warn!("failed to restore baseline: {}", e),
            },
            Err(e) => warn!("no baseline restored: {:#}", e),
        }
    }

    fn store_baseline(&mut self) {
        let result = self
            .sensor
            .baseline()
            .and_then(|b| baseline::store(&self.config.paths.baseline_file, b));
        if let Err(e) = result {
            warn!("failed to store baseline: {:#}", e);
        }
    }

    async fn pace(&self, tick_started: Instant, cancel: &CancellationToken) {
        let elapsed = tick_started.elapsed();
        if elapsed >= self.min_tick_interval {
            return;
        }
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(self.min_tick_interval - elapsed) => {}
        }
    }
}
