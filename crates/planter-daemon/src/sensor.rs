//! Simulated SGP30.
//!
//! The real sculpture reads an SGP30 over I2C; the chip driver is out
//! of scope here, so the daemon ships a simulation that reproduces the
//! behaviors the engine has to cope with: a warmup window of
//! constant 400/0 readings, a drifting random walk afterwards, and
//! occasional "someone exhaled on it" spikes.

use rand::Rng;
use std::time::{Duration, Instant};

use planter_core::{AirQualitySample, AirQualitySensor, Baseline};

pub struct SimulatedSensor {
    started: Instant,
    warmup: Duration,
    co2_ppm: f64,
    voc_ppb: f64,
    baseline: Baseline,
}

impl SimulatedSensor {
    pub fn new(warmup: Duration) -> Self {
        Self {
            started: Instant::now(),
            warmup,
            co2_ppm: 410.0,
            voc_ppb: 12.0,
            baseline: Baseline {
                raw_co2: 0x8a00,
                raw_voc: 0x8600,
            },
        }
    }
}

impl AirQualitySensor for SimulatedSensor {
    fn measure(&mut self) -> anyhow::Result<AirQualitySample> {
        if self.started.elapsed() < self.warmup {
            return Ok(AirQualitySample::new(400, 0));
        }

        let mut rng = rand::thread_rng();

        self.co2_ppm = (self.co2_ppm + rng.gen_range(-6.0..6.0)).clamp(400.0, 2000.0);
        self.voc_ppb = (self.voc_ppb + rng.gen_range(-3.0..3.0)).clamp(0.0, 500.0);

        // Rare spike, as if someone breathed on the sensor.
        if rng.gen_ratio(1, 120) {
            self.co2_ppm = (self.co2_ppm + rng.gen_range(80.0..300.0)).min(2000.0);
            self.voc_ppb = (self.voc_ppb + rng.gen_range(40.0..120.0)).min(500.0);
        }

        Ok(AirQualitySample::new(self.co2_ppm as u16, self.voc_ppb as u16))
    }

    fn baseline(&mut self) -> anyhow::Result<Baseline> {
        Ok(self.baseline)
    }

    fn set_baseline(&mut self, baseline: Baseline) -> anyhow::Result<()> {
        self.baseline = baseline;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warms_up_then_reads() {
        let mut sensor = SimulatedSensor::new(Duration::from_millis(50));
        assert!(sensor.measure().unwrap().is_probably_warmup_value());
        std::thread::sleep(Duration::from_millis(60));
        let sample = sensor.measure().unwrap();
        assert!(!sample.is_probably_warmup_value());
        assert!(sample.co2_ppm >= 400);
    }

    #[test]
    fn baseline_round_trips() {
        let mut sensor = SimulatedSensor::new(Duration::ZERO);
        let b = Baseline {
            raw_co2: 1,
            raw_voc: 2,
        };
        sensor.set_baseline(b).unwrap();
        assert_eq!(sensor.baseline().unwrap(), b);
    }
}
