use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One air quality reading from the sensor chip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualitySample {
    pub co2_ppm: u16,
    pub voc_ppb: u16,
    pub timestamp: DateTime<Local>,
}

impl AirQualitySample {
    pub fn new(co2_ppm: u16, voc_ppb: u16) -> Self {
        Self {
            co2_ppm,
            voc_ppb,
            timestamp: Local::now(),
        }
    }

    /// The SGP30 reports exactly 400 ppm / 0 ppb while its hotplate
    /// warms up; such readings carry no information and are skipped
    /// until the first plausible one arrives.
    pub fn is_probably_warmup_value(&self) -> bool {
        self.co2_ppm == 400 && self.voc_ppb == 0
    }
}

/// Gas sensor calibration state, persisted across restarts so the chip
/// does not have to re-warm from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    pub raw_co2: u16,
    pub raw_voc: u16,
}
