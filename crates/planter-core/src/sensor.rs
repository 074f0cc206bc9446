//! Air quality sensor capability.

use crate::sample::{AirQualitySample, Baseline};

/// Abstraction over the gas sensor chip. A `measure` failure is a
/// transient read error: the caller logs it and skips the tick.
pub trait AirQualitySensor: Send {
    fn measure(&mut self) -> anyhow::Result<AirQualitySample>;

    /// Current calibration state, for periodic persistence.
    fn baseline(&mut self) -> anyhow::Result<Baseline>;

    /// Restores a previously persisted calibration.
    fn set_baseline(&mut self, baseline: Baseline) -> anyhow::Result<()>;
}
