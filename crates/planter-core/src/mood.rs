//! Mood decisions: when to breathe, when to cough.
//!
//! Not a named-state machine — two countdown timers with a hysteresis
//! policy. A single bad reading can cough immediately (subject to the
//! cough's own cooldown) and always pushes the next breathe a full
//! cooldown window away; only sustained good air re-enables breathing.

use serde::{Deserialize, Serialize};

use crate::sample::AirQualitySample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodAction {
    Breathe,
    Cough,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodConfig {
    #[serde(default = "default_bad_co2")]
    pub bad_co2_threshold: u16,
    #[serde(default = "default_bad_voc")]
    pub bad_voc_threshold: u16,
    #[serde(default = "default_min_secs_between_breaths")]
    pub min_secs_between_breaths: f64,
    #[serde(default = "default_min_secs_between_coughs")]
    pub min_secs_between_coughs: f64,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            bad_co2_threshold: default_bad_co2(),
            bad_voc_threshold: default_bad_voc(),
            min_secs_between_breaths: default_min_secs_between_breaths(),
            min_secs_between_coughs: default_min_secs_between_coughs(),
        }
    }
}

fn default_bad_co2() -> u16 {
    450
}

fn default_bad_voc() -> u16 {
    50
}

fn default_min_secs_between_breaths() -> f64 {
    10.0
}

fn default_min_secs_between_coughs() -> f64 {
    5.0
}

pub struct MoodStateMachine {
    config: MoodConfig,
    seconds_until_next_breath: f64,
    seconds_until_next_possible_cough: f64,
}

impl MoodStateMachine {
    /// Both timers start drained: a bad first reading coughs at once,
    /// a good first reading breathes at once.
    pub fn new(config: MoodConfig) -> Self {
        Self {
            config,
            seconds_until_next_breath: 0.0,
            seconds_until_next_possible_cough: 0.0,
        }
    }

    /// One control tick. `dt` is wall-clock seconds since the previous
    /// tick. The caller runs the returned animation to completion
    /// before ticking again; the timers are only ever mutated here.
    pub fn step(&mut self, last_sample: Option<&AirQualitySample>, dt: f64) -> Option<MoodAction> {
        let Some(sample) = last_sample else {
            // Sensor still warming up, nothing to decide yet.
            return None;
        };

        let is_bad = sample.co2_ppm >= self.config.bad_co2_threshold
            || sample.voc_ppb >= self.config.bad_voc_threshold;

        // It always becomes more possible to cough.
        self.seconds_until_next_possible_cough -= dt;

        if is_bad {
            // A bad sample defers the next breath whether or not a
            // cough actually fires.
            self.seconds_until_next_breath = self.config.min_secs_between_breaths;

            if self.seconds_until_next_possible_cough <= 0.0 {
                self.seconds_until_next_possible_cough = self.config.min_secs_between_coughs;
                return Some(MoodAction::Cough);
            }
            return None;
        }

        // A good sample gets us closer to a breath.
        self.seconds_until_next_breath -= dt;
        if self.seconds_until_next_breath <= 0.0 {
            self.seconds_until_next_breath = self.config.min_secs_between_breaths;
            return Some(MoodAction::Breathe);
        }
        None
    }

    pub fn seconds_until_next_breath(&self) -> f64 {
        self.seconds_until_next_breath
    }

    pub fn seconds_until_next_possible_cough(&self) -> f64 {
        self.seconds_until_next_possible_cough
    }
}
