use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::color::Hsv;
use crate::mood::MoodConfig;
use crate::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub mood: MoodConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub strip: StripConfig,
    #[serde(default)]
    pub logger: LoggerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Calming color for the breathe animation (teal by default).
    #[serde(default = "default_breathe_color")]
    pub breathe_color: Hsv,
    /// Alarming color for the cough animation (red by default).
    #[serde(default = "default_cough_color")]
    pub cough_color: Hsv,
    #[serde(default = "default_breathe_cycle_secs")]
    pub breathe_cycle_secs: f32,
    #[serde(default = "default_breathe_frame_ms")]
    pub breathe_frame_ms: u64,
    #[serde(default = "default_cough_stride_ms")]
    pub cough_stride_ms: usize,
    /// Hardware brightness ceiling; full-scale APA102s are blinding.
    #[serde(default = "default_max_brightness")]
    pub max_brightness: f32,
    /// How far colors shift toward white at full brightness.
    #[serde(default = "default_whiteness_factor")]
    pub whiteness_factor: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Cough clip, decoded once at startup.
    #[serde(default = "default_cough_wav")]
    pub cough_wav: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Seconds the simulated chip spends emitting warmup readings.
    #[serde(default = "default_warmup_secs")]
    pub warmup_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripConfig {
    /// "terminal" renders the strip as an ANSI row; "null" discards it.
    #[serde(default = "default_strip_backend")]
    pub backend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Webhook endpoint that appends a spreadsheet row per sample.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_log_interval_secs")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Two-line sensor baseline cache.
    #[serde(default = "default_baseline_file")]
    pub baseline_file: PathBuf,
    /// Samples between baseline stores.
    #[serde(default = "default_baseline_store_interval")]
    pub baseline_store_interval: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            breathe_color: default_breathe_color(),
            cough_color: default_cough_color(),
            breathe_cycle_secs: default_breathe_cycle_secs(),
            breathe_frame_ms: default_breathe_frame_ms(),
            cough_stride_ms: default_cough_stride_ms(),
            max_brightness: default_max_brightness(),
            whiteness_factor: default_whiteness_factor(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            cough_wav: default_cough_wav(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            warmup_secs: default_warmup_secs(),
        }
    }
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            backend: default_strip_backend(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            interval_secs: default_log_interval_secs(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            baseline_file: default_baseline_file(),
            baseline_store_interval: default_baseline_store_interval(),
        }
    }
}

fn default_breathe_color() -> Hsv {
    Hsv::new(161.0 / 360.0, 0.98, 1.0)
}

fn default_cough_color() -> Hsv {
    Hsv::new(0.0, 1.0, 1.0)
}

fn default_breathe_cycle_secs() -> f32 {
    4.0
}

fn default_breathe_frame_ms() -> u64 {
    100
}

fn default_cough_stride_ms() -> usize {
    20
}

fn default_max_brightness() -> f32 {
    0.15
}

fn default_whiteness_factor() -> f32 {
    0.8
}

fn default_cough_wav() -> PathBuf {
    platform::data_dir().join("cough.wav")
}

fn default_warmup_secs() -> u64 {
    15
}

fn default_strip_backend() -> String {
    "terminal".to_string()
}

fn default_log_interval_secs() -> u64 {
    5
}

fn default_baseline_file() -> PathBuf {
    platform::data_dir().join("sgp30-baseline")
}

fn default_baseline_store_interval() -> u32 {
    1000
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
