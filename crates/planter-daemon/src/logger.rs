//! Remote sample logging.
//!
//! An independent task forwards the most recent sample to a spreadsheet
//! webhook on a coarse interval — decoupled from sensing so a slow or
//! unreachable endpoint never stalls the engine. Every failure here is
//! logged and swallowed.

use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use planter_core::config::LoggerConfig;
use planter_core::AirQualitySample;

pub struct RemoteLogger {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteLogger {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub async fn log(&self, sample: &AirQualitySample) -> anyhow::Result<()> {
        self.client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "timestamp": sample.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                "co2_ppm": sample.co2_ppm,
                "voc_ppb": sample.voc_ppb,
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

pub fn start_task(
    config: LoggerConfig,
    last_sample: Arc<RwLock<Option<AirQualitySample>>>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let logger = RemoteLogger::new(config.endpoint.clone());
        let interval = std::time::Duration::from_secs(config.interval_secs.max(1));
        let mut last_logged: Option<DateTime<Local>> = None;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let sample = { last_sample.read().await.clone() };
            let Some(sample) = sample else { continue };
            if last_logged == Some(sample.timestamp) {
                continue;
            }

            match logger.log(&sample).await {
                Ok(()) => {
                    debug!("logged {} ppm / {} ppb", sample.co2_ppm, sample.voc_ppb);
                    last_logged = Some(sample.timestamp);
                }
                Err(e) => warn!("remote log failed: {}", e),
            }
        }
    })
}
