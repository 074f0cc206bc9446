mod audio;
mod baseline;
mod engine;
mod logger;
mod sensor;
mod strip;

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use planter_core::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,planterd=debug")),
        )
        .init();

    let config = Config::load()?;
    info!("Config loaded from: {:?}", Config::config_path());

    // The envelope is extracted once, up front; every cough replays it.
    let clip = audio::WavClip::load(&config.audio.cough_wav)?;
    let envelope = clip.envelope();
    info!("Extracted {}ms cough envelope", envelope.len());

    let strip = strip::build(&config.strip)?;
    let sensor = Box::new(sensor::SimulatedSensor::new(Duration::from_secs(
        config.sensor.warmup_secs,
    )));
    let audio_out = Box::new(audio::CpalAudio::new(clip));

    let engine = engine::Engine::new(config.clone(), sensor, strip, audio_out, envelope);

    let cancel = CancellationToken::new();

    // Cooperative shutdown: ctrl-c flips the token, the engine finishes
    // its in-flight animation, then tears down.
    let ctrlc_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {}", e);
            return;
        }
        info!("Shutdown requested, finishing the current beat");
        ctrlc_cancel.cancel();
    });

    let _logger_handle = if config.logger.enabled {
        Some(logger::start_task(
            config.logger.clone(),
            engine.last_sample(),
            cancel.clone(),
        ))
    } else {
        None
    };

    info!("Planter initialised, running engine loop");
    engine.run(cancel).await
}
