//! Cough clip playback through cpal.
//!
//! The clip is decoded once at startup (hound) and kept in memory as
//! interleaved f32; the same buffer feeds both the envelope extractor
//! and playback. cpal streams are !Send, so each playback runs on a
//! dedicated thread that owns the stream; the handle the animation
//! polls is just a pair of atomics plus a stop channel, and dropping it
//! tears the thread (and the stream) down.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, warn};

use planter_core::{AudioOutput, Envelope, PlaybackHandle};

/// A decoded WAV clip: interleaved f32 in [-1, 1].
#[derive(Clone)]
pub struct WavClip {
    samples: Arc<Vec<f32>>,
    sample_rate: u32,
    channels: u16,
}

impl WavClip {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut reader =
            hound::WavReader::open(path).with_context(|| format!("opening {:?}", path))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()?
            }
        };

        debug!(
            "loaded {:?}: {} Hz, {} ch, {} frames",
            path,
            spec.sample_rate,
            spec.channels,
            samples.len() / spec.channels.max(1) as usize
        );

        Ok(Self {
            samples: Arc::new(samples),
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    /// Extracts the per-millisecond loudness timeline for this clip.
    pub fn envelope(&self) -> Envelope {
        Envelope::from_samples(&self.samples, self.sample_rate, self.channels)
    }
}

pub struct CpalAudio {
    clip: WavClip,
}

impl CpalAudio {
    pub fn new(clip: WavClip) -> Self {
        Self { clip }
    }
}

impl AudioOutput for CpalAudio {
    fn begin(&mut self) -> anyhow::Result<Box<dyn PlaybackHandle>> {
        let active = Arc::new(AtomicBool::new(true));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel::<anyhow::Result<()>>();

        let clip = self.clip.clone();
        let thread_active = active.clone();

        let join = std::thread::Builder::new()
            .name("cough-audio".into())
            .spawn(move || {
                playback_thread(clip, thread_active, stop_rx, ready_tx);
            })
            .context("spawning audio thread")?;

        // Surface device/stream setup failures to the caller instead of
        // coughing in silence.
        ready_rx
            .recv()
            .map_err(|_| anyhow::anyhow!("audio thread died during setup"))??;

        Ok(Box::new(CpalPlayback {
            active,
            stop_tx,
            join: Some(join),
        }))
    }
}

fn playback_thread(
    clip: WavClip,
    active: Arc<AtomicBool>,
    stop_rx: mpsc::Receiver<()>,
    ready_tx: mpsc::Sender<anyhow::Result<()>>,
) {
    let done = Arc::new(AtomicBool::new(false));

    let stream = match build_stream(&clip, done.clone()) {
        Ok(stream) => {
            let _ = ready_tx.send(Ok(()));
            stream
        }
        Err(e) => {
            active.store(false, Ordering::SeqCst);
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    // Park until the clip is exhausted or the handle asks us to stop.
    while !done.load(Ordering::SeqCst) {
        match stop_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
    }

    // Grace period so the device drains its last buffer.
    std::thread::sleep(Duration::from_millis(100));
    drop(stream);
    active.store(false, Ordering::SeqCst);
}

fn build_stream(clip: &WavClip, done: Arc<AtomicBool>) -> anyhow::Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("no audio output device")?;

    let config = cpal::StreamConfig {
        channels: clip.channels,
        sample_rate: cpal::SampleRate(clip.sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let samples = clip.samples.clone();
    let pos = AtomicUsize::new(0);

    let stream = device.build_output_stream(
        &config,
        move |data: &mut [f32], _| {
            // Pull callback: copy the next slice of the clip, pad the
            // tail with silence once it runs out.
            let start = pos.fetch_add(data.len(), Ordering::Relaxed);
            for (i, out) in data.iter_mut().enumerate() {
                *out = samples.get(start + i).copied().unwrap_or(0.0);
            }
            if start + data.len() >= samples.len() {
                done.store(true, Ordering::SeqCst);
            }
        },
        |e| warn!("audio stream error: {}", e),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

struct CpalPlayback {
    active: Arc<AtomicBool>,
    stop_tx: mpsc::Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl PlaybackHandle for CpalPlayback {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for CpalPlayback {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}
