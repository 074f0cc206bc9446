//! Loudness envelope extraction.
//!
//! Converts a PCM clip into one normalized loudness value per
//! millisecond, used to drive the cough lights in sync with playback.
//! Runs once at setup; the result is cached and replayed.

/// Normalized loudness timeline, one entry per millisecond of audio.
#[derive(Debug, Clone)]
pub struct Envelope {
    values: Vec<f32>,
}

impl Envelope {
    /// Extracts the envelope from interleaved f32 PCM in [-1, 1].
    ///
    /// Per millisecond: RMS over that slice's frames, converted to
    /// dBFS. A NaN or infinite dBFS (an all-zero slice produces -inf)
    /// is mapped to 0 dB — the *loudest* value, not silence; the
    /// normalization below tracks the clip minimum, and treating
    /// degenerate slices as the floor would invert the scale.
    /// Each value is then normalized as `1 - |dB / dB_min|`, clamped to
    /// [0, 1], so the clip's loudest moment approaches 1 and its
    /// quietest approaches 0.
    pub fn from_samples(samples: &[f32], sample_rate: u32, channels: u16) -> Self {
        let per_ms = (sample_rate as usize / 1000).max(1) * channels.max(1) as usize;

        let mut dbs: Vec<f32> = Vec::with_capacity(samples.len() / per_ms + 1);
        let mut db_min = 0.0f32;

        for slice in samples.chunks(per_ms) {
            let mean_sq = slice.iter().map(|s| s * s).sum::<f32>() / slice.len() as f32;
            let mut dbfs = 10.0 * mean_sq.log10();
            if dbfs.is_nan() || dbfs.is_infinite() {
                dbfs = 0.0;
            }
            if dbfs < db_min {
                db_min = dbfs;
            }
            dbs.push(dbfs);
        }

        if db_min < 0.0 {
            for v in &mut dbs {
                *v = (1.0 - (*v / db_min).abs()).clamp(0.0, 1.0);
            }
        } else {
            // Uniformly loud (or degenerate) clip: no dynamic range to
            // normalize against.
            for v in &mut dbs {
                *v = 1.0;
            }
        }

        Self { values: dbs }
    }

    /// Envelope length in milliseconds.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Loudness at millisecond `pos`. Panics if out of range; the
    /// caller's stride loop owns the bounds.
    pub fn get(&self, pos: usize) -> f32 {
        self.values[pos]
    }
}
