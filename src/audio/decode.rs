//! WAV container decoding into normalized mono samples.
//!
//! The Whisper STT engine requires **16 kHz mono `f32`** audio in `[-1.0, 1.0)`.
//! [`decode_wav`] performs the first half of that contract: it reads any PCM
//! WAV container and produces a mono [`AudioBuffer`] by averaging interleaved
//! channels per frame.  Rate conversion is the [`guard`](crate::audio::guard)
//! module's job — decoding never resamples.

use std::path::Path;

use thiserror::Error;

use crate::media::MediaError;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// All errors that can arise while turning an audio file into an
/// [`AudioBuffer`] ready for transcription.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The WAV container was missing, truncated or malformed.
    #[error("invalid WAV file {path}: {reason}")]
    Decode { path: String, reason: String },

    /// The file still had the wrong sample rate after the one-shot
    /// resample-and-redecode pass.  Not retried — a second mismatch means the
    /// environment (transcoder) is misconfigured.
    #[error("unexpected sample rate in {path}: {found} Hz (required {required} Hz)")]
    UnsupportedRate {
        path: String,
        found: u32,
        required: u32,
    },

    /// The external transcoder failed during the guard's resample pass.
    #[error("resample failed: {0}")]
    Resample(#[from] MediaError),
}

// ---------------------------------------------------------------------------
// AudioBuffer
// ---------------------------------------------------------------------------

/// Decoded audio: normalized mono samples plus the container's format info.
///
/// Invariant: `samples` is always mono (one sample per frame) regardless of
/// `channels`, which records the channel count **at capture time**.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Normalized samples in `[-1.0, 1.0)`, one per frame.
    pub samples: Vec<f32>,
    /// Sample rate of the container, in Hz.
    pub sample_rate: u32,
    /// Channel count of the container before downmixing.
    pub channels: u16,
}

impl AudioBuffer {
    /// Length of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

// ---------------------------------------------------------------------------
// decode_wav
// ---------------------------------------------------------------------------

/// Decode the WAV file at `path` into a mono [`AudioBuffer`].
///
/// * Integer PCM samples are mapped to float by dividing by
///   `2^(bitDepth-1)`, so a 16-bit sample of `-32768` becomes `-1.0`.
/// * Multi-channel audio is downmixed by averaging all channel values of a
///   frame **before** scaling — exactly one output sample per frame.
/// * IEEE-float WAV samples are taken as-is (already normalized).
///
/// # Errors
///
/// [`AudioError::Decode`] when the container header is invalid or sample data
/// cannot be read.
pub fn decode_wav(path: &Path) -> Result<AudioBuffer, AudioError> {
    let decode_err = |reason: String| AudioError::Decode {
        path: path.display().to_string(),
        reason,
    };

    let reader = hound::WavReader::open(path).map_err(|e| decode_err(e.to_string()))?;
    let spec = reader.spec();
    let channels = spec.channels;
    let sample_rate = spec.sample_rate;

    // A zero bit depth would only come from a malformed fmt chunk that hound
    // let through — fall back to 16.
    let bits = if spec.bits_per_sample == 0 {
        16
    } else {
        spec.bits_per_sample
    };

    let samples = match spec.sample_format {
        hound::SampleFormat::Int => {
            let raw = reader
                .into_samples::<i32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| decode_err(e.to_string()))?;
            let scale = (1i64 << (bits - 1)) as f32;
            downmix_int(&raw, channels, scale)
        }
        hound::SampleFormat::Float => {
            let raw = reader
                .into_samples::<f32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| decode_err(e.to_string()))?;
            downmix_f32(&raw, channels)
        }
    };

    log::debug!(
        "decoded {}: {} samples, {} Hz, {} ch, {} bit",
        path.display(),
        samples.len(),
        sample_rate,
        channels,
        bits
    );

    Ok(AudioBuffer {
        samples,
        sample_rate,
        channels,
    })
}

/// Average interleaved integer frames to mono, then scale into `[-1, 1)`.
fn downmix_int(raw: &[i32], channels: u16, scale: f32) -> Vec<f32> {
    if channels <= 1 {
        return raw.iter().map(|&v| v as f32 / scale).collect();
    }

    let n = channels as usize;
    raw.chunks_exact(n)
        .map(|frame| {
            let sum: i64 = frame.iter().map(|&v| v as i64).sum();
            (sum as f32 / n as f32) / scale
        })
        .collect()
}

/// Average interleaved float frames to mono (samples are already normalized).
fn downmix_f32(raw: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return raw.to_vec();
    }

    let n = channels as usize;
    raw.chunks_exact(n)
        .map(|frame| frame.iter().sum::<f32>() / n as f32)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
