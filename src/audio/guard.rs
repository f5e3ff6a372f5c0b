//! Sample-rate guard — one-shot resample-and-redecode before transcription.
//!
//! Whisper only accepts 16 kHz input.  Extraction already requests that rate
//! from the transcoder, so a mismatch here is rare; when it happens the guard
//! asks the external [`Transcoder`] to rewrite the file once, redecodes it and
//! re-checks.  A second mismatch is a hard [`AudioError::UnsupportedRate`] —
//! resampling is deterministic, so retrying cannot help.

use std::path::{Path, PathBuf};

use crate::audio::decode::{decode_wav, AudioBuffer, AudioError};
use crate::media::Transcoder;

// ---------------------------------------------------------------------------
// ensure_sample_rate
// ---------------------------------------------------------------------------

/// Verify `buffer` is at `required_rate` Hz, resampling the backing WAV file
/// once if it is not.
///
/// Returns the (possibly redecoded) buffer together with the path of the file
/// it was decoded from — callers that probe duration or keep the file around
/// must use the returned path, since a resample writes a sibling file.
///
/// # Errors
///
/// * [`AudioError::Resample`] — the transcoder failed.
/// * [`AudioError::Decode`] — the resampled file could not be decoded.
/// * [`AudioError::UnsupportedRate`] — still the wrong rate after resampling.
pub fn ensure_sample_rate(
    buffer: AudioBuffer,
    wav_path: &Path,
    required_rate: u32,
    transcoder: &dyn Transcoder,
) -> Result<(AudioBuffer, PathBuf), AudioError> {
    if buffer.sample_rate == required_rate {
        return Ok((buffer, wav_path.to_path_buf()));
    }

    log::warn!(
        "resampling {} from {} -> {} Hz",
        wav_path.display(),
        buffer.sample_rate,
        required_rate
    );

    let resampled = resampled_path(wav_path, required_rate);
    transcoder.resample(wav_path, &resampled, required_rate, 1)?;

    let buffer = decode_wav(&resampled)?;
    if buffer.sample_rate != required_rate {
        return Err(AudioError::UnsupportedRate {
            path: resampled.display().to_string(),
            found: buffer.sample_rate,
            required: required_rate,
        });
    }

    Ok((buffer, resampled))
}

/// Sibling path for the resampled copy, e.g. `clip.wav` -> `clip.16k.wav`.
fn resampled_path(wav_path: &Path, rate: u32) -> PathBuf {
    wav_path.with_extension(format!("{}k.wav", rate / 1_000))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
