//! External media tool collaborators — ffmpeg and ffprobe.
//!
//! The pipeline never touches video containers or resampling math itself; it
//! delegates both to command-line tools behind two narrow traits:
//!
//! * [`Transcoder`] — extract a WAV track from a video, or rewrite an existing
//!   WAV at a different sample rate / channel count (ffmpeg).
//! * [`DurationProbe`] — measure an audio file's duration in seconds (ffprobe).
//!
//! Production implementations shell out via `std::process::Command`.  Both
//! traits are object-safe and `Send + Sync` so pipelines can hold them behind
//! `Arc<dyn …>` and tests can substitute mocks.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

// ---------------------------------------------------------------------------
// MediaError
// ---------------------------------------------------------------------------

/// Errors surfaced by the external media tools.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The tool binary could not be spawned (not installed / not on PATH).
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited with a non-zero status.
    #[error("{tool} exited with status {status}")]
    Failed { tool: &'static str, status: String },

    /// The tool's output could not be interpreted (ffprobe duration parse).
    #[error("could not parse {tool} output: {output:?}")]
    Parse { tool: &'static str, output: String },
}

// ---------------------------------------------------------------------------
// Transcoder trait
// ---------------------------------------------------------------------------

/// Converts media files into WAV audio at a requested rate and channel count.
///
/// Implementations must be `Send + Sync` so they can be shared across threads
/// behind an `Arc<dyn Transcoder>`.
pub trait Transcoder: Send + Sync {
    /// Extract the audio track of `video` into a WAV file at `wav_out`,
    /// resampled to `sample_rate` Hz with `channels` channels.
    fn extract_audio(
        &self,
        video: &Path,
        wav_out: &Path,
        sample_rate: u32,
        channels: u16,
    ) -> Result<(), MediaError>;

    /// Rewrite the WAV file at `wav_in` into `wav_out` at `sample_rate` Hz
    /// with `channels` channels.
    fn resample(
        &self,
        wav_in: &Path,
        wav_out: &Path,
        sample_rate: u32,
        channels: u16,
    ) -> Result<(), MediaError>;
}

// ---------------------------------------------------------------------------
// DurationProbe trait
// ---------------------------------------------------------------------------

/// Measures the duration of an audio file in seconds.
pub trait DurationProbe: Send + Sync {
    fn duration_secs(&self, audio: &Path) -> Result<f64, MediaError>;
}

// ---------------------------------------------------------------------------
// FfmpegTranscoder
// ---------------------------------------------------------------------------

/// Production [`Transcoder`] that shells out to `ffmpeg`.
#[derive(Debug, Clone, Default)]
pub struct FfmpegTranscoder;

impl FfmpegTranscoder {
    fn run(mut cmd: Command) -> Result<(), MediaError> {
        let status = cmd.status().map_err(|source| MediaError::Spawn {
            tool: "ffmpeg",
            source,
        })?;

        if !status.success() {
            return Err(MediaError::Failed {
                tool: "ffmpeg",
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

impl Transcoder for FfmpegTranscoder {
    fn extract_audio(
        &self,
        video: &Path,
        wav_out: &Path,
        sample_rate: u32,
        channels: u16,
    ) -> Result<(), MediaError> {
        log::debug!(
            "ffmpeg: extracting audio {} -> {} ({} Hz, {} ch)",
            video.display(),
            wav_out.display(),
            sample_rate,
            channels
        );

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y")
            .arg("-i")
            .arg(video)
            .args(["-acodec", "pcm_s16le"])
            .arg("-ar")
            .arg(sample_rate.to_string())
            .arg("-ac")
            .arg(channels.to_string())
            .args(["-f", "wav"])
            .arg(wav_out);
        Self::run(cmd)
    }

    fn resample(
        &self,
        wav_in: &Path,
        wav_out: &Path,
        sample_rate: u32,
        channels: u16,
    ) -> Result<(), MediaError> {
        log::debug!(
            "ffmpeg: resampling {} -> {} ({} Hz, {} ch)",
            wav_in.display(),
            wav_out.display(),
            sample_rate,
            channels
        );

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y")
            .arg("-i")
            .arg(wav_in)
            .arg("-ar")
            .arg(sample_rate.to_string())
            .arg("-ac")
            .arg(channels.to_string())
            .arg(wav_out);
        Self::run(cmd)
    }
}

// ---------------------------------------------------------------------------
// FfprobeDurationProbe
// ---------------------------------------------------------------------------

/// Production [`DurationProbe`] that shells out to `ffprobe`.
#[derive(Debug, Clone, Default)]
pub struct FfprobeDurationProbe;

impl DurationProbe for FfprobeDurationProbe {
    fn duration_secs(&self, audio: &Path) -> Result<f64, MediaError> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(audio)
            .output()
            .map_err(|source| MediaError::Spawn {
                tool: "ffprobe",
                source,
            })?;

        if !output.status.success() {
            return Err(MediaError::Failed {
                tool: "ffprobe",
                status: output.status.to_string(),
            });
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse ffprobe's `format=duration` output (a bare float on one line).
fn parse_duration(stdout: &str) -> Result<f64, MediaError> {
    stdout
        .trim()
        .parse::<f64>()
        .map_err(|_| MediaError::Parse {
            tool: "ffprobe",
            output: stdout.trim().to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
