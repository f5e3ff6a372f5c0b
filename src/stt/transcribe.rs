//! Transcription parameter and segment types.
//!
//! [`TranscribeParams`] carries the settings for a single Whisper inference
//! run.  [`TranscriptionSegment`] is the unit every recognition engine yields;
//! it serializes to JSON so a run's segment list can be persisted next to the
//! subtitle file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TranscribeParams
// ---------------------------------------------------------------------------

/// All parameters for a single Whisper transcription run.
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    /// ISO-639-1 language code (e.g. `"en"`), or `"auto"` for Whisper's
    /// built-in language detection.
    pub language: String,

    /// Number of CPU threads handed to Whisper.  Defaults to
    /// [`optimal_threads()`], capped at 8.
    pub n_threads: i32,

    /// Suppress Whisper's progress output to stderr.
    pub suppress_progress: bool,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            language: "en".into(),
            n_threads: optimal_threads(),
            suppress_progress: true,
        }
    }
}

/// Number of CPU threads to use for inference, capped at 8 — Whisper sees
/// diminishing returns beyond that.
pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// TranscriptionSegment
// ---------------------------------------------------------------------------

/// A single time-aligned unit of transcribed text.
///
/// Segments are yielded in chronological order by the engine and are never
/// mutated after being accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionSegment {
    /// Offset of the segment start from the beginning of the stream.
    pub start: Duration,
    /// Offset of the segment end from the beginning of the stream.
    pub end: Duration,
    /// Segment text (may include punctuation inserted by Whisper).
    pub text: String,
}

impl TranscriptionSegment {
    pub fn new(start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Self {
            start: Duration::from_millis(start_ms),
            end: Duration::from_millis(end_ms),
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
