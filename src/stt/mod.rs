//! STT (speech-to-text) subsystem.
//!
//! # Architecture
//!
//! ```text
//! AudioBuffer (16 kHz mono)
//!        │
//!        ▼
//! RecognitionEngine::start()  ──▶  SegmentSource
//!                                       │ next_segment() … until None
//!                                       ▼
//!                              Vec<TranscriptionSegment>
//! ```
//!
//! The engine yields segments through a pull protocol; [`drain_segments`]
//! accumulates them in order and discards everything on a mid-run error.

pub mod engine;
pub mod transcribe;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{
    drain_segments, RecognitionEngine, SegmentSource, TranscriptionError, WhisperEngine,
    REQUIRED_SAMPLE_RATE,
};
pub use transcribe::{TranscribeParams, TranscriptionSegment};

// test-only re-export so other modules' test code can use the mock without
// reaching into stt::engine.
#[cfg(test)]
pub use engine::MockRecognitionEngine;
