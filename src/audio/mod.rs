//! Audio pipeline — WAV decoding and the sample-rate guard.
//!
//! # Pipeline
//!
//! ```text
//! video file → Transcoder (ffmpeg) → WAV → decode_wav → AudioBuffer (mono)
//!                                              │
//!                                   ensure_sample_rate (16 kHz check,
//!                                   one-shot external resample + redecode)
//!                                              │
//!                                              ▼
//!                                    RecognitionEngine input
//! ```

pub mod decode;
pub mod guard;

pub use decode::{decode_wav, AudioBuffer, AudioError};
pub use guard::ensure_sample_rate;
