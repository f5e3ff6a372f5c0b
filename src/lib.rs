//! autoshorts — automated short-video narration and captioning.
//!
//! The crate has two independent data flows:
//!
//! ```text
//! captioning:  video ─▶ audio (WAV) ─▶ mono 16 kHz samples ─▶ segments ─▶ SRT
//! narration:   text ─▶ chunks ─▶ endpoint fan-out ─▶ reassembled audio file
//! ```
//!
//! # Modules
//!
//! * [`audio`] — WAV decoding into normalized mono samples; sample-rate guard.
//! * [`stt`] — recognition engine seam (Whisper) and segment accumulation.
//! * [`captions`] — subtitle timing allocation and SRT output.
//! * [`tts`] — text chunking, concurrent synthesis dispatch, reassembly.
//! * [`media`] — ffmpeg / ffprobe collaborators behind narrow traits.
//! * [`pipeline`] — per-video orchestration and the directory scan.
//! * [`config`] — TOML settings passed explicitly into each component.

pub mod audio;
pub mod captions;
pub mod config;
pub mod media;
pub mod pipeline;
pub mod stt;
pub mod tts;
