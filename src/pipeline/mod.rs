//! Caption pipeline orchestrator.
//!
//! Wires the audio, STT and caption subsystems into a per-video run and a
//! directory scan.  See [`runner::CaptionPipeline`] for the flow.

pub mod runner;

pub use runner::{CaptionPipeline, PipelineError};
