//! Recognition engine trait and the Whisper implementation.
//!
//! # Overview
//!
//! [`RecognitionEngine`] is the boundary between the pipeline and the speech
//! model.  Engines expose a pull-based protocol: [`RecognitionEngine::start`]
//! runs inference and hands back a [`SegmentSource`], which yields one
//! [`TranscriptionSegment`] per call until exhausted.  [`drain_segments`]
//! accumulates a whole run in yield order; an engine error mid-drain discards
//! everything already produced — no partial transcript ever escapes.
//!
//! [`WhisperEngine`] is the production implementation wrapping a
//! `whisper_rs::WhisperContext`.  [`MockRecognitionEngine`] (test-only) yields
//! a scripted segment sequence with optional mid-run failure injection.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::AudioBuffer;
use crate::stt::transcribe::{TranscribeParams, TranscriptionSegment};

/// Sample rate every engine requires at its input, in Hz.
pub const REQUIRED_SAMPLE_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// TranscriptionError
// ---------------------------------------------------------------------------

/// All errors that can arise from the transcription subsystem.
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    /// The GGML model file was not found at the given path.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// `whisper_rs` failed to initialise a context or per-run state.
    #[error("whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// The engine failed during inference or while yielding a segment.
    /// Aborts the run for that input; segments already yielded are discarded.
    #[error("transcription failed: {0}")]
    Engine(String),

    /// The audio buffer handed to the engine was not at the required rate —
    /// the sample-rate guard should have caught this upstream.
    #[error("audio must be {required} Hz, got {found} Hz")]
    WrongSampleRate { found: u32, required: u32 },
}

// ---------------------------------------------------------------------------
// SegmentSource / RecognitionEngine traits
// ---------------------------------------------------------------------------

/// Pull-based segment protocol: `Ok(Some(_))` yields the next segment in
/// chronological order, `Ok(None)` signals exhaustion.
pub trait SegmentSource {
    fn next_segment(&mut self) -> Result<Option<TranscriptionSegment>, TranscriptionError>;
}

/// Object-safe, thread-safe interface for speech-recognition engines.
///
/// # Contract
///
/// * `audio` must be mono `f32` PCM at [`REQUIRED_SAMPLE_RATE`].
/// * Segments come back in chronological order; they are not re-sorted.
pub trait RecognitionEngine: Send + Sync {
    /// Run inference over `audio` and return a source of its segments.
    fn start(&self, audio: &AudioBuffer)
        -> Result<Box<dyn SegmentSource + '_>, TranscriptionError>;

    /// Run a complete transcription: start a run and drain every segment.
    fn transcribe(
        &self,
        audio: &AudioBuffer,
    ) -> Result<Vec<TranscriptionSegment>, TranscriptionError> {
        let mut source = self.start(audio)?;
        drain_segments(source.as_mut())
    }
}

/// Accumulate every segment of `source` in the order yielded.
///
/// An `Err` from the source aborts the drain and discards all segments
/// collected so far — callers never observe a partial run.
pub fn drain_segments(
    source: &mut dyn SegmentSource,
) -> Result<Vec<TranscriptionSegment>, TranscriptionError> {
    let mut segments = Vec::new();
    while let Some(segment) = source.next_segment()? {
        segments.push(segment);
    }
    Ok(segments)
}

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

/// Production recognition engine wrapping a `whisper_rs::WhisperContext`.
///
/// A fresh `WhisperState` is created for every run, so one engine can be
/// shared across threads without locking.
pub struct WhisperEngine {
    ctx: WhisperContext,
    params: TranscribeParams,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// `WhisperContext` holds a raw pointer internally but whisper-rs declares it
// Send+Sync — the model weights are read-only after loading.
// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs.
unsafe impl Send for WhisperEngine {}
unsafe impl Sync for WhisperEngine {}

impl WhisperEngine {
    /// Load a GGML model from `model_path` and prepare it for inference.
    ///
    /// # Errors
    ///
    /// * [`TranscriptionError::ModelNotFound`] — `model_path` does not exist.
    /// * [`TranscriptionError::ContextInit`] — whisper-rs failed to load it.
    pub fn load(
        model_path: impl AsRef<Path>,
        params: TranscribeParams,
    ) -> Result<Self, TranscriptionError> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(TranscriptionError::ModelNotFound(
                path.display().to_string(),
            ));
        }

        let path_str = path.to_str().ok_or_else(|| {
            TranscriptionError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| TranscriptionError::ContextInit(e.to_string()))?;

        Ok(Self { ctx, params })
    }
}

impl RecognitionEngine for WhisperEngine {
    fn start(
        &self,
        audio: &AudioBuffer,
    ) -> Result<Box<dyn SegmentSource + '_>, TranscriptionError> {
        if audio.sample_rate != REQUIRED_SAMPLE_RATE {
            return Err(TranscriptionError::WrongSampleRate {
                found: audio.sample_rate,
                required: REQUIRED_SAMPLE_RATE,
            });
        }

        let mut fp = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        // set_language takes an Option<&str> whose borrow must outlive fp;
        // both live until state.full() returns below.
        let lang: Option<&str> = if self.params.language == "auto" {
            None
        } else {
            Some(self.params.language.as_str())
        };
        fp.set_language(lang);
        fp.set_n_threads(self.params.n_threads);

        if self.params.suppress_progress {
            fp.set_print_progress(false);
            fp.set_print_realtime(false);
        }

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| TranscriptionError::ContextInit(e.to_string()))?;

        state
            .full(fp, &audio.samples)
            .map_err(|e| TranscriptionError::Engine(e.to_string()))?;

        let total = state
            .full_n_segments()
            .map_err(|e| TranscriptionError::Engine(e.to_string()))?;

        Ok(Box::new(WhisperRun {
            state,
            cursor: 0,
            total,
        }))
    }
}

/// One finished inference pass; yields its segments through the pull protocol.
struct WhisperRun {
    state: whisper_rs::WhisperState,
    cursor: std::ffi::c_int,
    total: std::ffi::c_int,
}

impl SegmentSource for WhisperRun {
    fn next_segment(&mut self) -> Result<Option<TranscriptionSegment>, TranscriptionError> {
        if self.cursor >= self.total {
            return Ok(None);
        }

        let i = self.cursor;
        let text = self
            .state
            .full_get_segment_text(i)
            .map_err(|e| TranscriptionError::Engine(format!("segment {i}: {e}")))?;

        // Timestamps come back in centiseconds; × 10 for milliseconds.
        let t0 = self.state.full_get_segment_t0(i).unwrap_or(0).max(0) as u64 * 10;
        let t1 = self.state.full_get_segment_t1(i).unwrap_or(0).max(0) as u64 * 10;

        self.cursor += 1;
        Ok(Some(TranscriptionSegment::new(t0, t1, text)))
    }
}

// ---------------------------------------------------------------------------
// MockRecognitionEngine  (test-only)
// ---------------------------------------------------------------------------

/// Test double yielding a scripted segment sequence, optionally failing after
/// a given number of yields to exercise partial-discard semantics.
#[cfg(test)]
pub struct MockRecognitionEngine {
    segments: Vec<TranscriptionSegment>,
    fail_after: Option<usize>,
}

#[cfg(test)]
impl MockRecognitionEngine {
    /// Yield `segments` then exhaust cleanly.
    pub fn ok(segments: Vec<TranscriptionSegment>) -> Self {
        Self {
            segments,
            fail_after: None,
        }
    }

    /// Yield the first `n` of `segments`, then fail with an engine error.
    pub fn failing_after(segments: Vec<TranscriptionSegment>, n: usize) -> Self {
        Self {
            segments,
            fail_after: Some(n),
        }
    }
}

#[cfg(test)]
impl RecognitionEngine for MockRecognitionEngine {
    fn start(
        &self,
        audio: &AudioBuffer,
    ) -> Result<Box<dyn SegmentSource + '_>, TranscriptionError> {
        // Enforce the rate contract in the mock too, so callers are tested
        // against it.
        if audio.sample_rate != REQUIRED_SAMPLE_RATE {
            return Err(TranscriptionError::WrongSampleRate {
                found: audio.sample_rate,
                required: REQUIRED_SAMPLE_RATE,
            });
        }

        Ok(Box::new(MockSource {
            segments: self.segments.clone().into(),
            fail_after: self.fail_after,
            yielded: 0,
        }))
    }
}

#[cfg(test)]
struct MockSource {
    segments: std::collections::VecDeque<TranscriptionSegment>,
    fail_after: Option<usize>,
    yielded: usize,
}

#[cfg(test)]
impl SegmentSource for MockSource {
    fn next_segment(&mut self) -> Result<Option<TranscriptionSegment>, TranscriptionError> {
        if self.fail_after == Some(self.yielded) {
            return Err(TranscriptionError::Engine("mock engine failure".into()));
        }
        self.yielded += 1;
        Ok(self.segments.pop_front())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
