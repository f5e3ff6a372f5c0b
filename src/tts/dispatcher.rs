//! Synthesis dispatch — endpoint fallback wrapped around a per-chunk fan-out.
//!
//! # Dispatch shape
//!
//! ```text
//! text ──▶ split_text ──▶ [chunk 0 … chunk n-1]
//!                              │
//!               for each endpoint, in priority order:
//!                              │
//!                  spawn one task per chunk  ──▶  POST {text, voice}
//!                              │                    │
//!                              │        payload ──▶ slots[chunk index]
//!                              │                    (Mutex-guarded write)
//!                              ▼
//!                  join ALL tasks (fan-in barrier)
//!                              │
//!               any failure? ──▶ discard this endpoint's slots, try next
//!               all ok?      ──▶ payloads in chunk-index order
//! ```
//!
//! Reassembly order is decided by chunk index, never by completion order.
//! An endpoint that fails any chunk is abandoned wholesale — chunks that did
//! succeed there are thrown away with it (known inefficiency, kept for its
//! simple all-or-nothing semantics per endpoint).  Workers are never
//! cancelled mid-attempt; a failure is only observed after the barrier.

use std::path::Path;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::tts::assembler::{assemble, write_audio, AssemblyError};
use crate::tts::chunker::{split_text, DEFAULT_CHUNK_LIMIT};
use crate::tts::endpoint::Endpoint;
use crate::tts::fetch::{ChunkFetcher, FetchError};
use crate::tts::voice::Voice;

// ---------------------------------------------------------------------------
// SynthesisError
// ---------------------------------------------------------------------------

/// Errors from a synthesis dispatch call.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The input text was empty — nothing to synthesize.
    #[error("'text' must not be empty")]
    EmptyText,

    /// The endpoint list was empty.
    #[error("no synthesis endpoints configured")]
    NoEndpoints,

    /// Every configured endpoint failed the batch.
    #[error("all {attempted} synthesis endpoints failed")]
    AllEndpointsFailed { attempted: usize },

    /// The fetched payloads could not be decoded or written.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

// ---------------------------------------------------------------------------
// SynthesisDispatcher
// ---------------------------------------------------------------------------

/// Fetches synthesized audio for a text, one bounded chunk at a time, with
/// whole-batch fallback across a ranked endpoint list.
pub struct SynthesisDispatcher {
    fetcher: Arc<dyn ChunkFetcher>,
    endpoints: Vec<Endpoint>,
    chunk_limit: usize,
}

impl SynthesisDispatcher {
    /// Build a dispatcher over `endpoints` (priority order) using `fetcher`
    /// for every chunk request.
    pub fn new(fetcher: Arc<dyn ChunkFetcher>, endpoints: Vec<Endpoint>) -> Self {
        Self {
            fetcher,
            endpoints,
            chunk_limit: DEFAULT_CHUNK_LIMIT,
        }
    }

    /// Override the maximum chunk length in bytes.
    pub fn with_chunk_limit(mut self, limit: usize) -> Self {
        self.chunk_limit = limit;
        self
    }

    /// Synthesize `text` with `voice` and return the base64 payloads in
    /// chunk-index order.
    ///
    /// # Errors
    ///
    /// * [`SynthesisError::EmptyText`] / [`SynthesisError::NoEndpoints`] —
    ///   rejected before any network traffic.
    /// * [`SynthesisError::AllEndpointsFailed`] — every endpoint failed at
    ///   least one chunk of the batch.
    pub async fn synthesize(
        &self,
        text: &str,
        voice: Voice,
    ) -> Result<Vec<String>, SynthesisError> {
        if text.is_empty() {
            return Err(SynthesisError::EmptyText);
        }
        if self.endpoints.is_empty() {
            return Err(SynthesisError::NoEndpoints);
        }

        let chunks = split_text(text, self.chunk_limit);
        log::debug!(
            "synthesizing {} chunk(s) with voice {} across {} endpoint(s)",
            chunks.len(),
            voice,
            self.endpoints.len()
        );

        for endpoint in &self.endpoints {
            match self.try_endpoint(endpoint, &chunks, voice).await {
                Ok(payloads) => {
                    log::info!(
                        "synthesized {} chunk(s) via {}",
                        payloads.len(),
                        endpoint.url
                    );
                    return Ok(payloads);
                }
                Err(e) => {
                    log::warn!("endpoint {} failed: {e}; trying next", endpoint.url);
                }
            }
        }

        Err(SynthesisError::AllEndpointsFailed {
            attempted: self.endpoints.len(),
        })
    }

    /// Synthesize `text` and write the assembled audio to `output`,
    /// overwriting any existing file.
    pub async fn synthesize_to_file(
        &self,
        text: &str,
        voice: Voice,
        output: &Path,
    ) -> Result<(), SynthesisError> {
        let payloads = self.synthesize(text, voice).await?;
        let bytes = assemble(&payloads)?;
        write_audio(output, &bytes)?;
        Ok(())
    }

    /// One whole-batch attempt against a single endpoint.
    ///
    /// Spawns one task per chunk; every task writes its payload into the
    /// pre-sized slot for its chunk index under the mutex.  All tasks are
    /// joined before success or failure is decided, so in-flight siblings of
    /// a failed chunk always run to completion.
    async fn try_endpoint(
        &self,
        endpoint: &Endpoint,
        chunks: &[String],
        voice: Voice,
    ) -> Result<Vec<String>, FetchError> {
        let slots: Arc<Mutex<Vec<Option<String>>>> =
            Arc::new(Mutex::new(vec![None; chunks.len()]));

        let mut handles = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let endpoint = endpoint.clone();
            let chunk = chunk.clone();
            let slots = Arc::clone(&slots);

            handles.push(tokio::spawn(async move {
                let payload = fetcher.fetch(&endpoint, &chunk, voice).await?;
                // Storage position is the chunk index; completion order is
                // irrelevant to reassembly.
                slots.lock().unwrap()[index] = Some(payload);
                Ok::<(), FetchError>(())
            }));
        }

        // Fan-in barrier.  The first failure is remembered, the rest of the
        // batch still joins.
        let mut first_err: Option<FetchError> = None;
        for handle in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_err) => Err(FetchError::Request {
                    url: endpoint.url.clone(),
                    reason: format!("chunk worker failed: {join_err}"),
                }),
            };
            if let Err(e) = outcome {
                first_err.get_or_insert(e);
            }
        }

        if let Some(err) = first_err {
            // Whole-batch semantics: chunks that succeeded against this
            // endpoint are discarded together with the failure.
            return Err(err);
        }

        // All writers have joined; move the payloads out.
        let mut slots = slots.lock().unwrap();
        let payloads: Option<Vec<String>> = slots.drain(..).collect();
        payloads.ok_or_else(|| FetchError::Request {
            url: endpoint.url.clone(),
            reason: "chunk worker finished without storing a payload".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
