//! TTS (text-to-speech) subsystem.
//!
//! # Architecture
//!
//! ```text
//! text ──▶ chunker ──▶ SynthesisDispatcher ──▶ assembler ──▶ audio file
//!                            │
//!                ChunkFetcher (HTTP seam)
//!                            │
//!            Endpoint list (JSON config, priority order)
//! ```
//!
//! The dispatcher tries each endpoint for the whole chunk batch, fanning out
//! one concurrent request per chunk; results are reassembled strictly in
//! chunk order, then concatenated and base64-decoded as one stream.

pub mod assembler;
pub mod chunker;
pub mod dispatcher;
pub mod endpoint;
pub mod fetch;
pub mod voice;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use assembler::{assemble, write_audio, AssemblyError};
pub use chunker::{split_text, DEFAULT_CHUNK_LIMIT};
pub use dispatcher::{SynthesisDispatcher, SynthesisError};
pub use endpoint::{load_endpoints, Endpoint};
pub use fetch::{ChunkFetcher, FetchError, HttpChunkFetcher};
pub use voice::{UnknownVoice, Voice};
