//! Audio reassembly — join per-chunk payloads and decode them as one stream.
//!
//! The endpoints return base64 **fragments of a single audio stream**, so the
//! strings are concatenated in chunk-index order first and decoded once.
//! Decode-then-concatenate would mishandle padding at fragment boundaries and
//! is deliberately not done here.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

// ---------------------------------------------------------------------------
// AssemblyError
// ---------------------------------------------------------------------------

/// Errors while turning payload fragments into an audio file.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// The joined payload string was not valid base64 — the endpoint's audio
    /// encoding does not support append-then-decode, or a fragment was
    /// corrupt.
    #[error("assembled payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Writing the decoded bytes failed.
    #[error("failed to write audio file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// assemble / write_audio
// ---------------------------------------------------------------------------

/// Concatenate `payloads` in index order and decode the result to raw bytes.
pub fn assemble(payloads: &[String]) -> Result<Vec<u8>, AssemblyError> {
    let joined = payloads.concat();
    Ok(BASE64.decode(joined.as_bytes())?)
}

/// Write `bytes` to `path`, overwriting any pre-existing file.
pub fn write_audio(path: &Path, bytes: &[u8]) -> Result<(), AssemblyError> {
    std::fs::write(path, bytes).map_err(|source| AssemblyError::Io {
        path: path.display().to_string(),
        source,
    })?;

    log::info!("wrote {} bytes of audio to {}", bytes.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
