//! Synthesis endpoint catalogue.
//!
//! Endpoints are loaded once at startup from a JSON array:
//!
//! ```json
//! [
//!   { "url": "https://tts.example.com/api", "response": "data" },
//!   { "url": "https://fallback.example.com/speak", "response": "audio_b64" }
//! ]
//! ```
//!
//! List order is fallback priority.  The `response` field names the key in
//! each endpoint's JSON reply that carries the base64 audio payload — the
//! services agree on the request shape but not on the reply shape.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// One remote voice-synthesis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// POST target for synthesis requests.
    pub url: String,
    /// Name of the JSON response field holding the base64 audio payload.
    pub response: String,
}

/// Load the ordered endpoint list from the JSON file at `path`.
///
/// The list is read-only for the lifetime of a dispatch call; callers load it
/// once at process start.
pub fn load_endpoints(path: &Path) -> Result<Vec<Endpoint>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read endpoint config {}", path.display()))?;
    let endpoints: Vec<Endpoint> = serde_json::from_str(&content)
        .with_context(|| format!("invalid endpoint config {}", path.display()))?;

    log::debug!(
        "loaded {} synthesis endpoints from {}",
        endpoints.len(),
        path.display()
    );
    Ok(endpoints)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_ordered_list_from_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("endpoints.json");
        std::fs::write(
            &path,
            r#"[
                { "url": "https://a.example/api", "response": "data" },
                { "url": "https://b.example/speak", "response": "audio" }
            ]"#,
        )
        .unwrap();

        let endpoints = load_endpoints(&path).unwrap();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].url, "https://a.example/api");
        assert_eq!(endpoints[0].response, "data");
        assert_eq!(endpoints[1].response, "audio");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_endpoints(Path::new("/nonexistent/endpoints.json")).unwrap_err();
        assert!(err.to_string().contains("endpoint config"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json ]").unwrap();

        assert!(load_endpoints(&path).is_err());
    }

    #[test]
    fn empty_array_loads_as_empty_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "[]").unwrap();

        // The dispatcher rejects an empty list at dispatch time.
        assert!(load_endpoints(&path).unwrap().is_empty());
    }
}
