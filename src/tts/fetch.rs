//! Per-chunk synthesis fetch — the HTTP boundary of the dispatcher.
//!
//! [`ChunkFetcher`] is the seam between dispatch logic and the network: one
//! call sends one text chunk to one endpoint and returns the base64 payload
//! extracted from that endpoint's configured response field.
//! [`HttpChunkFetcher`] is the production implementation; tests substitute
//! fetchers with scripted failures and latency.

use async_trait::async_trait;
use thiserror::Error;

use crate::tts::endpoint::Endpoint;
use crate::tts::voice::Voice;

// ---------------------------------------------------------------------------
// FetchError
// ---------------------------------------------------------------------------

/// A single chunk request that did not produce a payload.
///
/// Any variant fails the whole batch for the endpoint being attempted.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connection refused, DNS, timeout …).
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The endpoint answered with a non-200 status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body was not valid JSON.
    #[error("invalid JSON from {url}: {reason}")]
    Parse { url: String, reason: String },

    /// The JSON response had no string value under the configured field.
    #[error("response from {url} is missing field {field:?}")]
    MissingField { url: String, field: String },
}

// ---------------------------------------------------------------------------
// ChunkFetcher trait
// ---------------------------------------------------------------------------

/// Fetch synthesized audio for one text chunk from one endpoint.
///
/// Implementors must be `Send + Sync`; the dispatcher shares one fetcher
/// across all concurrent chunk workers via `Arc<dyn ChunkFetcher>`.
#[async_trait]
pub trait ChunkFetcher: Send + Sync {
    /// POST `{"text": chunk, "voice": voice}` to `endpoint` and return the
    /// base64 payload from the endpoint's `response` field.
    async fn fetch(
        &self,
        endpoint: &Endpoint,
        chunk: &str,
        voice: Voice,
    ) -> Result<String, FetchError>;
}

// ---------------------------------------------------------------------------
// HttpChunkFetcher
// ---------------------------------------------------------------------------

/// Production fetcher speaking the synthesis endpoint protocol over HTTP.
pub struct HttpChunkFetcher {
    client: reqwest::Client,
}

impl HttpChunkFetcher {
    /// Build a fetcher.  `timeout_secs` bounds each request when set; by
    /// default requests have no deadline of their own — a hung endpoint
    /// stalls the attempt until the caller gives up.
    pub fn new(timeout_secs: Option<u64>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for HttpChunkFetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl ChunkFetcher for HttpChunkFetcher {
    async fn fetch(
        &self,
        endpoint: &Endpoint,
        chunk: &str,
        voice: Voice,
    ) -> Result<String, FetchError> {
        let body = serde_json::json!({
            "text":  chunk,
            "voice": voice.id(),
        });

        let response = self
            .client
            .post(&endpoint.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: endpoint.url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                url: endpoint.url.clone(),
                status: status.as_u16(),
            });
        }

        let json: serde_json::Value = response.json().await.map_err(|e| FetchError::Parse {
            url: endpoint.url.clone(),
            reason: e.to_string(),
        })?;

        let payload = json
            .get(&endpoint.response)
            .and_then(|v| v.as_str())
            .ok_or_else(|| FetchError::MissingField {
                url: endpoint.url.clone(),
                field: endpoint.response.clone(),
            })?;

        Ok(payload.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoint(server: &MockServer, response_field: &str) -> Endpoint {
        Endpoint {
            url: format!("{}/speak", server.uri()),
            response: response_field.into(),
        }
    }

    #[tokio::test]
    async fn extracts_payload_from_configured_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/speak"))
            .and(body_json(serde_json::json!({
                "text": "hello there.",
                "voice": "en_uk_001"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": "c29tZSBhdWRpbw=="
            })))
            .mount(&server)
            .await;

        let fetcher = HttpChunkFetcher::default();
        let payload = fetcher
            .fetch(&endpoint(&server, "data"), "hello there.", Voice::UkMale1)
            .await
            .unwrap();

        assert_eq!(payload, "c29tZSBhdWRpbw==");
    }

    #[tokio::test]
    async fn non_200_status_is_a_chunk_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = HttpChunkFetcher::default();
        let err = fetcher
            .fetch(&endpoint(&server, "data"), "text.", Voice::UsFemale1)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_a_chunk_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let fetcher = HttpChunkFetcher::default();
        let err = fetcher
            .fetch(&endpoint(&server, "data"), "text.", Voice::UsFemale1)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[tokio::test]
    async fn missing_response_field_is_a_chunk_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "something_else": "abc"
            })))
            .mount(&server)
            .await;

        let fetcher = HttpChunkFetcher::default();
        let err = fetcher
            .fetch(&endpoint(&server, "data"), "text.", Voice::UsFemale1)
            .await
            .unwrap_err();

        match err {
            FetchError::MissingField { field, .. } => assert_eq!(field, "data"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_string_field_value_is_a_chunk_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": 42
            })))
            .mount(&server)
            .await;

        let fetcher = HttpChunkFetcher::default();
        let err = fetcher
            .fetch(&endpoint(&server, "data"), "text.", Voice::UsFemale1)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::MissingField { .. }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_failure() {
        let fetcher = HttpChunkFetcher::default();
        let unreachable = Endpoint {
            url: "http://127.0.0.1:1/speak".into(),
            response: "data".into(),
        };

        let err = fetcher
            .fetch(&unreachable, "text.", Voice::UsFemale1)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Request { .. }));
    }
}
