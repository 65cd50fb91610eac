//! HTTP transport seam for the AcoustID client.
//!
//! The client never talks to reqwest directly; it goes through the
//! [`LookupTransport`] trait so tests can substitute a scripted fake and
//! count calls without a network. The production implementation wraps a
//! shared `reqwest::Client` with gzip decompression enabled.
//!
//! A failed request is reported in one of two distinct shapes:
//! - the server answered with a non-2xx status: [`TransportError::Status`]
//!   bundles the status line and the raw body into the single combined
//!   message the normalization layer expects;
//! - the request never produced an HTTP response at all (DNS failure, TLS
//!   handshake, timeout): [`TransportError::Unreachable`]. These must stay
//!   separate - there is no status line or body to normalize.

use async_trait::async_trait;

/// Fixed client identifier sent with every request.
pub const USER_AGENT: &str = "mp3manager";

/// Transport-level failure, before any normalization.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Non-2xx response. The message is `"<status line> - <raw body>"`.
    #[error("{0}")]
    Status(String),

    /// The request never yielded an HTTP response.
    #[error("{0}")]
    Unreachable(String),
}

/// A single-shot GET capability.
#[async_trait]
pub trait LookupTransport: Send + Sync {
    /// Issue a GET and return the raw response body on 2xx.
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// Production transport backed by reqwest.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .gzip(true) // Accept gzip-compressed responses
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");
        Self { http }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        if status.is_success() {
            return Ok(body);
        }

        Err(TransportError::Status(format!(
            "{} {} - {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            body
        )))
    }
}
