//! REST client for the petitions API.
//!
//! Wraps `GET {base}/petitions.json` and `GET {base}/petitions/{id}.json`
//! using [`reqwest`]. Responses are returned as raw JSON so the cache can
//! store them without knowing their shape.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Production base URL of the petitions service.
pub const DEFAULT_BASE_URL: &str = "https://petition.parliament.uk";

/// Default per-request timeout for upstream calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the upstream API layer.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The petitions API returned a non-2xx status code.
    #[error("API request failed: {status_text}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, e.g. `Not Found`.
        status_text: String,
    },

    /// No response arrived within the configured timeout.
    #[error("API request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body was not valid JSON or not the expected shape.
    #[error("Malformed upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can resolve an upstream endpoint path to a JSON payload.
///
/// The cache depends on this rather than on [`PetitionsApi`] directly so
/// tests can substitute canned responses.
#[async_trait]
pub trait UpstreamFetch: Send + Sync {
    /// Fetch `endpoint` (a path such as `/petitions/1.json`).
    async fn fetch_json(&self, endpoint: &str) -> Result<Value, SourceError>;
}

/// HTTP client for the petitions API.
pub struct PetitionsApi {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl PetitionsApi {
    /// Create a client for `base_url` (no trailing slash required) with a
    /// per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("petitions-watch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SourceError::Request)?;
        Ok(Self::with_client(client, base_url, timeout))
    }

    /// Create a client reusing an existing [`reqwest::Client`]. `timeout`
    /// should match the one the client was built with; it is only used to
    /// report [`SourceError::Timeout`].
    pub fn with_client(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn classify(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout(self.timeout)
        } else {
            SourceError::Request(err)
        }
    }
}

#[async_trait]
impl UpstreamFetch for PetitionsApi {
    async fn fetch_json(&self, endpoint: &str) -> Result<Value, SourceError> {
        let url = self.url_for(endpoint);
        tracing::debug!(%url, "Fetching from petitions API");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Petitions API returned an error status");
            return Err(SourceError::Upstream {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(serde_json::from_slice(&body)?)
    }
}
