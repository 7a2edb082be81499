//! HTTP transport
//!
//! Lookups go through the `HttpClient` trait so the caching and fallback
//! logic can be exercised without a network. `UreqClient` is the real
//! implementation: a single agent whose connection pool is shared by every
//! request, which keeps per-dependency lookups over one host cheap.

use std::time::Duration;
use thiserror::Error;

// PyPI documents for projects with long release histories run to several MB
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to read response from {url}: {message}")]
    Body { url: String, message: String },
}

/// A completed HTTP exchange. Error statuses are responses, not errors.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Minimal blocking GET client
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

/// `HttpClient` backed by a shared `ureq::Agent`
pub struct UreqClient {
    agent: ureq::Agent,
    user_agent: String,
}

impl UreqClient {
    /// Build a client. `timeout` of `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();

        Self {
            agent: config.into(),
            user_agent: format!("py3ready/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| HttpError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .map_err(|e| HttpError::Body {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(HttpResponse { status, body })
    }
}
