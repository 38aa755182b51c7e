//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Default User-Agent string for requests against the geoportal API.
const DEFAULT_USER_AGENT: &str = concat!("minemap/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Errors raised by HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The underlying client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// The URL could not be built from its parts
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection, DNS or timeout failure before a response arrived
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response body could not be read
    #[error("Failed to read response from {url}: {message}")]
    Body { url: String, message: String },
}

/// Trait for asynchronous HTTP client operations.
///
/// Every component that talks to the geoportal API takes a client through
/// this trait so tests can substitute canned responses.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request, query string included
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;
}

/// Builds `base` with `query` appended as URL-encoded parameters.
pub fn url_with_query(base: &str, query: &[(&str, String)]) -> Result<String, HttpError> {
    let url = if query.is_empty() {
        reqwest::Url::parse(base)
    } else {
        reqwest::Url::parse_with_params(base, query.iter().map(|(k, v)| (*k, v.as_str())))
    };

    url.map(|u| u.to_string())
        .map_err(|e| HttpError::InvalidUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new client with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// Creates a new client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(HttpError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                });
            }
        };

        if !response.status().is_success() {
            warn!(
                url = url,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(HttpError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(HttpError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}
