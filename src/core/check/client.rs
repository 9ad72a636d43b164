//! HTTP Probe Client Implementations
//!
//! Provides the HTTP client abstraction used by HTTP and HTTPS checks:
//! GET method, bounded redirect following, overall request deadline.

use crate::core::check::types::{CheckError, MAX_REDIRECTS};
use std::time::Duration;

use isahc::config::{Configurable, RedirectPolicy};
use isahc::error::ErrorKind;
use isahc::{AsyncReadResponseExt, HttpClient, Request};

/// Dedicated HTTP client for reachability probes
///
/// The timeout and redirect policy are fixed when the client is built so the
/// same client, and its connection pool, serves every check of a run.
#[async_trait::async_trait]
pub trait HttpProbeClient: Send + Sync {
    /// Execute a GET request and return the final status code
    ///
    /// # Arguments
    /// * `url` - Complete target URL (e.g., "https://example.com/ready")
    ///
    /// # Returns
    /// * `Ok(u16)` - Status of the final response after redirects
    /// * `Err(CheckError::TooManyRedirects)` - Redirect cap exceeded
    /// * `Err(CheckError::Transport)` - DNS, connect, TLS or timeout failure
    ///
    /// # Implementation Requirements
    /// * Must use GET method
    /// * Must follow up to `MAX_REDIRECTS` redirects and fail past that
    /// * Dropping the returned future must abort the request
    async fn get_status(&self, url: &str) -> Result<u16, CheckError>;
}

/// Production probe client implementation using isahc
pub struct IsahcProbeClient {
    client: HttpClient,
    timeout: Duration,
}

#[async_trait::async_trait]
impl HttpProbeClient for IsahcProbeClient {
    async fn get_status(&self, url: &str) -> Result<u16, CheckError> {
        let request = Request::get(url)
            .header("User-Agent", concat!("beepboop/", env!("CARGO_PKG_VERSION")))
            .body(Vec::new())
            .map_err(|e| CheckError::Transport(format!("invalid request for {}: {}", url, e)))?;

        // isahc restarts its own timeout on every redirect hop; the deadline
        // covers the whole chain
        let exchange = async {
            let mut response = self
                .client
                .send_async(request)
                .await
                .map_err(map_isahc_error)?;

            let status_code = response.status().as_u16();

            // Drain the body so the connection can go back to the pool
            let _ = response.consume().await;

            Ok::<u16, CheckError>(status_code)
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                CheckError::Transport(format!(
                    "request timed out: no final response from {} within {:?}",
                    url, self.timeout
                ))
            })?
    }
}

impl IsahcProbeClient {
    /// Build a client with `timeout` as overall request deadline and a
    /// redirect cap of `MAX_REDIRECTS`
    pub fn new(timeout: Duration) -> Result<Self, CheckError> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .redirect_policy(RedirectPolicy::Limit(MAX_REDIRECTS as u32))
            .build()
            .map_err(|e| CheckError::ClientBuild(e.to_string()))?;
        Ok(Self { client, timeout })
    }
}

fn map_isahc_error(error: isahc::Error) -> CheckError {
    match error.kind() {
        ErrorKind::TooManyRedirects => CheckError::TooManyRedirects(MAX_REDIRECTS),
        ErrorKind::Timeout => CheckError::Transport(format!("request timed out: {}", error)),
        _ => CheckError::Transport(format!("request failed: {}", error)),
    }
}
