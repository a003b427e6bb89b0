//! Eth JSON-RPC client
//!
//! Minimal `eth_*` client used to read storage from a node over HTTP.

pub mod api;

pub use api::EthStorageApiClient;
#[cfg(test)]
pub use api::EthStorageApiServer;

use crate::onchain::ReadError;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use std::time::Duration;

/// Default per-request timeout for RPC calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for an RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    /// Endpoint URL (`http(s)://` or `ws(s)://`, the latter is rewritten to HTTP)
    pub url: String,
    /// Timeout applied to every request; an expired request is a read failure
    pub request_timeout: Duration,
}

impl RpcConfig {
    /// Config for `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), request_timeout: DEFAULT_REQUEST_TIMEOUT }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// The URL the HTTP client actually connects to.
    pub fn http_url(&self) -> String {
        self.url.replace("ws://", "http://").replace("wss://", "https://")
    }

    /// Build an HTTP client for this endpoint.
    pub fn http_client(&self) -> Result<HttpClient, ReadError> {
        let url = self.http_url();
        HttpClientBuilder::default()
            .request_timeout(self.request_timeout)
            .build(&url)
            .map_err(|e| ReadError::Connect { url, reason: e.to_string() })
    }
}
