//! Default transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as InnerClient;

use crate::error::{Result, TransportError};
use crate::traits::{HttpClient, Request, Response};

/// The default [`HttpClient`] implementation.
///
/// Wraps a pooled `reqwest` client. Retries are *not* performed here; the
/// pipeline owns the retry loop so that one configuration point governs all
/// transports.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: InnerClient,
}

impl ReqwestClient {
    /// Create a transport with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the underlying TLS/connection pool
    /// setup fails.
    pub fn new() -> Result<Self> {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the underlying TLS/connection pool
    /// setup fails.
    pub fn with_config(config: TransportConfig) -> Result<Self> {
        let client = InnerClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: Request) -> Result<Response> {
        tracing::trace!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Response::new(status, headers, body))
    }
}

/// Connection-level configuration for [`ReqwestClient`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Total per-request timeout
    pub timeout: Duration,

    /// Timeout for establishing a connection
    pub connect_timeout: Duration,

    /// Maximum idle connections kept per host
    pub pool_max_idle_per_host: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
        }
    }
}
