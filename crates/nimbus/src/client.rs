//! A generic service client built on the HTTP pipeline.

use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use nimbus_transport::{Request, Response};
use url::Url;

use crate::config::{HttpConfig, HttpOptions};
use crate::error::{Error, Result};
use crate::pipeline::HttpPipeline;
use crate::policy::HeadersPolicy;

/// Client for a Nimbus service endpoint.
///
/// Cheap to clone; all clones share the endpoint and pipeline.
///
/// # Example
///
/// ```rust,no_run
/// use nimbus::ServiceClient;
///
/// # fn main() -> nimbus::Result<()> {
/// let client = ServiceClient::builder()
///     .endpoint("https://service.example.com")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ServiceClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    endpoint: Url,
    pipeline: HttpPipeline,
}

impl ServiceClient {
    /// Create a builder for configuring a client.
    pub fn builder() -> ServiceClientBuilder {
        ServiceClientBuilder::default()
    }

    /// The service endpoint, normalized with a trailing slash.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// The pipeline requests are sent through.
    pub fn pipeline(&self) -> &HttpPipeline {
        &self.inner.pipeline
    }

    /// Create a request for a path relative to the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be joined onto the endpoint.
    pub fn request(&self, method: Method, path: &str) -> Result<Request> {
        let url = self
            .inner
            .endpoint
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))?;
        Ok(Request::new(method, url))
    }

    /// Send a request through the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if a policy or the transport fails; non-2xx statuses
    /// are returned as responses, not errors.
    pub async fn send(&self, request: Request) -> Result<Response> {
        self.inner.pipeline.send(request).await
    }
}

/// Builder for [`ServiceClient`].
///
/// Implements [`HttpConfig`], so the full fluent HTTP surface is available
/// alongside the client-specific settings:
///
/// ```rust,no_run
/// use nimbus::{HttpConfig, RetryOptions, ServiceClient};
///
/// # fn main() -> nimbus::Result<()> {
/// let client = ServiceClient::builder()
///     .endpoint("https://service.example.com")
///     .retry_options(RetryOptions::new().with_max_retries(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ServiceClientBuilder {
    endpoint: Option<String>,
    default_headers: HeaderMap,
    http: HttpOptions,
}

impl HttpConfig for ServiceClientBuilder {
    fn http_options_mut(&mut self) -> &mut HttpOptions {
        &mut self.http
    }
}

impl ServiceClientBuilder {
    /// Set the service endpoint URL. Required.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Add a header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to
    /// HTTP specifications.
    pub fn default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let name_str = name.into();
        let value_str = value.into();

        let name: HeaderName = name_str
            .parse()
            .map_err(|_| Error::InvalidHeaderName(name_str.clone()))?;
        let value: HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Build the client.
    ///
    /// Default headers, if any, become a [`HeadersPolicy`] running before
    /// the policies added via [`HttpConfig::add_policy`]. When an explicit
    /// pipeline was set it supersedes all of that; see
    /// [`HttpOptions::build_pipeline`].
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is missing or invalid, or if the
    /// default transport cannot be constructed.
    pub fn build(mut self) -> Result<ServiceClient> {
        let endpoint = validate_endpoint(self.endpoint.as_deref())?;

        if !self.default_headers.is_empty() {
            let policy = Arc::new(HeadersPolicy::new(std::mem::take(
                &mut self.default_headers,
            )));
            self.http.policies.insert(0, policy);
        }

        let pipeline = self.http.build_pipeline()?;

        Ok(ServiceClient {
            inner: Arc::new(ClientInner { endpoint, pipeline }),
        })
    }
}

fn validate_endpoint(endpoint: Option<&str>) -> Result<Url> {
    let raw = endpoint.ok_or_else(|| Error::InvalidUrl("endpoint is not set".into()))?;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("endpoint URL is empty".into()));
    }

    let url: Url = trimmed
        .parse()
        .map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!(
            "unsupported scheme '{}' in {trimmed}: expected http or https",
            url.scheme()
        )));
    }

    // Normalize with a trailing slash so relative paths join predictably.
    if url.path().ends_with('/') {
        Ok(url)
    } else {
        let normalized = format!("{trimmed}/");
        normalized
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("{normalized}: {e}")))
    }
}
