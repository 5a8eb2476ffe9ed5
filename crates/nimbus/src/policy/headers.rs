//! Policy that applies default headers to every request.

use async_trait::async_trait;
use http::HeaderMap;
use nimbus_transport::Request;

use super::HttpPipelinePolicy;
use crate::error::Result;

/// Adds a fixed set of headers to each outgoing request.
///
/// Headers already present on the request win; this policy never overwrites
/// a value the caller set explicitly.
#[derive(Debug, Clone)]
pub struct HeadersPolicy {
    headers: HeaderMap,
}

impl HeadersPolicy {
    /// Create a policy applying `headers` to every request.
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }
}

#[async_trait]
impl HttpPipelinePolicy for HeadersPolicy {
    async fn on_request(&self, mut request: Request) -> Result<Request> {
        for (name, value) in &self.headers {
            if !request.headers.contains_key(name) {
                request.headers.insert(name.clone(), value.clone());
            }
        }
        Ok(request)
    }
}
