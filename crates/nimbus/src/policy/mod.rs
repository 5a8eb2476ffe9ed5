//! Pipeline policies: per-request/response processing units.

use async_trait::async_trait;
use nimbus_transport::{Request, Response};

use crate::error::Result;

mod headers;
mod logging;

pub use headers::HeadersPolicy;
pub use logging::LoggingPolicy;

/// One unit of cross-cutting request/response processing.
///
/// A pipeline holds policies in the order they were added and, for each
/// attempt, runs every `on_request` hook in that order, sends the request
/// through the transport, then runs every `on_response` hook in reverse
/// order. Both hooks default to passing the value through untouched, so a
/// policy only overrides the side it cares about.
///
/// Policies are shared across clones of a pipeline and across concurrent
/// requests, hence `Send + Sync` and `&self` receivers.
#[async_trait]
pub trait HttpPipelinePolicy: Send + Sync {
    /// Process a request before it is sent.
    async fn on_request(&self, request: Request) -> Result<Request> {
        Ok(request)
    }

    /// Process a response after it is received.
    async fn on_response(&self, response: Response) -> Result<Response> {
        Ok(response)
    }
}
