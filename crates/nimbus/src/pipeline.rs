//! The HTTP pipeline: an ordered policy chain in front of a transport.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use nimbus_core::backoff::Backoff;
use nimbus_transport::{HttpClient, ReqwestClient, Request, Response};

use crate::error::Result;
use crate::options::{HttpLogOptions, RetryOptions};
use crate::policy::{HttpPipelinePolicy, LoggingPolicy};

/// An assembled request-processing chain.
///
/// One attempt runs every policy's `on_request` hook in the order the
/// policies were added, sends the request through the transport, then runs
/// every `on_response` hook in reverse order. [`send`](Self::send) wraps
/// attempts in a retry loop: transient transport errors and retryable
/// statuses (408, 429, 500, 502, 503, 504) are retried per the configured
/// [`RetryOptions`], and a `Retry-After` header (seconds form) overrides the
/// computed delay.
///
/// Pipelines are cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct HttpPipeline {
    inner: Arc<Inner>,
}

struct Inner {
    policies: Vec<Arc<dyn HttpPipelinePolicy>>,
    transport: Arc<dyn HttpClient>,
    backoff: Box<dyn Backoff>,
}

impl HttpPipeline {
    /// Create a builder for assembling a pipeline.
    pub fn builder() -> HttpPipelineBuilder {
        HttpPipelineBuilder::default()
    }

    /// The policies in execution order.
    pub fn policies(&self) -> &[Arc<dyn HttpPipelinePolicy>] {
        &self.inner.policies
    }

    /// Send a request through the pipeline, retrying as configured.
    ///
    /// A response is returned whatever its final status; exhausting the
    /// retry budget on a retryable status yields that last response, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if a policy fails or the transport fails with a
    /// non-retryable error (or a retryable one after the budget is spent).
    pub async fn send(&self, request: Request) -> Result<Response> {
        let backoff = &self.inner.backoff;
        let mut attempt = 0u32;

        loop {
            match self.send_once(request.clone()).await {
                Ok(response) if !is_retryable_status(response.status) => return Ok(response),
                Ok(response) => {
                    let Some(delay) = backoff.next_delay(attempt) else {
                        return Ok(response);
                    };
                    let delay = retry_after(&response).unwrap_or(delay);
                    tracing::debug!(
                        status = %response.status,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    let Some(delay) = backoff.next_delay(attempt) else {
                        return Err(err);
                    };
                    tracing::debug!(error = %err, attempt, "retrying request");
                    tokio::time::sleep(delay).await;
                }
            }
            attempt += 1;
        }
    }

    async fn send_once(&self, mut request: Request) -> Result<Response> {
        for policy in &self.inner.policies {
            request = policy.on_request(request).await?;
        }

        let mut response = self.inner.transport.send(request).await?;

        for policy in self.inner.policies.iter().rev() {
            response = policy.on_response(response).await?;
        }

        Ok(response)
    }
}

impl fmt::Debug for HttpPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPipeline")
            .field("policies", &self.inner.policies.len())
            .field("max_retries", &self.inner.backoff.max_retries())
            .finish()
    }
}

/// Builder for [`HttpPipeline`].
#[derive(Default)]
pub struct HttpPipelineBuilder {
    transport: Option<Arc<dyn HttpClient>>,
    policies: Vec<Arc<dyn HttpPipelinePolicy>>,
    retry: Option<RetryOptions>,
    logging: Option<HttpLogOptions>,
}

impl HttpPipelineBuilder {
    /// Set the transport; defaults to [`ReqwestClient`].
    pub fn transport(mut self, transport: Arc<dyn HttpClient>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Append a policy. Order of addition is execution order.
    pub fn add_policy(mut self, policy: Arc<dyn HttpPipelinePolicy>) -> Self {
        self.policies.push(policy);
        self
    }

    /// Set the retry configuration.
    pub fn retry_options(mut self, options: RetryOptions) -> Self {
        self.retry = Some(options);
        self
    }

    /// Set the logging configuration.
    pub fn http_log_options(mut self, options: HttpLogOptions) -> Self {
        self.logging = Some(options);
        self
    }

    /// Assemble the pipeline.
    ///
    /// The logging policy is installed last so it observes the request
    /// exactly as the transport will see it.
    ///
    /// # Errors
    ///
    /// Returns an error if no transport was set and the default transport
    /// cannot be constructed.
    pub fn build(self) -> Result<HttpPipeline> {
        let transport: Arc<dyn HttpClient> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestClient::new()?),
        };

        let mut policies = self.policies;
        policies.push(Arc::new(LoggingPolicy::new(self.logging.unwrap_or_default())));

        let backoff = self.retry.unwrap_or_default().backoff();

        Ok(HttpPipeline {
            inner: Arc::new(Inner {
                policies,
                transport,
                backoff,
            }),
        })
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500 | 502 | 503 | 504)
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .header("retry-after")
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
