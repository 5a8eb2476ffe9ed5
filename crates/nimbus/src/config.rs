//! The shared HTTP configuration surface for client builders.
//!
//! Every Nimbus client builder exposes the same five HTTP knobs: transport,
//! pre-built pipeline, extra policies, retry options, and log options. The
//! [`HttpConfig`] trait provides those knobs as default methods over a single
//! required accessor, and the [`HttpOptions`] holder carries the state, so
//! otherwise unrelated builders share the surface by embedding one field.

use std::fmt;
use std::sync::Arc;

use nimbus_transport::HttpClient;

use crate::error::Result;
use crate::options::{HttpLogOptions, RetryOptions};
use crate::pipeline::HttpPipeline;
use crate::policy::HttpPipelinePolicy;

/// Holder for HTTP pipeline configuration, embedded by client builders.
///
/// Assembly and the precedence rule live here so every builder behaves
/// identically: an explicit pipeline supersedes the individually configured
/// transport, policies, retry options, and log options.
#[derive(Clone, Default)]
pub struct HttpOptions {
    pub(crate) transport: Option<Arc<dyn HttpClient>>,
    pub(crate) pipeline: Option<HttpPipeline>,
    pub(crate) policies: Vec<Arc<dyn HttpPipelinePolicy>>,
    pub(crate) retry: Option<RetryOptions>,
    pub(crate) logging: Option<HttpLogOptions>,
}

impl HttpOptions {
    /// The explicitly set transport, if any.
    pub fn transport(&self) -> Option<&Arc<dyn HttpClient>> {
        self.transport.as_ref()
    }

    /// The explicitly set pipeline, if any.
    pub fn pipeline(&self) -> Option<&HttpPipeline> {
        self.pipeline.as_ref()
    }

    /// The policies added so far, in addition order.
    pub fn policies(&self) -> &[Arc<dyn HttpPipelinePolicy>] {
        &self.policies
    }

    /// The configured retry options, if any.
    pub fn retry_options(&self) -> Option<&RetryOptions> {
        self.retry.as_ref()
    }

    /// The configured log options, if any. `None` means the effective log
    /// detail level is [`HttpLogDetailLevel::None`](crate::HttpLogDetailLevel::None).
    pub fn log_options(&self) -> Option<&HttpLogOptions> {
        self.logging.as_ref()
    }

    /// Whether any setting other than the pipeline itself was customized.
    fn has_individual_settings(&self) -> bool {
        self.transport.is_some()
            || !self.policies.is_empty()
            || self.retry.is_some()
            || self.logging.is_some()
    }

    /// Resolve these options into a pipeline.
    ///
    /// An explicitly set pipeline is returned as-is and supersedes every
    /// other setting; a warning is logged when superseded settings were also
    /// customized. Otherwise a pipeline is assembled from the individual
    /// settings, falling back to defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error if no transport was configured and the default
    /// transport cannot be constructed.
    pub fn build_pipeline(&self) -> Result<HttpPipeline> {
        if let Some(pipeline) = &self.pipeline {
            if self.has_individual_settings() {
                tracing::warn!(
                    "an explicit pipeline is configured; individually set transport, \
                     policies, retry options, and log options are ignored"
                );
            }
            return Ok(pipeline.clone());
        }

        let mut builder = HttpPipeline::builder()
            .retry_options(self.retry.clone().unwrap_or_default())
            .http_log_options(self.logging.clone().unwrap_or_default());

        for policy in &self.policies {
            builder = builder.add_policy(policy.clone());
        }

        if let Some(transport) = &self.transport {
            builder = builder.transport(transport.clone());
        }

        builder.build()
    }
}

impl fmt::Debug for HttpOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpOptions")
            .field("transport", &self.transport.is_some())
            .field("pipeline", &self.pipeline.is_some())
            .field("policies", &self.policies.len())
            .field("retry", &self.retry)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Fluent HTTP configuration, shared by every Nimbus client builder.
///
/// Implementing the trait takes one line: expose the embedded
/// [`HttpOptions`] via [`http_options_mut`](Self::http_options_mut) and the
/// five setters come for free. Each setter consumes and returns the concrete
/// builder, so chains keep their type:
///
/// ```rust
/// use nimbus::{HttpConfig, HttpOptions, RetryOptions};
///
/// #[derive(Default)]
/// struct WidgetClientBuilder {
///     http: HttpOptions,
/// }
///
/// impl HttpConfig for WidgetClientBuilder {
///     fn http_options_mut(&mut self) -> &mut HttpOptions {
///         &mut self.http
///     }
/// }
///
/// let builder = WidgetClientBuilder::default()
///     .retry_options(RetryOptions::new().with_max_retries(5));
/// ```
///
/// Note that [`pipeline`](Self::pipeline) supersedes the other four
/// settings; see [`HttpOptions::build_pipeline`].
pub trait HttpConfig: Sized {
    /// Access the embedded HTTP options holder.
    fn http_options_mut(&mut self) -> &mut HttpOptions;

    /// Set the transport used for sending and receiving requests.
    fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_options_mut().transport = Some(client);
        self
    }

    /// Set a fully assembled pipeline, superseding the individually
    /// configured transport, policies, retry options, and log options.
    fn pipeline(mut self, pipeline: HttpPipeline) -> Self {
        self.http_options_mut().pipeline = Some(pipeline);
        self
    }

    /// Append a policy applied to each request. Policies execute in the
    /// order they were added.
    fn add_policy(mut self, policy: Arc<dyn HttpPipelinePolicy>) -> Self {
        self.http_options_mut().policies.push(policy);
        self
    }

    /// Set the retry configuration used when the builder assembles its own
    /// pipeline.
    fn retry_options(mut self, options: RetryOptions) -> Self {
        self.http_options_mut().retry = Some(options);
        self
    }

    /// Set the logging configuration. When never called, the effective log
    /// detail level is [`HttpLogDetailLevel::None`](crate::HttpLogDetailLevel::None).
    fn http_log_options(mut self, options: HttpLogOptions) -> Self {
        self.http_options_mut().logging = Some(options);
        self
    }
}
