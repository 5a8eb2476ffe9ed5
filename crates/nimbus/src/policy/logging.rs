//! Policy that logs request/response exchanges via `tracing`.

use async_trait::async_trait;
use http::HeaderMap;
use nimbus_transport::{Request, Response};
use url::Url;

use super::HttpPipelinePolicy;
use crate::error::Result;
use crate::options::{HttpLogDetailLevel, HttpLogOptions};

/// Upper bound on logged body bytes; longer bodies are truncated.
const MAX_BODY_LOG_BYTES: usize = 4096;

/// Emits `tracing` events for each exchange, honoring the configured
/// [`HttpLogDetailLevel`] and redacting header values and query parameters
/// that are not allow-listed.
///
/// At level [`HttpLogDetailLevel::None`] (the default) the policy is a
/// no-op, so installing it unconditionally costs nothing.
pub struct LoggingPolicy {
    options: HttpLogOptions,
}

impl LoggingPolicy {
    /// Create a logging policy from the given options.
    pub fn new(options: HttpLogOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl HttpPipelinePolicy for LoggingPolicy {
    async fn on_request(&self, request: Request) -> Result<Request> {
        let level = self.options.level();
        if level == HttpLogDetailLevel::None {
            return Ok(request);
        }

        tracing::debug!(
            method = %request.method,
            url = %redacted_url(&request.url, &self.options),
            "http request"
        );

        if level >= HttpLogDetailLevel::Headers {
            tracing::debug!(
                headers = %redacted_headers(&request.headers, &self.options),
                "http request headers"
            );
        }

        if level >= HttpLogDetailLevel::Body {
            if let Some(body) = &request.body {
                tracing::debug!(body = %truncated_text(body), "http request body");
            }
        }

        Ok(request)
    }

    async fn on_response(&self, response: Response) -> Result<Response> {
        let level = self.options.level();
        if level == HttpLogDetailLevel::None {
            return Ok(response);
        }

        tracing::debug!(status = %response.status, "http response");

        if level >= HttpLogDetailLevel::Headers {
            tracing::debug!(
                headers = %redacted_headers(&response.headers, &self.options),
                "http response headers"
            );
        }

        if level >= HttpLogDetailLevel::Body && !response.body.is_empty() {
            tracing::debug!(body = %truncated_text(&response.body), "http response body");
        }

        Ok(response)
    }
}

fn redacted_url(url: &Url, options: &HttpLogOptions) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut redacted = url.clone();
    {
        let mut serializer = redacted.query_pairs_mut();
        serializer.clear();
        for (name, value) in &pairs {
            if options.is_query_param_allowed(name) {
                serializer.append_pair(name, value);
            } else {
                serializer.append_pair(name, "REDACTED");
            }
        }
    }
    redacted.to_string()
}

fn redacted_headers(headers: &HeaderMap, options: &HttpLogOptions) -> String {
    let mut out = String::new();
    for (name, value) in headers {
        if !out.is_empty() {
            out.push_str("; ");
        }
        out.push_str(name.as_str());
        out.push(':');
        if options.is_header_allowed(name) {
            out.push_str(value.to_str().unwrap_or("<non-ascii>"));
        } else {
            out.push_str("REDACTED");
        }
    }
    out
}

fn truncated_text(body: &[u8]) -> String {
    let end = body.len().min(MAX_BODY_LOG_BYTES);
    String::from_utf8_lossy(&body[..end]).into_owned()
}
