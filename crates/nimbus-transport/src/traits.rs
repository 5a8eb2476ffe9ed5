//! Request/response value types and the transport trait.

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};
use url::Url;

use crate::error::Result;

/// An HTTP request about to be sent through a transport.
///
/// Bodies are held as [`Bytes`] so a request can be cloned cheaply when a
/// pipeline replays it on retry.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,

    /// Fully resolved request URL
    pub url: Url,

    /// Request headers
    pub headers: HeaderMap,

    /// Request body, if any
    pub body: Option<Bytes>,
}

impl Request {
    /// Create a request with the given method and URL.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Shorthand for a GET request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Shorthand for a POST request.
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// Add a header to the request.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body and set the content type.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `value` cannot be encoded.
    pub fn with_json<T: serde::Serialize>(mut self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = Some(Bytes::from(body));
        Ok(self)
    }
}

/// An HTTP response received from a transport.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: StatusCode,

    /// Response headers
    pub headers: HeaderMap,

    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The response body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the body is not valid UTF-8.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| crate::error::TransportError::Serialization(e.to_string()))
    }

    /// Decode the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the body is not valid JSON for `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Look up a header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A transport capable of sending one HTTP request.
///
/// Implementations perform exactly one attempt; retries, policy chains, and
/// logging are layered on top by the pipeline. Implementations must be cheap
/// to share behind an `Arc`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send the request and return the response, whatever its status.
    ///
    /// An `Err` means the exchange itself failed (connect, timeout, protocol);
    /// a non-2xx status is still an `Ok` response.
    async fn send(&self, request: Request) -> Result<Response>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        s.parse().unwrap()
    }

    #[test]
    fn request_builders_accumulate() {
        let request = Request::get(url("https://service.example.com/v1/items"))
            .with_header(
                header::AUTHORIZATION,
                HeaderValue::from_static("Bearer token123"),
            )
            .with_body(vec![1u8, 2, 3]);

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url.as_str(), "https://service.example.com/v1/items");
        assert_eq!(
            request.headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer token123"
        );
        assert_eq!(request.body.as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn request_with_json_sets_content_type() {
        let request = Request::post(url("https://service.example.com/v1/items"))
            .with_json(&serde_json::json!({"name": "widget"}))
            .unwrap();

        assert_eq!(
            request.headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert!(request.body.is_some());
    }

    #[test]
    fn response_accessors() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("abc-123"));
        let response = Response::new(
            StatusCode::OK,
            headers,
            Bytes::from_static(b"{\"ok\":true}"),
        );

        assert!(response.is_success());
        assert_eq!(response.header("x-request-id"), Some("abc-123"));
        assert_eq!(response.text().unwrap(), "{\"ok\":true}");

        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn response_json_rejects_garbage() {
        let response = Response::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::from_static(b"not json"),
        );

        assert!(response.json::<serde_json::Value>().is_err());
    }
}
