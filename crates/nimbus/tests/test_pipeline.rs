//! End-to-end pipeline behavior against a local mock server.

use std::sync::Arc;
use std::time::Duration;

use http::{HeaderName, HeaderValue};
use nimbus::{
    HttpConfig, HttpPipeline, HttpPipelinePolicy, Request, RetryOptions, ServiceClient,
    async_trait,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Appends its tag to the `x-tag` request header, so registration order is
/// observable on the wire.
struct StampPolicy {
    tag: &'static str,
}

#[async_trait]
impl HttpPipelinePolicy for StampPolicy {
    async fn on_request(&self, mut request: Request) -> nimbus::Result<Request> {
        let stamped = format!(
            "{}{}",
            request
                .headers
                .get("x-tag")
                .and_then(|v| v.to_str().ok())
                .unwrap_or(""),
            self.tag
        );
        request.headers.insert(
            HeaderName::from_static("x-tag"),
            HeaderValue::from_str(&stamped).unwrap(),
        );
        Ok(request)
    }
}

fn fast_retries(max_retries: u32) -> RetryOptions {
    RetryOptions::new()
        .fixed()
        .with_max_retries(max_retries)
        .with_initial_delay(Duration::ZERO)
}

async fn client_for(server: &MockServer) -> ServiceClient {
    ServiceClient::builder()
        .endpoint(server.uri())
        .retry_options(fast_retries(3))
        .build()
        .unwrap()
}

#[tokio::test]
async fn policies_execute_in_registration_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .and(header("x-tag", "ab"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = ServiceClient::builder()
        .endpoint(server.uri())
        .add_policy(Arc::new(StampPolicy { tag: "a" }))
        .add_policy(Arc::new(StampPolicy { tag: "b" }))
        .build()
        .unwrap();

    let request = client.request(http::Method::GET, "/v1/items").unwrap();
    let response = client.send(request).await.unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn retryable_status_is_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = client.request(http::Method::GET, "/v1/items").unwrap();
    let response = client.send(request).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.text().unwrap(), "ok");
}

#[tokio::test]
async fn retry_after_header_is_honored() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = client.request(http::Method::GET, "/v1/items").unwrap();
    let response = client.send(request).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
}

#[tokio::test]
async fn non_retryable_status_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = client.request(http::Method::GET, "/v1/items").unwrap();
    let response = client.send(request).await.unwrap();

    // The 400 comes back as a response, after exactly one attempt.
    assert_eq!(response.status.as_u16(), 400);
}

#[tokio::test]
async fn default_headers_are_sent_with_every_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .and(header("x-client-name", "nimbus-test"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let client = ServiceClient::builder()
        .endpoint(server.uri())
        .default_header("x-client-name", "nimbus-test")
        .unwrap()
        .build()
        .unwrap();

    for _ in 0..2 {
        let request = client.request(http::Method::GET, "/v1/items").unwrap();
        let response = client.send(request).await.unwrap();
        assert!(response.is_success());
    }
}

#[tokio::test]
async fn explicit_pipeline_supersedes_added_policies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let explicit = HttpPipeline::builder().build().unwrap();

    let client = ServiceClient::builder()
        .endpoint(server.uri())
        .pipeline(explicit)
        .add_policy(Arc::new(StampPolicy { tag: "ignored" }))
        .build()
        .unwrap();

    let request = client.request(http::Method::GET, "/v1/items").unwrap();
    client.send(request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(
        !requests[0].headers.contains_key("x-tag"),
        "the added policy must not run when an explicit pipeline is set"
    );
}
