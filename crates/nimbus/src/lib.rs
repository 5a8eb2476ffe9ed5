//! # Nimbus SDK HTTP core
//!
//! The HTTP pipeline and client-configuration layer shared by Nimbus service
//! clients:
//!
//! - A fluent configuration surface ([`HttpConfig`]) that every client
//!   builder exposes: transport, pre-built pipeline, extra policies, retry
//!   options, and log options
//! - An [`HttpPipeline`] running an ordered chain of
//!   [`HttpPipelinePolicy`] units in front of a pluggable transport, with
//!   retries and redacting request logging built in
//! - A generic [`ServiceClient`] proving the surface end to end
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nimbus::{HttpConfig, HttpLogDetailLevel, HttpLogOptions, RetryOptions, ServiceClient};
//!
//! #[tokio::main]
//! async fn main() -> nimbus::Result<()> {
//!     let client = ServiceClient::builder()
//!         .endpoint("https://service.example.com")
//!         .retry_options(RetryOptions::new().with_max_retries(5))
//!         .http_log_options(HttpLogOptions::new().with_level(HttpLogDetailLevel::Basic))
//!         .build()?;
//!
//!     let request = client.request(http::Method::GET, "/v1/items")?;
//!     let response = client.send(request).await?;
//!     println!("{}", response.status);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use client::{ServiceClient, ServiceClientBuilder};
pub use config::{HttpConfig, HttpOptions};
pub use error::{Error, Result};
pub use options::{HttpLogDetailLevel, HttpLogOptions, RetryMode, RetryOptions};
pub use pipeline::{HttpPipeline, HttpPipelineBuilder};
pub use policy::{HeadersPolicy, HttpPipelinePolicy, LoggingPolicy};

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod policy;

// Re-export the transport and backoff layers for convenience
pub use nimbus_core::backoff;
pub use nimbus_transport::{HttpClient, ReqwestClient, Request, Response, TransportError};

// Re-export key dependencies for convenience
pub use async_trait::async_trait;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use nimbus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Error, HttpClient, HttpConfig, HttpLogDetailLevel, HttpLogOptions, HttpPipeline,
        HttpPipelinePolicy, Request, Response, Result, RetryOptions, ServiceClient,
    };
}
