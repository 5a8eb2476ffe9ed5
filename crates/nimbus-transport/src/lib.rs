#![deny(unsafe_code)]
#![warn(missing_docs)]

//! HTTP transport abstraction for the Nimbus SDK.
//!
//! This crate defines the boundary between the SDK and the wire:
//!
//! - **[`Request`] / [`Response`]**: plain value types carrying method, URL,
//!   headers, and body bytes
//! - **[`HttpClient`]**: the trait a transport implements to send one
//!   request and produce one response
//! - **[`ReqwestClient`]**: the default transport, backed by `reqwest`
//! - **[`TransportError`]**: unified error type with a retryability
//!   classification
//!
//! Everything above the transport (policy chains, retries, logging) lives in
//! the `nimbus` crate; a transport does exactly one attempt and reports what
//! happened.
//!
//! # Usage
//!
//! ```ignore
//! use nimbus_transport::{HttpClient, ReqwestClient, Request};
//!
//! let transport = ReqwestClient::new()?;
//! let request = Request::get("https://service.example.com/v1/items".parse()?);
//! let response = transport.send(request).await?;
//! ```

pub mod client;
pub mod error;
pub mod traits;

// Re-export commonly used types
pub use client::{ReqwestClient, TransportConfig};
pub use error::{Result, TransportError};
pub use traits::{HttpClient, Request, Response};
