#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions shared across the Nimbus SDK crates.
//!
//! This crate carries the pieces that are useful to more than one Nimbus
//! crate but depend on none of them. Today that is the retry layer:
//!
//! - **[`Backoff`]** — a delay schedule for retrying failed operations
//! - **[`ExponentialBackoff`]** — exponentially growing delays with jitter
//! - **[`FixedBackoff`]** — a constant delay between attempts
//!
//! The schedule is deliberately decoupled from the retry *loop*: callers own
//! the loop because only they can decide what a failure is (a transport
//! error, an HTTP status, a parse failure). A `Backoff` only answers "how
//! long until the next try, if any".
//!
//! # Examples
//!
//! ```rust
//! use nimbus_core::backoff::{Backoff, ExponentialBackoff};
//! use std::time::Duration;
//!
//! let backoff = ExponentialBackoff::builder()
//!     .max_retries(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .build();
//!
//! assert!(backoff.next_delay(0).is_some());
//! assert!(backoff.next_delay(3).is_none()); // budget spent
//! ```

pub mod backoff;

/// Convenient re-exports of commonly used items.
pub mod prelude {
    pub use crate::backoff::{Backoff, ExponentialBackoff, ExponentialBackoffBuilder, FixedBackoff};
}
