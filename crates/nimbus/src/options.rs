//! Configuration value objects for the HTTP pipeline.

use std::collections::HashSet;
use std::time::Duration;

use http::{HeaderName, header};
use nimbus_core::backoff::{Backoff, ExponentialBackoff, FixedBackoff};

/// Which delay schedule a [`RetryOptions`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryMode {
    /// Exponentially growing delays with jitter.
    #[default]
    Exponential,

    /// A constant delay between attempts.
    Fixed,
}

/// Retry configuration for requests made through a pipeline.
///
/// Defaults are tuned for network calls: 3 retries, 500 ms initial delay,
/// 60 s cap, doubling, 10% jitter. In `Fixed` mode only `max_retries` and
/// `initial_delay` apply.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOptions {
    /// Delay schedule selection
    pub mode: RetryMode,

    /// Maximum retries after the initial attempt
    pub max_retries: u32,

    /// First delay (exponential) or the constant delay (fixed)
    pub initial_delay: Duration,

    /// Upper bound on any single delay
    pub max_delay: Duration,

    /// Per-attempt growth factor (exponential mode)
    pub multiplier: f64,

    /// Jitter fraction in `[0.0, 1.0]` (exponential mode)
    pub jitter: f64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            mode: RetryMode::Exponential,
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

impl RetryOptions {
    /// Start from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed delay schedule instead of exponential growth.
    pub fn fixed(mut self) -> Self {
        self.mode = RetryMode::Fixed;
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial (or, in fixed mode, the constant) delay.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the upper bound on any single delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the exponential growth factor.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the jitter fraction.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Materialize the configured delay schedule.
    pub fn backoff(&self) -> Box<dyn Backoff> {
        match self.mode {
            RetryMode::Exponential => Box::new(
                ExponentialBackoff::builder()
                    .max_retries(self.max_retries)
                    .initial_delay(self.initial_delay)
                    .max_delay(self.max_delay)
                    .multiplier(self.multiplier)
                    .jitter(self.jitter)
                    .build(),
            ),
            RetryMode::Fixed => Box::new(FixedBackoff::new(self.max_retries, self.initial_delay)),
        }
    }
}

/// How much of each request/response exchange is logged.
///
/// Levels are ordered: a level logs everything the levels below it log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum HttpLogDetailLevel {
    /// Log nothing. This is the default when logging is never configured.
    #[default]
    None,

    /// Method, redacted URL, status, and timing.
    Basic,

    /// `Basic` plus redacted request and response headers.
    Headers,

    /// `Headers` plus request and response bodies.
    Body,
}

/// Logging configuration for requests made through a pipeline.
///
/// Header values and query parameters are redacted unless their names appear
/// in the allow-lists; a conservative set of standard headers is allowed by
/// default.
#[derive(Debug, Clone)]
pub struct HttpLogOptions {
    level: HttpLogDetailLevel,
    allowed_header_names: HashSet<HeaderName>,
    allowed_query_params: HashSet<String>,
}

/// Headers whose values are safe to log without redaction.
fn default_allowed_headers() -> HashSet<HeaderName> {
    [
        header::ACCEPT,
        header::CACHE_CONTROL,
        header::CONNECTION,
        header::CONTENT_LENGTH,
        header::CONTENT_TYPE,
        header::DATE,
        header::ETAG,
        header::EXPIRES,
        header::LAST_MODIFIED,
        header::PRAGMA,
        header::RETRY_AFTER,
        header::SERVER,
        header::TRANSFER_ENCODING,
        header::USER_AGENT,
    ]
    .into_iter()
    .collect()
}

impl Default for HttpLogOptions {
    fn default() -> Self {
        Self {
            level: HttpLogDetailLevel::None,
            allowed_header_names: default_allowed_headers(),
            allowed_query_params: HashSet::new(),
        }
    }
}

impl HttpLogOptions {
    /// Start from the defaults (level [`HttpLogDetailLevel::None`]).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log detail level.
    pub fn with_level(mut self, level: HttpLogDetailLevel) -> Self {
        self.level = level;
        self
    }

    /// Allow one more header to be logged unredacted.
    pub fn allow_header(mut self, name: HeaderName) -> Self {
        self.allowed_header_names.insert(name);
        self
    }

    /// Allow one more query parameter to be logged unredacted.
    pub fn allow_query_param(mut self, name: impl Into<String>) -> Self {
        self.allowed_query_params.insert(name.into().to_lowercase());
        self
    }

    /// The configured detail level.
    pub fn level(&self) -> HttpLogDetailLevel {
        self.level
    }

    /// Whether `name`'s value may appear in logs.
    pub fn is_header_allowed(&self, name: &HeaderName) -> bool {
        self.allowed_header_names.contains(name)
    }

    /// Whether the query parameter `name`'s value may appear in logs.
    pub fn is_query_param_allowed(&self, name: &str) -> bool {
        self.allowed_query_params.contains(&name.to_lowercase())
    }
}
