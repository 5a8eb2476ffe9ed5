//! Retry delay schedules.
//!
//! A [`Backoff`] maps an attempt number to the delay that should pass before
//! the next attempt, or `None` once the retry budget is exhausted. The two
//! provided schedules are [`ExponentialBackoff`] (growing delays with
//! jitter) and [`FixedBackoff`] (a constant delay).

use std::time::Duration;

/// A delay schedule for retrying failed operations.
///
/// `attempt` is 0-indexed and counts *failures so far*: `next_delay(0)` is
/// the wait between the initial attempt and the first retry. Implementations
/// return `None` when `attempt` has reached [`max_retries`](Self::max_retries),
/// signalling that the caller should give up.
pub trait Backoff: Send + Sync {
    /// Delay before the next retry, or `None` when the budget is spent.
    fn next_delay(&self, attempt: u32) -> Option<Duration>;

    /// Maximum number of retries after the initial attempt.
    ///
    /// A value of 3 means up to 4 attempts total.
    fn max_retries(&self) -> u32;
}

/// Exponential backoff with a delay cap and symmetric jitter.
///
/// The base delay for attempt `n` is `initial_delay * multiplier^n`, capped
/// at `max_delay`. With a jitter fraction `j`, the final delay lands
/// uniformly in `[base * (1 - j), base * (1 + j)]`, which keeps a fleet of
/// clients from retrying in lockstep.
///
/// # Examples
///
/// ```rust
/// use nimbus_core::backoff::{Backoff, ExponentialBackoff};
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::builder()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(30))
///     .multiplier(2.0)
///     .jitter(0.1)
///     .build();
///
/// let first = backoff.next_delay(0).unwrap();
/// assert!(first >= Duration::from_millis(90) && first <= Duration::from_millis(110));
/// ```
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: f64,
}

impl ExponentialBackoff {
    /// Create a builder for configuring the schedule.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }
}

impl Default for ExponentialBackoff {
    /// Defaults: 3 retries, 100 ms initial delay, 60 s cap, multiplier 2.0,
    /// 10% jitter.
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Backoff for ExponentialBackoff {
    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }

        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());

        // random(-1, +1) scaled by the jitter fraction
        let jittered = if self.jitter > 0.0 {
            capped + capped * self.jitter * (rand::random::<f64>() - 0.5) * 2.0
        } else {
            capped
        };

        Some(Duration::from_secs_f64(jittered.max(0.0)))
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Builder for [`ExponentialBackoff`].
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    max_retries: Option<u32>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    multiplier: Option<f64>,
    jitter: Option<f64>,
}

impl ExponentialBackoffBuilder {
    /// Maximum number of retries after the initial attempt. Default: 3.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Delay before the first retry. Default: 100 ms.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Upper bound on any single delay. Default: 60 s.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Growth factor applied per attempt. Default: 2.0.
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Jitter fraction in `[0.0, 1.0]`; values outside are clamped.
    /// Default: 0.1.
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter.clamp(0.0, 1.0));
        self
    }

    /// Build the schedule, filling unset knobs with defaults.
    pub fn build(self) -> ExponentialBackoff {
        ExponentialBackoff {
            max_retries: self.max_retries.unwrap_or(3),
            initial_delay: self.initial_delay.unwrap_or(Duration::from_millis(100)),
            max_delay: self.max_delay.unwrap_or(Duration::from_secs(60)),
            multiplier: self.multiplier.unwrap_or(2.0),
            jitter: self.jitter.unwrap_or(0.1),
        }
    }
}

/// A constant delay between attempts.
///
/// Useful when the caller knows the failure mode clears on its own schedule
/// (a lock release, a DNS TTL) and exponential growth would only add
/// latency.
#[derive(Debug, Clone)]
pub struct FixedBackoff {
    max_retries: u32,
    delay: Duration,
}

impl FixedBackoff {
    /// Create a schedule that waits `delay` between each of up to
    /// `max_retries` retries.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

impl Backoff for FixedBackoff {
    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.max_retries).then_some(self.delay)
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn no_jitter(max_retries: u32) -> ExponentialBackoff {
        ExponentialBackoff::builder()
            .max_retries(max_retries)
            .initial_delay(Duration::from_millis(100))
            .max_delay(Duration::from_secs(10))
            .multiplier(2.0)
            .jitter(0.0)
            .build()
    }

    #[test]
    fn exponential_growth() {
        let backoff = no_jitter(5);

        assert_eq!(backoff.next_delay(0), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_delay(1), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_delay(2), Some(Duration::from_millis(400)));
        assert_eq!(backoff.next_delay(3), Some(Duration::from_millis(800)));
    }

    #[test]
    fn budget_exhaustion_returns_none() {
        let backoff = no_jitter(2);

        assert!(backoff.next_delay(0).is_some());
        assert!(backoff.next_delay(1).is_some());
        assert_eq!(backoff.next_delay(2), None);
        assert_eq!(backoff.next_delay(100), None);
    }

    #[test]
    fn delay_capped_at_max() {
        let backoff = ExponentialBackoff::builder()
            .max_retries(100)
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(5))
            .multiplier(10.0)
            .jitter(0.0)
            .build();

        for attempt in 5..10 {
            let delay = backoff.next_delay(attempt).unwrap();
            assert!(delay <= Duration::from_secs(5), "attempt {attempt}: {delay:?}");
        }
    }

    #[test]
    fn jitter_stays_in_band_and_varies() {
        let backoff = ExponentialBackoff::builder()
            .max_retries(10)
            .initial_delay(Duration::from_secs(1))
            .multiplier(2.0)
            .jitter(0.5)
            .build();

        let delays: Vec<_> = (0..20).map(|_| backoff.next_delay(0).unwrap()).collect();

        for delay in &delays {
            let millis = delay.as_millis();
            assert!((500..=1500).contains(&millis), "got {millis}ms");
        }

        let all_same = delays.windows(2).all(|w| w[0] == w[1]);
        assert!(!all_same, "jittered delays should vary");
    }

    #[test]
    fn jitter_clamped_to_unit_interval() {
        let backoff = ExponentialBackoff::builder().jitter(2.0).build();
        assert_eq!(backoff.jitter, 1.0);

        let backoff = ExponentialBackoff::builder().jitter(-0.5).build();
        assert_eq!(backoff.jitter, 0.0);
    }

    #[test]
    fn builder_defaults() {
        let backoff = ExponentialBackoff::builder().build();

        assert_eq!(backoff.max_retries, 3);
        assert_eq!(backoff.initial_delay, Duration::from_millis(100));
        assert_eq!(backoff.max_delay, Duration::from_secs(60));
        assert_eq!(backoff.multiplier, 2.0);
        assert_eq!(backoff.jitter, 0.1);
    }

    #[test]
    fn fixed_backoff_is_constant() {
        let backoff = FixedBackoff::new(3, Duration::from_millis(250));

        assert_eq!(backoff.next_delay(0), Some(Duration::from_millis(250)));
        assert_eq!(backoff.next_delay(2), Some(Duration::from_millis(250)));
        assert_eq!(backoff.next_delay(3), None);
        assert_eq!(backoff.max_retries(), 3);
    }

    proptest! {
        #[test]
        fn delay_never_exceeds_cap_plus_jitter(
            attempt in 0u32..64,
            initial_ms in 1u64..5_000,
            max_ms in 1u64..120_000,
            multiplier in 1.0f64..8.0,
            jitter in 0.0f64..1.0,
        ) {
            let backoff = ExponentialBackoff::builder()
                .max_retries(64)
                .initial_delay(Duration::from_millis(initial_ms))
                .max_delay(Duration::from_millis(max_ms))
                .multiplier(multiplier)
                .jitter(jitter)
                .build();

            if let Some(delay) = backoff.next_delay(attempt) {
                let cap = Duration::from_millis(max_ms).as_secs_f64() * (1.0 + jitter);
                prop_assert!(delay.as_secs_f64() <= cap + f64::EPSILON);
            }
        }
    }
}
