//! Exponential backoff for fallible operations.

use std::fmt::Display;
use std::time::Duration;

/// Configuration for request retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts including the first one; `0` is treated as `1`.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Create a config that makes a single attempt.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Set the total number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay before the first retry.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Set the delay cap.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay after the given failed attempt (0-indexed): `initial × multiplier^attempt`, capped.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        if !delay_ms.is_finite() || delay_ms >= self.max_delay.as_millis() as f64 {
            return self.max_delay;
        }
        Duration::from_millis(delay_ms.max(0.0) as u64)
    }

    const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

/// Runs `operation` until it succeeds, `should_retry` rejects the error, or
/// attempts run out.
///
/// The closure receives the 0-indexed attempt number. Between attempts the
/// thread sleeps for [`RetryConfig::delay_for_attempt`]. After the last
/// attempt the last error is returned. To retry on an unwanted success value,
/// return an error for it from the closure.
///
/// # Errors
/// The error of the final attempt, or the first non-retryable one.
///
/// ```rust
/// use std::time::Duration;
/// use promptkit_openai::{RetryConfig, retry_with_backoff};
///
/// let config = RetryConfig::default().with_initial_delay(Duration::ZERO);
/// let result: Result<u32, String> = retry_with_backoff(
///     &config,
///     |attempt| if attempt < 2 { Err(format!("flaky {attempt}")) } else { Ok(attempt) },
///     |_| true,
/// );
/// assert_eq!(result, Ok(2));
/// ```
pub fn retry_with_backoff<T, E, F, P>(
    config: &RetryConfig,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = config.attempts();
    let mut attempt = 0;
    loop {
        match operation(attempt) {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !should_retry(&err) {
                    tracing::debug!(attempt = attempt + 1, error = %err, "Error is not retryable");
                    return Err(err);
                }
                if attempt + 1 >= max_attempts {
                    tracing::error!(attempts = max_attempts, error = %err, "All retry attempts failed");
                    return Err(err);
                }
                let delay = config.delay_for_attempt(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = delay.as_millis(),
                    error = %err,
                    "Request failed, retrying"
                );
                std::thread::sleep(delay);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> RetryConfig {
        RetryConfig::default().with_initial_delay(Duration::ZERO)
    }

    #[test]
    fn delays_grow_exponentially_and_cap() {
        let config = RetryConfig::default().with_max_delay(Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(200), Duration::from_secs(5));
    }

    #[test]
    fn succeeds_on_first_try_without_retrying() {
        let mut calls = 0;
        let result: Result<&str, String> = retry_with_backoff(
            &instant(),
            |_| {
                calls += 1;
                Ok("done")
            },
            |_| true,
        );
        assert_eq!(result, Ok("done"));
        assert_eq!(calls, 1);
    }

    #[test]
    fn returns_last_error_after_exhaustion() {
        let mut calls = 0;
        let result: Result<(), String> = retry_with_backoff(
            &instant(),
            |attempt| {
                calls += 1;
                Err(format!("failure {attempt}"))
            },
            |_| true,
        );
        assert_eq!(result, Err("failure 2".to_string()));
        assert_eq!(calls, 3);
    }

    #[test]
    fn stops_on_non_retryable_error() {
        let mut calls = 0;
        let result: Result<(), String> = retry_with_backoff(
            &instant(),
            |_| {
                calls += 1;
                Err("fatal".to_string())
            },
            |err| err != "fatal",
        );
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let mut calls = 0;
        let _: Result<(), &str> = retry_with_backoff(
            &instant().with_max_attempts(0),
            |_| {
                calls += 1;
                Err("nope")
            },
            |_| true,
        );
        assert_eq!(calls, 1);
    }

    #[test]
    fn unwanted_results_can_be_retried() {
        let replies = ["error: busy", "error: busy", "fine"];
        let result: Result<&str, String> = retry_with_backoff(
            &instant(),
            |attempt| {
                let reply = replies[attempt as usize];
                if reply.to_lowercase().contains("error") {
                    Err(reply.to_string())
                } else {
                    Ok(reply)
                }
            },
            |_| true,
        );
        assert_eq!(result, Ok("fine"));
    }
}
