//! Uniform failure handling for backend calls.
//!
//! An [`ErrorPolicy`] decides what a caller sees when a request fails. With
//! `fail_fast` set, the underlying [`RouteError`] is returned unmodified.
//! Without it, the failure is logged and replaced by a fallback value, which
//! for [`crate::RouteClient::distance`] is [`crate::RouteOutcome::NoRoute`].
//! In that mode a failed request and a genuine "no path" answer look the same
//! to the caller.
//!
//! Transient transport failures are retried up to `max_attempts` times before
//! the policy decides.

use std::num::NonZeroU32;

use log::warn;

use crate::client::RouteError;

/// Default number of attempts per call.
pub const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(5) {
    Some(attempts) => attempts,
    None => NonZeroU32::MIN,
};

/// How failures inside a backend call reach the caller.
///
/// # Examples
///
/// ```
/// use route_distances_core::{ErrorPolicy, RouteError};
///
/// let lenient = ErrorPolicy::lenient();
/// let value = lenient.execute(
///     || Err::<u32, _>(RouteError::ParseError { message: "bad".into() }),
///     || 0,
/// );
/// assert_eq!(value, Ok(0));
///
/// let strict = ErrorPolicy::fail_fast();
/// let value = strict.execute(
///     || Err::<u32, _>(RouteError::ParseError { message: "bad".into() }),
///     || 0,
/// );
/// assert!(value.is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    fail_fast: bool,
    max_attempts: NonZeroU32,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::fail_fast()
    }
}

impl ErrorPolicy {
    /// Build a policy from its two settings.
    #[must_use]
    pub const fn new(fail_fast: bool, max_attempts: NonZeroU32) -> Self {
        Self {
            fail_fast,
            max_attempts,
        }
    }

    /// Propagate failures to the caller.
    #[must_use]
    pub const fn fail_fast() -> Self {
        Self::new(true, DEFAULT_MAX_ATTEMPTS)
    }

    /// Replace failures with the fallback value.
    #[must_use]
    pub const fn lenient() -> Self {
        Self::new(false, DEFAULT_MAX_ATTEMPTS)
    }

    /// Change the number of attempts made for transient failures.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: NonZeroU32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Whether failures are propagated.
    #[must_use]
    pub const fn is_fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Upper bound on attempts per call.
    #[must_use]
    pub const fn max_attempts(&self) -> NonZeroU32 {
        self.max_attempts
    }

    /// Run `attempt`, retrying transient failures, then apply the policy.
    ///
    /// # Errors
    ///
    /// Under `fail_fast`, returns the error from the last attempt. Otherwise
    /// never fails.
    pub fn execute<T>(
        &self,
        mut attempt: impl FnMut() -> Result<T, RouteError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, RouteError> {
        let mut tries = 1;
        let outcome = loop {
            match attempt() {
                Err(err) if err.is_transient() && tries < self.max_attempts.get() => {
                    warn!("{err}; retrying (attempt {})", tries + 1);
                    tries += 1;
                }
                other => break other,
            }
        };
        self.resolve(outcome, fallback)
    }

    /// Apply the policy to a finished call without retrying.
    ///
    /// # Errors
    ///
    /// Under `fail_fast`, returns `result` unchanged when it is an error.
    pub fn resolve<T>(
        &self,
        result: Result<T, RouteError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, RouteError> {
        match result {
            Ok(value) => Ok(value),
            Err(err) if self.fail_fast => Err(err),
            Err(err) => {
                warn!("routing request failed, treating as no route: {err}");
                Ok(fallback())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    fn network_error() -> RouteError {
        RouteError::NetworkError {
            url: "http://localhost:8000".into(),
            message: "connection refused".into(),
        }
    }

    #[rstest]
    fn fail_fast_propagates_error_unmodified() {
        let policy = ErrorPolicy::fail_fast();
        let err = policy
            .resolve(Err::<(), _>(network_error()), || ())
            .expect_err("should propagate");
        assert_eq!(err, network_error());
    }

    #[rstest]
    fn lenient_substitutes_fallback() {
        let policy = ErrorPolicy::lenient();
        let value = policy.resolve(Err(network_error()), || 7);
        assert_eq!(value, Ok(7));
    }

    #[rstest]
    fn retries_transient_failures_up_to_limit() {
        let calls = Cell::new(0_u32);
        let policy = ErrorPolicy::fail_fast().with_max_attempts(NonZeroU32::MIN.saturating_add(2));
        let result = policy.execute(
            || {
                calls.set(calls.get() + 1);
                Err::<(), _>(network_error())
            },
            || (),
        );
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }

    #[rstest]
    fn stops_retrying_after_success() {
        let calls = Cell::new(0_u32);
        let policy = ErrorPolicy::fail_fast();
        let result = policy.execute(
            || {
                calls.set(calls.get() + 1);
                if calls.get() < 2 {
                    Err(network_error())
                } else {
                    Ok(42)
                }
            },
            || 0,
        );
        assert_eq!(result, Ok(42));
        assert_eq!(calls.get(), 2);
    }

    #[rstest]
    fn does_not_retry_decoding_failures() {
        let calls = Cell::new(0_u32);
        let result = ErrorPolicy::lenient().execute(
            || {
                calls.set(calls.get() + 1);
                Err(RouteError::ParseError {
                    message: "missing rows".into(),
                })
            },
            || -1,
        );
        assert_eq!(result, Ok(-1));
        assert_eq!(calls.get(), 1);
    }
}
