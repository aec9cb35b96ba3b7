//! Sliding-window request quota.
//!
//! [`RateLimiter`] admits at most `max_requests` requests in any rolling
//! window of length `window`, optionally spacing consecutive admissions by a
//! minimum interval. It keeps an exact log of admission instants, so memory
//! grows with the number of requests inside one window.
//!
//! Callers queue in arrival order: each [`RateLimiter::acquire`] takes a
//! ticket and waits its turn, then sleeps until the quota allows one more
//! request.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, warn};

/// Default quota: requests per window.
pub const DEFAULT_MAX_REQUESTS: NonZeroUsize = match NonZeroUsize::new(100_000) {
    Some(max) => max,
    None => NonZeroUsize::MIN,
};

/// Default window length: 24 hours.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60 * 60 * 24);

/// Blocking, thread-safe limiter over a rolling window.
///
/// Share one instance (for example behind an `Arc`) between every call site
/// that must respect the same quota.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
/// use std::time::Duration;
/// use route_distances_core::RateLimiter;
///
/// let limiter = RateLimiter::new(NonZeroUsize::MIN, Duration::from_secs(60));
/// assert!(limiter.try_acquire().is_ok());
/// let wait = limiter.try_acquire().expect_err("quota is spent");
/// assert!(wait <= Duration::from_secs(60));
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<RateLimitState>,
    turn: Condvar,
}

#[derive(Debug)]
struct RateLimitState {
    log: SlidingLog,
    next_ticket: u64,
    now_serving: u64,
}

impl RateLimitState {
    const fn has_queue(&self) -> bool {
        self.next_ticket != self.now_serving
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    /// Allow `max_requests` admissions in any window of length `window`.
    #[must_use]
    pub fn new(max_requests: NonZeroUsize, window: Duration) -> Self {
        Self {
            state: Mutex::new(RateLimitState {
                log: SlidingLog::new(max_requests, window),
                next_ticket: 0,
                now_serving: 0,
            }),
            turn: Condvar::new(),
        }
    }

    /// Require at least `min_interval` between consecutive admissions.
    ///
    /// The first admission never waits.
    #[must_use]
    pub fn with_min_interval(self, min_interval: Duration) -> Self {
        let mut state = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
        state.log.min_interval = min_interval;
        Self {
            state: Mutex::new(state),
            turn: self.turn,
        }
    }

    /// Block until one more request fits the quota, then record it.
    ///
    /// Call exactly once per outbound request, immediately before sending it.
    /// Concurrent callers are admitted in the order they called.
    pub fn acquire(&self) {
        let mut state = self.lock();
        let ticket = state.next_ticket;
        state.next_ticket = state.next_ticket.wrapping_add(1);
        let mut announced = false;

        loop {
            if state.now_serving != ticket {
                state = self
                    .turn
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
                continue;
            }
            match state.log.admit(Instant::now()) {
                Ok(()) => {
                    state.now_serving = state.now_serving.wrapping_add(1);
                    drop(state);
                    self.turn.notify_all();
                    return;
                }
                Err(wait) => {
                    if !announced {
                        announce(&state.log, wait);
                        announced = true;
                    }
                    state = self
                        .turn
                        .wait_timeout(state, wait.duration)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0;
                }
            }
        }
    }

    /// Admit a request only if that is possible right now.
    ///
    /// # Errors
    ///
    /// Returns how long the caller would have to wait. The wait is zero when
    /// the quota has room but other callers are already queued.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let mut state = self.lock();
        if state.has_queue() {
            return Err(Duration::ZERO);
        }
        state
            .log
            .admit(Instant::now())
            .map_err(|wait| wait.duration)
    }

    fn lock(&self) -> MutexGuard<'_, RateLimitState> {
        // The state is updated in single assignments, so a poisoned lock
        // still holds a consistent log.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn announce(log: &SlidingLog, wait: Wait) {
    if wait.quota_exhausted {
        warn!(
            "reached {} requests per {:?}; waiting {:?} for the window to advance",
            log.max_requests, log.window, wait.duration
        );
    } else {
        debug!("spacing requests; waiting {:?}", wait.duration);
    }
}

/// Time left at `now` of a span of length `span` that began at `start`.
///
/// Computed from elapsed time so spans as long as `Duration::MAX` never
/// overflow an `Instant`.
fn remaining(start: Instant, span: Duration, now: Instant) -> Duration {
    span.saturating_sub(now.saturating_duration_since(start))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Wait {
    duration: Duration,
    quota_exhausted: bool,
}

/// Exact log of admissions inside the current window.
#[derive(Debug)]
struct SlidingLog {
    max_requests: NonZeroUsize,
    window: Duration,
    min_interval: Duration,
    admitted: VecDeque<Instant>,
    last: Option<Instant>,
}

impl SlidingLog {
    const fn new(max_requests: NonZeroUsize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            min_interval: Duration::ZERO,
            admitted: VecDeque::new(),
            last: None,
        }
    }

    /// Record an admission at `now`, or report how long to wait.
    fn admit(&mut self, now: Instant) -> Result<(), Wait> {
        self.evict(now);

        let quota_wait = if self.admitted.len() < self.max_requests.get() {
            Duration::ZERO
        } else {
            self.admitted
                .front()
                .map_or(Duration::ZERO, |&oldest| remaining(oldest, self.window, now))
        };
        let interval_wait = self
            .last
            .map_or(Duration::ZERO, |last| remaining(last, self.min_interval, now));

        let duration = quota_wait.max(interval_wait);
        if !duration.is_zero() {
            return Err(Wait {
                duration,
                quota_exhausted: !quota_wait.is_zero(),
            });
        }

        self.admitted.push_back(now);
        self.last = Some(now);
        Ok(())
    }

    /// Drop admissions that have left the window ending at `now`.
    fn evict(&mut self, now: Instant) {
        while self
            .admitted
            .front()
            .is_some_and(|&oldest| now.saturating_duration_since(oldest) >= self.window)
        {
            self.admitted.pop_front();
        }
    }
}
