//! Sliding-window rate limiting for outbound requests.
//!
//! The stadium site is a shared resource; this limiter keeps the scraper
//! polite by admitting at most N calls in any trailing period P. Callers
//! over quota are delayed, never rejected: [`RateLimiter::acquire`] always
//! returns eventually.
//!
//! # Why not a token bucket
//!
//! A bucket-style limiter spreads admissions evenly across the period. The
//! contract here is the stricter sliding-window one: after N instantaneous
//! calls, the next call must wait until a full period has passed since the
//! oldest admission, not merely until the next refill tick.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Admits at most `max_calls` callers per trailing `period`.
///
/// Bookkeeping is a pruned queue of admission instants behind a mutex, so
/// the limiter is safe to share (via `Arc`) between concurrent pipelines.
/// The lock is never held while sleeping.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    window: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting `max_calls` per `period`.
    ///
    /// # Panics
    ///
    /// Panics if `max_calls` is zero; a zero quota would block forever.
    pub fn new(max_calls: usize, period: Duration) -> Self {
        assert!(max_calls > 0, "max_calls must be > 0");
        Self {
            max_calls,
            period,
            window: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    /// Block until the caller may proceed, then record the admission.
    ///
    /// Admissions older than one period are pruned from the window on every
    /// attempt, so the window state needs no separate maintenance.
    pub async fn acquire(&self) {
        loop {
            let reopen_at = {
                let mut window = self.window.lock().await;
                let now = Instant::now();

                while let Some(&oldest) = window.front() {
                    if now.duration_since(oldest) >= self.period {
                        window.pop_front();
                    } else {
                        break;
                    }
                }

                if window.len() < self.max_calls {
                    window.push_back(now);
                    return;
                }

                // Window full: it reopens when the oldest admission ages out.
                let oldest = window.front().copied().unwrap_or(now);
                oldest + self.period
            };

            let delay = reopen_at.saturating_duration_since(Instant::now());
            debug!(?delay, "rate limit reached; delaying call");
            sleep_until(reopen_at).await;
        }
    }

    /// The configured quota, calls per period.
    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    /// The configured trailing period.
    pub fn period(&self) -> Duration {
        self.period
    }
}
