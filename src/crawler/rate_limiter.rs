//! Sliding-window rate limiting for catalog API calls
//!
//! This module handles:
//! - Tracking admitted call timestamps within a trailing window
//! - Computing how long a caller must wait before the next call
//! - Suspending the caller (cancellably) until a slot frees up
//!
//! Throttling is proactive: server responses are never inspected to decide
//! whether to slow down.

use crate::config::RateLimitConfig;
use crate::HarvestError;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Ordered log of admitted call timestamps, oldest first
///
/// The window takes `now` explicitly so admission decisions are
/// deterministic and independent of any clock.
#[derive(Debug, Clone)]
pub struct RateWindow {
    max_calls: usize,
    period: Duration,
    calls: VecDeque<Instant>,
}

impl RateWindow {
    /// Creates an empty window admitting `max_calls` per `period`
    pub fn new(max_calls: usize, period: Duration) -> Self {
        let max_calls = max_calls.max(1);
        Self {
            max_calls,
            period,
            calls: VecDeque::new(),
        }
    }

    /// Drops timestamps that have aged out of the window
    fn expire(&mut self, now: Instant) {
        while let Some(&oldest) = self.calls.front() {
            if now.saturating_duration_since(oldest) >= self.period {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }

    /// Tries to admit a call at `now`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The call is admitted and `now` is recorded
    /// * `Err(Duration)` - The window is full; wait this long, then try again
    pub fn try_admit(&mut self, now: Instant) -> Result<(), Duration> {
        self.expire(now);

        if self.calls.len() < self.max_calls {
            self.calls.push_back(now);
            return Ok(());
        }

        match self.calls.front() {
            Some(&oldest) => Err(self.period - now.saturating_duration_since(oldest)),
            None => {
                self.calls.push_back(now);
                Ok(())
            }
        }
    }

    /// Number of calls currently inside the window
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Admission control owned by a single API client
///
/// Each limiter is an independent value; two crawls holding two limiters
/// do not share a call log.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    window: RateWindow,
    cancel: CancellationToken,
}

impl RateLimiter {
    pub fn new(max_calls: usize, period: Duration) -> Self {
        Self {
            window: RateWindow::new(max_calls, period),
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_calls, config.period())
    }

    /// Aborts waits (and future acquisitions) once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Waits until issuing a call would not exceed the window, then records it
    ///
    /// Sleeps once for the computed wait and re-evaluates; it never spins.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The caller may issue its request now
    /// * `Err(HarvestError::Cancelled)` - The cancellation token fired
    pub async fn acquire(&mut self) -> Result<(), HarvestError> {
        if self.cancel.is_cancelled() {
            return Err(HarvestError::Cancelled);
        }

        loop {
            let wait = match self.window.try_admit(Instant::now()) {
                Ok(()) => return Ok(()),
                Err(wait) => wait,
            };

            tracing::warn!(
                "Sleeping {:.1} seconds to avoid being rate-limited",
                wait.as_secs_f64()
            );

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = self.cancel.cancelled() => {
                    tracing::warn!("Rate-limit wait cancelled");
                    return Err(HarvestError::Cancelled);
                }
            }
        }
    }

    pub fn window(&self) -> &RateWindow {
        &self.window
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}
