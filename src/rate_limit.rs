//! Admission gate shared by every request issued through one client.
//!
//! Limits are configured in events per minute and enforced by `governor`'s
//! GCRA limiter with a burst of one, so admissions are spaced evenly at
//! `60 / events_per_minute` seconds. The limiter state sits behind an `Arc`
//! and is updated atomically, which makes concurrent admission checks from
//! many in-flight requests safe without any outer locking.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultDirectRateLimiter, Quota};

/// Rate limiter bounding how often a client may send.
#[derive(Clone)]
pub struct RateLimiter {
    per_second: f64,
    gate: Arc<DefaultDirectRateLimiter>,
}

impl RateLimiter {
    /// Creates a limiter admitting `events` per minute.
    ///
    /// Returns `None` for `0`, which callers treat as "unlimited".
    pub fn per_minute(events: u32) -> Option<Self> {
        let events = NonZeroU32::new(events)?;
        let quota = Quota::per_minute(events).allow_burst(NonZeroU32::MIN);

        Some(Self {
            per_second: f64::from(events.get()) / 60.0,
            gate: Arc::new(governor::RateLimiter::direct(quota)),
        })
    }

    /// Configured rate in events per second.
    pub fn limit(&self) -> f64 {
        self.per_second
    }

    /// Waits until one admission is available and consumes it.
    ///
    /// There is no timeout: the wait lasts exactly as long as the refill
    /// schedule requires.
    pub async fn acquire(&self) {
        self.gate.until_ready().await;
    }

    /// Consumes one admission if it is available right now.
    pub fn try_acquire(&self) -> bool {
        self.gate.check().is_ok()
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("per_second", &self.per_second)
            .finish()
    }
}
