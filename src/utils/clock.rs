use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::Instant;

use super::interval::Interval;

/// Source of time for the scheduler. Abstracted so tests can control both readings and sleeps.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    /// Wall clock reading measured from the Unix epoch. Can fail, in which case callers are
    /// expected to carry on without it.
    fn wall_time(&self) -> Result<Interval>;

    fn instant(&self) -> Instant;

    async fn sleep_until(&self, deadline: Instant);
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn wall_time(&self) -> Result<Interval> {
        interval_since_epoch(Utc::now())
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, deadline: Instant) {
        tokio::time::sleep_until(deadline).await;
    }
}

pub fn interval_since_epoch(time: DateTime<Utc>) -> Result<Interval> {
    let secs = time.timestamp();
    if secs < 0 {
        bail!("wall clock reads {time}, which is before the Unix epoch");
    }
    // chrono reports leap seconds as a sub-second part past one second
    Interval::new(secs, time.timestamp_subsec_nanos())
        .ok_or_else(|| anyhow!("wall clock reading {time} falls on a leap second"))
}

/// Longest single wait. Instants further out than this may not be representable.
pub const MAX_SLEEP_STEP: Duration = Duration::from_secs(86400 * 365 * 30);

/// Sleeps for the whole `duration`. The deadline is fixed up front and the wait is resumed
/// against it if the clock wakes up early, so the total never stretches past the deadline.
/// Durations past [MAX_SLEEP_STEP] are slept in steps of at most that length.
pub async fn sleep_for(clock: &dyn Clock, duration: Duration) {
    let mut remaining = duration;
    loop {
        let step = remaining.min(MAX_SLEEP_STEP);
        let deadline = clock.instant() + step;
        while clock.instant() < deadline {
            clock.sleep_until(deadline).await;
        }
        remaining -= step;
        if remaining.is_zero() {
            return;
        }
    }
}
