//! Recurring autoclicker timer.

use std::future;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Default autoclicker period.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Fixed-period timer that only fires while armed.
///
/// The underlying [`Interval`] is created on the first poll after arming,
/// so arming works outside a runtime and the first tick lands one full
/// period later. Dropping the timer cancels it.
#[derive(Debug)]
pub struct AutoclickTimer {
    period: Duration,
    armed: bool,
    interval: Option<Interval>,
}

impl AutoclickTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            armed: false,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start ticking. A no-op if already armed.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Stop ticking and forget the current schedule.
    pub fn disarm(&mut self) {
        self.armed = false;
        self.interval = None;
    }

    /// Wait for the next tick. Never resolves while disarmed.
    ///
    /// Cancel safe: dropping the future does not lose the schedule.
    pub async fn tick(&mut self) {
        if !self.armed {
            return future::pending().await;
        }
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut i = interval_at(Instant::now() + period, period);
            i.set_missed_tick_behavior(MissedTickBehavior::Delay);
            i
        });
        interval.tick().await;
    }
}

impl Default for AutoclickTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}
