//! Timers driving the game loop
//!
//! Both timers are owned by the loop and polled from its `tokio::select!`,
//! so their callbacks never interleave with input handling or a tick.

use std::future::pending;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, Sleep, interval_at, sleep};

/// The recurring game tick
///
/// Holds at most one interval. Rescheduling drops the running interval
/// before the new one is created, so two tickers never run at once.
#[derive(Debug)]
pub struct Ticker {
    interval: Option<Interval>,
    period: Duration,
}

impl Ticker {
    /// A ticker that is not running
    pub fn stopped() -> Self {
        Self {
            interval: None,
            period: Duration::ZERO,
        }
    }

    /// Start ticking every `period`, first tick one period from now
    pub fn start(&mut self, period: Duration) {
        self.cancel();
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
        self.period = period;
    }

    /// Cancel the running interval and start again at a new period
    pub fn reschedule(&mut self, period: Duration) {
        self.start(period);
    }

    pub fn cancel(&mut self) {
        self.interval = None;
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next tick; never resolves while stopped
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => pending::<()>().await,
        }
    }
}

/// One-shot timer that clears a special food when its lifetime runs out
///
/// Tagged with the id of the special food it was armed for.
#[derive(Debug, Default)]
pub struct ExpiryTimer {
    armed: Option<(u64, Pin<Box<Sleep>>)>,
}

impl ExpiryTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer for special food `id`, replacing any pending expiry
    pub fn arm(&mut self, id: u64, after: Duration) {
        self.armed = Some((id, Box::pin(sleep(after))));
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Id the timer is armed for, if any
    pub fn armed_for(&self) -> Option<u64> {
        self.armed.as_ref().map(|(id, _)| *id)
    }

    /// Wait for the timer to fire and return the id it was armed for
    ///
    /// Disarms itself on firing; never resolves while disarmed.
    pub async fn fired(&mut self) -> u64 {
        let Some((id, sleep)) = self.armed.as_mut() else {
            return pending().await;
        };
        sleep.as_mut().await;
        let id = *id;
        self.armed = None;
        id
    }
}
