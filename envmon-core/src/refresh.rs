//! Recurring refresh trigger.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::debug;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Cancellable timer that fires every `period` while running.
///
/// The schedule lives in the handle itself and is only polled by [`tick`],
/// so stopping takes effect immediately and a tick that came due while the
/// caller was busy is never delivered after `stop`. Ticks missed during a
/// long-running caller collapse into one. Starting always begins a full
/// period; dropping the handle stops the timer.
///
/// [`tick`]: AutoRefresh::tick
#[derive(Debug)]
pub struct AutoRefresh {
    period: Duration,
    schedule: Option<Interval>,
}

impl AutoRefresh {
    pub fn new(period: Duration) -> Self {
        Self { period, schedule: None }
    }

    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.schedule = Some(interval);
        debug!(period = ?self.period, "auto-refresh started");
    }

    pub fn stop(&mut self) {
        if self.schedule.take().is_some() {
            debug!("auto-refresh stopped");
        }
    }

    /// Push the next tick a full period out from now. No-op while stopped.
    pub fn restart_countdown(&mut self) {
        if let Some(interval) = &mut self.schedule {
            interval.reset();
        }
    }

    /// Resolves on the next tick. Never resolves while stopped.
    pub async fn tick(&mut self) {
        match &mut self.schedule {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
