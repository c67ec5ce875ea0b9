use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Repeating refresh timer. The first tick fires one period after start.
/// Each tick is spawned on its own and never waits for the previous one, so
/// a slow refresh can overlap the next and the last one to finish wins.
/// Dropping the handle stops the timer; ticks already running are left alone.
pub struct PollHandle {
    task: JoinHandle<()>,
    period: Duration,
}

impl PollHandle {
    pub fn start<F, Fut>(period: Duration, tick: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                tracing::debug!(
                    component = "poll",
                    period_ms = period.as_millis() as u64,
                    "poll tick"
                );
                tokio::spawn(tick());
            }
        });

        Self { task, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
