use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::*;

/// Shortest supported period. Shorter periods are raised to this value.
pub const MIN_PERIOD: Duration = Duration::from_millis(100);

/// Handle to a task which runs a routine on a fixed interval, starting immediately. Stopping is
/// best-effort: future runs are cancelled and an in-flight run is dropped at its next await point,
/// without waiting for it. The task is also stopped when the handle is dropped.
#[derive(Debug)]
pub struct PeriodicTask {
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawns the task on the current tokio runtime. Periods shorter than [`MIN_PERIOD`] are
    /// raised to it.
    pub fn start<F, Fut>(period: Duration, mut routine: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = if period < MIN_PERIOD {
            warn!(
                ?period,
                min_period = ?MIN_PERIOD,
                "Periodic task period too short - using minimum period."
            );
            MIN_PERIOD
        } else {
            period
        };

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                routine().await;
            }
        });

        PeriodicTask { handle }
    }

    #[inline]
    pub fn stop(self) {
        self.handle.abort();
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
