use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running periodic task; dropping it without calling
/// [`TaskHandle::stop`] leaves the task running until process exit.
pub struct TaskHandle {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TaskHandle {
    /// Signal the task to stop and wait for its current tick to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!(task = self.name, error = %e, "Periodic task did not shut down cleanly");
        }
    }
}

/// Spawn a named fixed-interval loop. Missed ticks are delayed rather
/// than bursted, so a slow tick never causes a catch-up storm.
pub fn spawn_periodic<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> TaskHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let (shutdown, mut rx) = watch::channel(false);
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick resolves immediately; consume it so the
        // loop starts one full period after spawn.
        interval.tick().await;
        tracing::debug!(task = name, period_ms = period.as_millis() as u64, "Periodic task started");
        loop {
            tokio::select! {
                _ = interval.tick() => tick().await,
                _ = rx.changed() => {
                    tracing::debug!(task = name, "Periodic task stopping");
                    break;
                }
            }
        }
    });
    TaskHandle {
        name,
        shutdown,
        handle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_fire_and_stop_joins() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let handle = spawn_periodic("test", Duration::from_secs(1), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        handle.stop().await;
        let after = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), after);
    }
}
