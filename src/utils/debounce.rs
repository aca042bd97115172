use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Schedules a single delayed evaluation, cancelling any pending one. Each
/// `schedule` call replaces whatever is still waiting, so a burst of calls
/// runs the task exactly once, `delay` after the last call. Independent of
/// any transport or UI layer.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn schedule<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task().await;
        });

        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on pending task: {}", e));
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on pending task: {}", e));
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_schedules_runs_once() {
        let debouncer = Debouncer::new(Duration::from_secs(1));
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let counter = Arc::clone(&counter);
            debouncer.schedule(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_each_run() {
        let debouncer = Debouncer::new(Duration::from_secs(1));
        let counter = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&counter);
        debouncer.schedule(move || async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_secs(2)).await;

        let c = Arc::clone(&counter);
        debouncer.schedule(move || async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_task() {
        let debouncer = Debouncer::new(Duration::from_secs(1));
        let counter = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&counter);
        debouncer.schedule(move || async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
