//! Debounced scheduling of text-field updates.
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// A cancellable quiet-period timer owned by a single editable field.
///
/// A new submission cancels the pending one, so a burst of keystrokes fires
/// a single update after the field goes quiet instead of one per keystroke.
#[derive(Debug, Default)]
pub struct FieldDebouncer {
    pending: Option<JoinHandle<()>>,
}

impl FieldDebouncer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Schedule `fire` to run after `quiet_period`, cancelling whatever was
    /// previously scheduled on this field.
    pub fn submit<F>(&mut self, quiet_period: Duration, fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            time::sleep(quiet_period).await;
            fire.await;
        }));
    }

    /// Drop the pending submission, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for FieldDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn a_burst_fires_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = FieldDebouncer::new();
        for _ in 0..5 {
            let fired = Arc::clone(&fired);
            debouncer.submit(Duration::from_millis(500), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
            time::sleep(Duration::from_millis(100)).await;
        }
        time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_pending_fire() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = FieldDebouncer::new();
        {
            let fired = Arc::clone(&fired);
            debouncer.submit(Duration::from_millis(500), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        debouncer.cancel();
        time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
