use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Counting synchronization primitive for fan-in.
///
/// Armed once with the number of concurrent activities it tracks, before
/// any of them is launched. Each activity calls [`signal`](Self::signal)
/// exactly once on completion; [`wait`](Self::wait) suspends the caller
/// until the count reaches zero. The barrier is single-use: construct,
/// signal exactly `n` times total, wait once.
///
/// Signalling more times than the barrier was armed for is a programming
/// error and panics rather than letting the count wrap.
#[derive(Clone, Debug)]
pub struct CompletionBarrier {
    inner: Arc<BarrierInner>,
}

#[derive(Debug)]
struct BarrierInner {
    pending: AtomicUsize,
    notify: Notify,
}

impl CompletionBarrier {
    /// Arm the barrier for `n` activities.
    ///
    /// With `n == 0` there is nothing to track and `wait` returns
    /// immediately.
    pub fn new(n: usize) -> Self {
        Self {
            inner: Arc::new(BarrierInner {
                pending: AtomicUsize::new(n),
                notify: Notify::new(),
            }),
        }
    }

    /// Report one tracked activity as complete.
    ///
    /// # Panics
    ///
    /// Panics if called more times than the barrier was armed for.
    pub fn signal(&self) {
        let mut current = self.inner.pending.load(Ordering::Acquire);
        loop {
            assert!(
                current > 0,
                "completion barrier signaled more times than it was armed for"
            );
            match self.inner.pending.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if current == 1 {
                        self.inner.notify.notify_waiters();
                    }
                    return;
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Suspend until every tracked activity has signaled.
    pub async fn wait(&self) {
        loop {
            // register for the wakeup before re-checking the count, so a
            // signal landing between the check and the await is not lost
            let notified = self.inner.notify.notified();
            if self.inner.pending.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Number of activities that have not yet signaled.
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_zero_armed_barrier_waits_return_immediately() {
        let barrier = CompletionBarrier::new(0);
        timeout(Duration::from_millis(100), barrier.wait())
            .await
            .expect("wait on an unarmed barrier should not suspend");
    }

    #[tokio::test]
    async fn test_three_signals_unblock_a_pending_wait() {
        let barrier = CompletionBarrier::new(3);
        for _ in 0..3 {
            let barrier = barrier.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                barrier.signal();
            });
        }
        timeout(Duration::from_secs(1), barrier.wait())
            .await
            .expect("wait should unblock after the third signal");
        assert_eq!(barrier.pending(), 0);
    }

    #[tokio::test]
    async fn test_wait_suspends_until_the_last_signal() {
        let barrier = CompletionBarrier::new(3);
        barrier.signal();
        barrier.signal();
        assert!(
            timeout(Duration::from_millis(50), barrier.wait())
                .await
                .is_err(),
            "wait must not return while one activity is outstanding"
        );
        barrier.signal();
        timeout(Duration::from_secs(1), barrier.wait())
            .await
            .expect("wait should return once the count reaches zero");
    }

    #[tokio::test]
    #[should_panic(expected = "more times than it was armed for")]
    async fn test_over_signal_panics() {
        let barrier = CompletionBarrier::new(1);
        barrier.signal();
        barrier.signal();
    }

    #[tokio::test]
    async fn test_clones_share_the_count() {
        let barrier = CompletionBarrier::new(2);
        let other = barrier.clone();
        barrier.signal();
        other.signal();
        assert_eq!(barrier.pending(), 0);
        timeout(Duration::from_millis(100), barrier.wait())
            .await
            .expect("clones decrement the same count");
    }
}
