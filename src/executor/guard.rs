//! Timeout guard
//!
//! Bounds the wall-clock time of a test case's whole invocation set. On expiry
//! the workers are abandoned: the cancellation token stops them from starting
//! another invocation, but an invocation already running is left to finish on
//! its own. Workers are detached threads that signal completion over a oneshot
//! channel, so nothing the runtime owns waits on an abandoned body.

use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Shared flag telling workers to stop picking up invocations
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// How the guarded invocation set ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Completed,
    Expired,
}

/// Deadline for one test case, fixed when the guard is started
#[derive(Debug)]
pub struct TimeoutGuard {
    deadline: Instant,
    timeout: Duration,
    cancel: CancelToken,
}

impl TimeoutGuard {
    /// Start the clock; call immediately before launching workers
    pub fn start(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            timeout,
            cancel: CancelToken::default(),
        }
    }

    pub fn token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait for every worker or the deadline, whichever comes first
    pub async fn wait(&self, workers: Vec<oneshot::Receiver<()>>) -> GuardOutcome {
        let count = workers.len();
        match tokio::time::timeout_at(self.deadline, join_all(workers)).await {
            Ok(joined) => {
                for result in joined {
                    if let Err(e) = result {
                        warn!("Worker exited without signalling completion: {}", e);
                    }
                }
                debug!("{} worker(s) joined before deadline", count);
                GuardOutcome::Completed
            }
            Err(_) => {
                self.cancel.cancel();
                warn!(
                    "Deadline of {}ms expired, abandoning {} worker(s)",
                    self.timeout.as_millis(),
                    count
                );
                GuardOutcome::Expired
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn worker<F: FnOnce() + Send + 'static>(f: F) -> oneshot::Receiver<()> {
        let (done, rx) = oneshot::channel();
        thread::spawn(move || {
            f();
            let _ = done.send(());
        });
        rx
    }

    #[tokio::test]
    async fn test_completes_before_deadline() {
        let guard = TimeoutGuard::start(Duration::from_secs(2));
        let workers = vec![worker(|| {})];

        assert_eq!(guard.wait(workers).await, GuardOutcome::Completed);
        assert!(!guard.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_expiry_cancels_token() {
        let guard = TimeoutGuard::start(Duration::from_millis(20));
        let token = guard.token();
        let workers = vec![worker(|| thread::sleep(Duration::from_millis(300)))];

        let started = std::time::Instant::now();
        assert_eq!(guard.wait(workers).await, GuardOutcome::Expired);
        assert!(token.is_cancelled());
        assert!(started.elapsed() < Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_dropped_sender_counts_as_completed() {
        let guard = TimeoutGuard::start(Duration::from_secs(2));
        let (done, rx) = oneshot::channel::<()>();
        drop(done);

        assert_eq!(guard.wait(vec![rx]).await, GuardOutcome::Completed);
    }

    #[tokio::test]
    async fn test_no_workers() {
        let guard = TimeoutGuard::start(Duration::from_millis(10));
        assert_eq!(guard.wait(Vec::new()).await, GuardOutcome::Completed);
    }
}
