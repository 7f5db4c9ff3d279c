//! Invocation scheduling
//!
//! Splits a test case's invocations over its workers, runs each worker on its
//! own thread and funnels every outcome into the aggregator as soon as it
//! completes.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::aggregator::ResultAggregator;
use super::guard::{CancelToken, GuardOutcome, TimeoutGuard};
use crate::assertions::{AssertionFailure, TestError};
use crate::models::{InvocationOutcome, TestBody, TestCase, TestVerdict};

/// Balanced split of `invocations` over `threads` workers
///
/// Sizes differ by at most one; earlier workers take the remainder.
pub fn partition(invocations: u32, threads: u32) -> Vec<u32> {
    if threads == 0 {
        return Vec::new();
    }
    let base = invocations / threads;
    let extra = invocations % threads;
    (0..threads).map(|i| base + u32::from(i < extra)).collect()
}

/// Execute the body once and classify the result
pub fn invoke(body: &TestBody) -> InvocationOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| body())) {
        Ok(Ok(())) => InvocationOutcome::Passed,
        Ok(Err(TestError::Assertion(failure))) => InvocationOutcome::Failed(failure),
        Ok(Err(TestError::Unexpected(err))) => InvocationOutcome::Errored(format!("{err:#}")),
        Err(payload) => match payload.downcast::<AssertionFailure>() {
            Ok(failure) => InvocationOutcome::Failed(*failure),
            Err(payload) => InvocationOutcome::Errored(format!(
                "panicked: {}",
                panic_message(payload.as_ref())
            )),
        },
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn run_worker(
    worker: usize,
    assigned: u32,
    body: &TestBody,
    aggregator: &ResultAggregator,
    cancel: &CancelToken,
) {
    for _ in 0..assigned {
        if cancel.is_cancelled() {
            debug!("Worker {} stopped after cancellation", worker);
            return;
        }
        aggregator.report(invoke(body));
    }
}

/// Launch one detached worker thread; the receiver resolves when it returns
fn spawn_worker(
    worker: usize,
    assigned: u32,
    body: TestBody,
    aggregator: Arc<ResultAggregator>,
    cancel: CancelToken,
) -> oneshot::Receiver<()> {
    let (done, finished) = oneshot::channel();
    let sink = Arc::clone(&aggregator);
    let spawned = thread::Builder::new()
        .name(format!("paramspec-worker-{worker}"))
        .spawn(move || {
            run_worker(worker, assigned, &body, &aggregator, &cancel);
            let _ = done.send(());
        });

    if let Err(e) = spawned {
        warn!("Failed to spawn worker {}: {}", worker, e);
        for _ in 0..assigned {
            sink.report(InvocationOutcome::Errored(format!(
                "failed to spawn worker: {e}"
            )));
        }
    }
    finished
}

/// Runs the invocation set of one admitted test case under its deadline
#[derive(Clone, Debug)]
pub struct InvocationScheduler {
    default_timeout: Duration,
}

impl InvocationScheduler {
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }

    /// Run every invocation of `test` and return its verdict
    ///
    /// Each worker is a dedicated OS thread, so `threads` workers really run
    /// concurrently with no runtime pool in between. Workers still running at
    /// the deadline are detached rather than joined.
    pub async fn execute(&self, test: &TestCase) -> TestVerdict {
        let config = test.config();
        let assignments = partition(config.invocations, config.threads);
        let aggregator = Arc::new(ResultAggregator::new(config.invocations));

        debug!(
            "Scheduling {} invocation(s) of '{}' over {} worker(s): {:?}",
            config.invocations,
            test.name(),
            assignments.len(),
            assignments
        );

        let guard = TimeoutGuard::start(config.effective_timeout(self.default_timeout));
        let workers = assignments
            .into_iter()
            .enumerate()
            .map(|(worker, assigned)| {
                spawn_worker(
                    worker,
                    assigned,
                    test.body(),
                    Arc::clone(&aggregator),
                    guard.token(),
                )
            })
            .collect();

        if guard.wait(workers).await == GuardOutcome::Expired {
            let finished = aggregator.recorded();
            let abandoned = aggregator.expire();
            warn!(
                "'{}' timed out after {}ms: {} invocation(s) finished, {} unfinished",
                test.name(),
                guard.timeout().as_millis(),
                finished,
                abandoned
            );
        }

        aggregator.verdict()
    }
}
