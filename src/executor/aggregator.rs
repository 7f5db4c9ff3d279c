//! Result aggregation
//!
//! Workers report outcomes concurrently through a single synchronized append
//! point. Once sealed by the timeout guard, late reports are discarded so the
//! verdict cannot change after it has been decided.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{InvocationOutcome, OutcomeCounts, TestVerdict};

#[derive(Debug, Default)]
struct AggregatorState {
    counts: OutcomeCounts,
    first_failure: Option<InvocationOutcome>,
    sealed: bool,
}

/// Thread-safe sink for the outcomes of one test case
#[derive(Debug)]
pub struct ResultAggregator {
    expected: u32,
    state: Mutex<AggregatorState>,
}

impl ResultAggregator {
    pub fn new(expected: u32) -> Self {
        Self {
            expected,
            state: Mutex::new(AggregatorState::default()),
        }
    }

    // Bodies run under catch_unwind, but a poisoned lock must still not lose counts
    fn lock(&self) -> MutexGuard<'_, AggregatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one outcome; returns false if the aggregator was already sealed
    pub fn report(&self, outcome: InvocationOutcome) -> bool {
        let mut state = self.lock();
        if state.sealed {
            return false;
        }

        state.counts.record(&outcome);
        if state.first_failure.is_none() && !outcome.is_passed() {
            state.first_failure = Some(outcome);
        }
        true
    }

    /// Stop accepting reports and record every outstanding invocation as timed out
    ///
    /// Returns the number of invocations marked as timed out.
    pub fn expire(&self) -> u32 {
        let mut state = self.lock();
        state.sealed = true;

        let outstanding = self.expected.saturating_sub(state.counts.total());
        for _ in 0..outstanding {
            state.counts.record(&InvocationOutcome::TimedOut);
        }
        if outstanding > 0 && state.first_failure.is_none() {
            state.first_failure = Some(InvocationOutcome::TimedOut);
        }
        outstanding
    }

    /// Number of outcomes recorded so far
    pub(crate) fn recorded(&self) -> u32 {
        self.lock().counts.total()
    }

    /// Produce the verdict from everything recorded
    pub fn verdict(&self) -> TestVerdict {
        let mut state = self.lock();
        state.sealed = true;
        TestVerdict {
            first_failure: state.first_failure.clone(),
            counts: state.counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::AssertionFailure;
    use crate::models::TestStatus;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_all_passed() {
        let agg = ResultAggregator::new(3);
        for _ in 0..3 {
            assert!(agg.report(InvocationOutcome::Passed));
        }

        let verdict = agg.verdict();
        assert!(verdict.is_passed());
        assert_eq!(verdict.counts.passed, 3);
    }

    #[test]
    fn test_first_failure_by_completion_order() {
        let agg = ResultAggregator::new(3);
        agg.report(InvocationOutcome::Passed);
        agg.report(InvocationOutcome::Errored("io".into()));
        agg.report(InvocationOutcome::Failed(AssertionFailure::new("later")));

        let verdict = agg.verdict();
        assert_eq!(verdict.status(), TestStatus::Errored);
        assert_eq!(verdict.counts.errored, 1);
        assert_eq!(verdict.counts.failed, 1);
    }

    #[test]
    fn test_expire_fills_outstanding() {
        let agg = ResultAggregator::new(5);
        agg.report(InvocationOutcome::Passed);
        agg.report(InvocationOutcome::Passed);

        assert_eq!(agg.expire(), 3);
        assert!(!agg.report(InvocationOutcome::Passed));

        let verdict = agg.verdict();
        assert_eq!(verdict.status(), TestStatus::TimedOut);
        assert_eq!(verdict.counts.passed, 2);
        assert_eq!(verdict.counts.timed_out, 3);
        assert_eq!(verdict.counts.total(), 5);
    }

    #[test]
    fn test_earlier_failure_beats_timeout() {
        let agg = ResultAggregator::new(4);
        agg.report(InvocationOutcome::Failed(AssertionFailure::new("bad")));
        agg.expire();

        let verdict = agg.verdict();
        assert_eq!(verdict.status(), TestStatus::Failed);
        assert_eq!(verdict.counts.timed_out, 3);
    }

    #[test]
    fn test_concurrent_reports_not_lost() {
        let agg = Arc::new(ResultAggregator::new(800));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let agg = Arc::clone(&agg);
                thread::spawn(move || {
                    for _ in 0..100 {
                        agg.report(InvocationOutcome::Passed);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(agg.recorded(), 800);
        assert_eq!(agg.verdict().counts.passed, 800);
    }
}
