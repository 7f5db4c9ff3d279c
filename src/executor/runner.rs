//! Suite runner
//!
//! Walks a suite in declaration order, applies the skip and tag policy, hands
//! admitted tests to the scheduler and finally invokes the after-all callback.

use chrono::Utc;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::{debug, error, info};

use super::scheduler::{panic_message, InvocationScheduler};
use crate::config::RunnerConfig;
use crate::filter::TagFilter;
use crate::models::{SkipReason, Suite, SuiteReport, TestCase, TestReport};
use crate::utils::Timer;

/// Lifecycle of a suite run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuiteState {
    NotStarted,
    Running,
    Completed,
}

/// Executes suites under one tag filter and default timeout
pub struct SuiteRunner {
    filter: TagFilter,
    scheduler: InvocationScheduler,
    state: SuiteState,
}

impl SuiteRunner {
    pub fn new(filter: TagFilter, default_timeout: Duration) -> Self {
        Self {
            filter,
            scheduler: InvocationScheduler::new(default_timeout),
            state: SuiteState::NotStarted,
        }
    }

    /// Build a runner from resolved configuration; the tag list is read here, once
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(TagFilter::from_config(config), config.default_timeout())
    }

    pub fn state(&self) -> SuiteState {
        self.state
    }

    pub fn filter(&self) -> &TagFilter {
        &self.filter
    }

    /// Decide whether a test is skipped, before any worker exists
    pub fn skip_reason(&self, test: &TestCase) -> Option<SkipReason> {
        let config = test.config();
        if config.ignored {
            Some(SkipReason::Ignored)
        } else if !self.filter.admits(&config.all_tags()) {
            Some(SkipReason::TagFiltered)
        } else {
            None
        }
    }

    /// Run every test case of `suite` and return the report
    pub async fn run(&mut self, suite: &Suite) -> SuiteReport {
        self.state = SuiteState::Running;
        let started_at = Utc::now();
        let suite_timer = Timer::start(format!("suite {}", suite.name()));

        info!(
            "Running suite '{}' ({} tests, tags: {})",
            suite.name(),
            suite.len(),
            self.filter
        );

        let mut tests = Vec::with_capacity(suite.len());
        for test in suite.tests() {
            let report = self.run_test(test).await;
            info!("  {}", report);
            tests.push(report);
        }

        self.state = SuiteState::Completed;

        let callback_error = suite.after_all().and_then(|callback| {
            debug!("Invoking after-all callback for '{}'", suite.name());
            let message = match panic::catch_unwind(AssertUnwindSafe(|| callback())) {
                Ok(Ok(())) => return None,
                Ok(Err(e)) => format!("{e:#}"),
                Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
            };
            error!("After-all callback for '{}' failed: {}", suite.name(), message);
            Some(message)
        });

        let report = SuiteReport {
            suite: suite.name().to_string(),
            started_at,
            tests,
            callback_error,
            total_duration_ms: suite_timer.stop(),
        };

        info!(
            "Suite '{}' completed in {}ms - Pass: {} | Fail: {} | Error: {} | Timeout: {} | Skip: {}",
            report.suite,
            report.total_duration_ms,
            report.passed(),
            report.failed(),
            report.errored(),
            report.timed_out(),
            report.skipped()
        );

        report
    }

    async fn run_test(&self, test: &TestCase) -> TestReport {
        if let Some(reason) = self.skip_reason(test) {
            debug!("Skipping '{}': {}", test.name(), reason);
            return TestReport::skipped(test.name(), reason);
        }

        info!("Running {}", test);
        let timer = Timer::start(test.name());
        let verdict = self.scheduler.execute(test).await;
        TestReport::from_verdict(test.name(), verdict, timer.stop())
    }
}
