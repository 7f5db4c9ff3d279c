//! Test execution engine
//!
//! Schedules invocations over workers, bounds them with a deadline, aggregates
//! their outcomes and walks whole suites.

mod aggregator;
mod guard;
mod runner;
mod scheduler;

pub use aggregator::ResultAggregator;
pub use guard::{CancelToken, GuardOutcome, TimeoutGuard};
pub use runner::{SuiteRunner, SuiteState};
pub use scheduler::{invoke, partition, InvocationScheduler};
