//! Data models for test declaration and results
//!
//! This module contains all data structures shared by the engine and its reporters.

mod suite;
mod test_case;
mod test_result;

pub use suite::{AfterAll, Suite, SuiteBuilder, SuiteError};
pub use test_case::{TestBody, TestCase, TestConfig};
pub use test_result::{
    InvocationOutcome, OutcomeCounts, SkipReason, SuiteReport, TestReport, TestStatus,
    TestVerdict,
};
