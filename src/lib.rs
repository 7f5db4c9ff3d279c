//! paramspec - parameterized test declaration and execution
//!
//! Declare named test cases with assertion bodies and execution parameters
//! (invocation count, worker threads, timeout, tags, ignore flag), then run them
//! with a [`SuiteRunner`] and inspect the resulting [`SuiteReport`].
//!
//! ## Usage
//!
//! ```no_run
//! use paramspec::assertions::Should;
//! use paramspec::{Suite, SuiteRunner, TagFilter, TestConfig};
//! use std::time::Duration;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let suite = Suite::builder("math")
//!     .test("addition", || {
//!         (2_i32 + 2).should_be(4)?;
//!         Ok(())
//!     })
//!     .test_with("repeated", TestConfig::new().invocations(10).threads(4), || Ok(()))
//!     .build()?;
//!
//! let mut runner = SuiteRunner::new(TagFilter::none(), Duration::from_secs(5));
//! let report = runner.run(&suite).await;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod config;
pub mod executor;
pub mod filter;
pub mod models;
pub mod utils;

pub use assertions::{AssertionFailure, TestError, TestResult};
pub use config::RunnerConfig;
pub use executor::{SuiteRunner, SuiteState};
pub use filter::TagFilter;
pub use models::{
    InvocationOutcome, OutcomeCounts, SkipReason, Suite, SuiteBuilder, SuiteError, SuiteReport,
    TestCase, TestConfig, TestReport, TestStatus, TestVerdict,
};
