//! Suite declaration
//!
//! A [`Suite`] is built once through [`SuiteBuilder`] and is immutable afterwards,
//! so no test can be added after a run has started.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::test_case::{TestCase, TestConfig};
use crate::assertions::TestResult;

/// Terminal callback invoked once after the last test case
pub type AfterAll = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync + 'static>;

/// Suite declaration and suite-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuiteError {
    #[error("Duplicate test name: {0}")]
    DuplicateTest(String),

    #[error("Test '{0}' must declare at least one invocation")]
    ZeroInvocations(String),

    #[error("Test '{0}' must declare at least one thread")]
    ZeroThreads(String),

    #[error("Test '{0}' has a zero timeout")]
    ZeroTimeout(String),

    #[error("After-all callback failed: {0}")]
    AfterAll(String),
}

/// An ordered, immutable set of test cases
#[derive(Clone)]
pub struct Suite {
    name: String,
    tests: Vec<TestCase>,
    after_all: Option<AfterAll>,
}

impl Suite {
    pub fn builder(name: impl Into<String>) -> SuiteBuilder {
        SuiteBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Test cases in declaration order
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    pub fn after_all(&self) -> Option<&AfterAll> {
        self.after_all.as_ref()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("tests", &self.tests)
            .field("after_all", &self.after_all.is_some())
            .finish()
    }
}

/// Builder collecting test declarations before a run
pub struct SuiteBuilder {
    name: String,
    tests: Vec<TestCase>,
    after_all: Option<AfterAll>,
}

impl SuiteBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
            after_all: None,
        }
    }

    /// Declare a test with default parameters
    pub fn test<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> TestResult + Send + Sync + 'static,
    {
        self.test_with(name, TestConfig::default(), body)
    }

    /// Declare a test with explicit parameters
    pub fn test_with<F>(mut self, name: impl Into<String>, config: TestConfig, body: F) -> Self
    where
        F: Fn() -> TestResult + Send + Sync + 'static,
    {
        self.tests.push(TestCase::new(name, config, body));
        self
    }

    pub fn after_all<F>(mut self, callback: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.after_all = Some(Arc::new(callback));
        self
    }

    /// Validate declarations and freeze the suite
    pub fn build(self) -> Result<Suite, SuiteError> {
        let mut seen = HashSet::new();
        for test in &self.tests {
            let name = test.name().to_string();
            let config = test.config();

            if config.invocations == 0 {
                return Err(SuiteError::ZeroInvocations(name));
            }
            if config.threads == 0 {
                return Err(SuiteError::ZeroThreads(name));
            }
            if config.timeout == Some(Duration::ZERO) {
                return Err(SuiteError::ZeroTimeout(name));
            }
            if !seen.insert(name.clone()) {
                return Err(SuiteError::DuplicateTest(name));
            }
        }

        Ok(Suite {
            name: self.name,
            tests: self.tests,
            after_all: self.after_all,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let suite = Suite::builder("ordered")
            .test("first", || Ok(()))
            .test_with("second", TestConfig::new().invocations(3), || Ok(()))
            .test("third", || Ok(()))
            .build()
            .unwrap();

        let names: Vec<_> = suite.tests().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(suite.tests()[1].config().invocations, 3);
        assert!(suite.after_all().is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = Suite::builder("dup")
            .test("same", || Ok(()))
            .test("same", || Ok(()))
            .build();

        assert_eq!(
            result.unwrap_err(),
            SuiteError::DuplicateTest("same".to_string())
        );
    }

    #[test]
    fn test_zero_parameters_rejected() {
        let zero_inv = Suite::builder("s")
            .test_with("a", TestConfig::new().invocations(0), || Ok(()))
            .build();
        assert!(matches!(zero_inv, Err(SuiteError::ZeroInvocations(_))));

        let zero_threads = Suite::builder("s")
            .test_with("a", TestConfig::new().threads(0), || Ok(()))
            .build();
        assert!(matches!(zero_threads, Err(SuiteError::ZeroThreads(_))));

        let zero_timeout = Suite::builder("s")
            .test_with("a", TestConfig::new().timeout(Duration::ZERO), || Ok(()))
            .build();
        assert!(matches!(zero_timeout, Err(SuiteError::ZeroTimeout(_))));
    }

    #[test]
    fn test_threads_above_invocations_allowed() {
        let suite = Suite::builder("idle")
            .test_with("wide", TestConfig::new().threads(8).invocations(2), || Ok(()))
            .build();
        assert!(suite.is_ok());
    }
}
