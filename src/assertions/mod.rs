//! Assertion protocol
//!
//! Test bodies report failure through typed errors. A violated check produces an
//! [`AssertionFailure`]; anything else is an unexpected error. The engine tells the
//! two apart by variant, never by message text.

mod collections;
mod matcher;

pub use collections::{be_empty, contain, contain_in_any_order, have_size};
pub use matcher::{equal, not_equal, Matcher, Should};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type returned by every test body
pub type TestResult = Result<(), TestError>;

/// A violated check, carrying a human readable expected-vs-actual message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the standard "expected X but was Y" failure
    pub fn mismatch(expected: impl fmt::Debug, actual: impl fmt::Debug) -> Self {
        Self::new(format!("expected {expected:?} but was {actual:?}"))
    }
}

/// Signal raised by a test body
#[derive(Debug, Error)]
pub enum TestError {
    #[error("assertion failed: {0}")]
    Assertion(#[from] AssertionFailure),

    #[error("unexpected error: {0:#}")]
    Unexpected(anyhow::Error),
}

impl TestError {
    /// Wrap any error raised inside a body that is not a check violation
    pub fn unexpected(err: impl Into<anyhow::Error>) -> Self {
        TestError::Unexpected(err.into())
    }
}

impl From<anyhow::Error> for TestError {
    fn from(err: anyhow::Error) -> Self {
        TestError::Unexpected(err)
    }
}

/// Fail the current invocation unconditionally
pub fn fail<T>(message: impl Into<String>) -> Result<T, TestError> {
    Err(AssertionFailure::new(message).into())
}
