//! Collection matchers

use std::fmt::Debug;

use super::{AssertionFailure, Matcher};

pub struct BeEmpty;

/// Collection must have no elements
pub fn be_empty() -> BeEmpty {
    BeEmpty
}

impl<T> Matcher<[T]> for BeEmpty {
    fn test(&self, subject: &[T]) -> Result<(), AssertionFailure> {
        if subject.is_empty() {
            Ok(())
        } else {
            Err(AssertionFailure::new(format!(
                "Collection was expected to be empty but has size {}",
                subject.len()
            )))
        }
    }
}

impl<T> Matcher<Vec<T>> for BeEmpty {
    fn test(&self, subject: &Vec<T>) -> Result<(), AssertionFailure> {
        Matcher::<[T]>::test(self, subject.as_slice())
    }
}

pub struct HaveSize(usize);

/// Collection must have exactly `expected` elements
pub fn have_size(expected: usize) -> HaveSize {
    HaveSize(expected)
}

impl<T> Matcher<[T]> for HaveSize {
    fn test(&self, subject: &[T]) -> Result<(), AssertionFailure> {
        if subject.len() == self.0 {
            Ok(())
        } else {
            Err(AssertionFailure::new(format!(
                "Collection was expected to have size {} but had size {}",
                self.0,
                subject.len()
            )))
        }
    }
}

impl<T> Matcher<Vec<T>> for HaveSize {
    fn test(&self, subject: &Vec<T>) -> Result<(), AssertionFailure> {
        Matcher::<[T]>::test(self, subject.as_slice())
    }
}

pub struct Contain<T>(T);

/// Collection must hold `expected`
pub fn contain<T>(expected: T) -> Contain<T> {
    Contain(expected)
}

impl<T: PartialEq + Debug> Matcher<[T]> for Contain<T> {
    fn test(&self, subject: &[T]) -> Result<(), AssertionFailure> {
        if subject.contains(&self.0) {
            Ok(())
        } else {
            Err(AssertionFailure::new(format!(
                "Collection did not have expected element {:?}",
                self.0
            )))
        }
    }
}

impl<T: PartialEq + Debug> Matcher<Vec<T>> for Contain<T> {
    fn test(&self, subject: &Vec<T>) -> Result<(), AssertionFailure> {
        Matcher::<[T]>::test(self, subject.as_slice())
    }
}

pub struct ContainInAnyOrder<T>(Vec<T>);

/// Collection must hold every one of `expected`, order ignored
pub fn contain_in_any_order<T>(expected: impl IntoIterator<Item = T>) -> ContainInAnyOrder<T> {
    ContainInAnyOrder(expected.into_iter().collect())
}

impl<T: PartialEq + Debug> Matcher<[T]> for ContainInAnyOrder<T> {
    fn test(&self, subject: &[T]) -> Result<(), AssertionFailure> {
        match self.0.iter().find(|t| !subject.contains(*t)) {
            None => Ok(()),
            Some(missing) => Err(AssertionFailure::new(format!(
                "Collection did not contain value {missing:?}"
            ))),
        }
    }
}

impl<T: PartialEq + Debug> Matcher<Vec<T>> for ContainInAnyOrder<T> {
    fn test(&self, subject: &Vec<T>) -> Result<(), AssertionFailure> {
        Matcher::<[T]>::test(self, subject.as_slice())
    }
}
