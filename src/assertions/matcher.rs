//! Matcher trait and the `Should` extension used inside test bodies

use std::fmt::Debug;

use super::AssertionFailure;

/// A predicate over a subject value
///
/// Implement this to add new checks. A matcher only sees the subject it is
/// handed and returns a failure describing the violation.
pub trait Matcher<T: ?Sized> {
    fn test(&self, subject: &T) -> Result<(), AssertionFailure>;
}

impl<T: ?Sized, F> Matcher<T> for F
where
    F: Fn(&T) -> Result<(), AssertionFailure>,
{
    fn test(&self, subject: &T) -> Result<(), AssertionFailure> {
        self(subject)
    }
}

/// Equality matcher
pub struct Equal<E>(E);

pub fn equal<E>(expected: E) -> Equal<E> {
    Equal(expected)
}

impl<T, E> Matcher<T> for Equal<E>
where
    T: PartialEq<E> + Debug + ?Sized,
    E: Debug,
{
    fn test(&self, subject: &T) -> Result<(), AssertionFailure> {
        if *subject == self.0 {
            Ok(())
        } else {
            Err(AssertionFailure::mismatch(&self.0, subject))
        }
    }
}

/// Inequality matcher
pub struct NotEqual<E>(E);

pub fn not_equal<E>(unexpected: E) -> NotEqual<E> {
    NotEqual(unexpected)
}

impl<T, E> Matcher<T> for NotEqual<E>
where
    T: PartialEq<E> + Debug + ?Sized,
    E: Debug,
{
    fn test(&self, subject: &T) -> Result<(), AssertionFailure> {
        if *subject != self.0 {
            Ok(())
        } else {
            Err(AssertionFailure::new(format!(
                "expected a value other than {:?}",
                self.0
            )))
        }
    }
}

/// Infix-style checks on any value
///
/// ```
/// use paramspec::assertions::{have_size, Should};
///
/// # fn body() -> paramspec::assertions::TestResult {
/// 2_i32.should_be(2)?;
/// vec![1, 2].should(have_size(2))?;
/// # Ok(())
/// # }
/// # body().unwrap();
/// ```
pub trait Should {
    fn should<M>(&self, matcher: M) -> Result<(), AssertionFailure>
    where
        M: Matcher<Self>,
    {
        matcher.test(self)
    }

    fn should_be<E>(&self, expected: E) -> Result<(), AssertionFailure>
    where
        Self: PartialEq<E> + Debug,
        E: Debug,
    {
        equal(expected).test(self)
    }

    fn should_not_be<E>(&self, unexpected: E) -> Result<(), AssertionFailure>
    where
        Self: PartialEq<E> + Debug,
        E: Debug,
    {
        not_equal(unexpected).test(self)
    }
}

impl<T: ?Sized> Should for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_be() {
        assert!(5_i32.should_be(5).is_ok());

        let failure = String::from("world").should_be("hello").unwrap_err();
        assert_eq!(failure.message, "expected \"hello\" but was \"world\"");
    }

    #[test]
    fn test_should_not_be() {
        assert!(1_i32.should_not_be(2).is_ok());
        assert!(1_i32.should_not_be(1).is_err());
    }

    #[test]
    fn test_closure_matcher() {
        let even = |n: &i32| {
            if n % 2 == 0 {
                Ok(())
            } else {
                Err(AssertionFailure::new(format!("{n} is odd")))
            }
        };

        assert!(4_i32.should(even).is_ok());
        assert_eq!(3_i32.should(even).unwrap_err().message, "3 is odd");
    }
}
