//! Built-in self-check suite
//!
//! Exercises every execution parameter: plain assertions, repeated
//! invocations, ignored tests, tag filtering and a wide concurrent test. The
//! after-all hook verifies the shared counters the bodies touched.

use paramspec::assertions::{be_empty, contain, have_size, Should};
use paramspec::{Suite, SuiteError, TestConfig};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Minimal LIFO stack checked by the first two tests
#[derive(Debug, Default)]
struct ListStack<T> {
    items: Vec<T>,
}

impl<T: Clone> ListStack<T> {
    fn push(&mut self, item: T) {
        self.items.push(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    fn peek(&self) -> Option<T> {
        self.items.last().cloned()
    }

    fn size(&self) -> usize {
        self.items.len()
    }
}

#[derive(Default)]
struct Counters {
    invocations: AtomicU32,
    threads: AtomicU32,
    single_tag: AtomicBool,
    multi_tag: AtomicBool,
}

pub fn suite() -> Result<Suite, SuiteError> {
    let counters = Arc::new(Counters::default());
    let (inv, thr, single, multi, check) = (
        Arc::clone(&counters),
        Arc::clone(&counters),
        Arc::clone(&counters),
        Arc::clone(&counters),
        Arc::clone(&counters),
    );

    Suite::builder("self-check")
        .test("ListStack.pop should remove the last element from stack", || {
            let mut stack = ListStack::default();
            stack.push("hello");
            stack.push("world");
            stack.size().should_be(2)?;
            stack.pop().should_be(Some("world"))?;
            stack.size().should_be(1)?;
            Ok(())
        })
        .test("ListStack.peek should leave the stack unmodified", || {
            let mut stack = ListStack::default();
            stack.push("hello");
            stack.push("world");
            stack.size().should_be(2)?;
            stack.peek().should_be(Some("world"))?;
            stack.size().should_be(2)?;
            Ok(())
        })
        .test("collection matchers", || {
            let empty: Vec<u8> = Vec::new();
            empty.should(be_empty())?;
            vec![1, 2, 3].should(have_size(3))?;
            vec!["a", "b"].should(contain("b"))?;
            Ok(())
        })
        .test_with(
            "support invocation parameter",
            TestConfig::new().invocations(5),
            move || {
                inv.invocations.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        )
        .test_with(
            "support ignored",
            TestConfig::new().ignored(true),
            || std::process::exit(1),
        )
        .test_with("support single tag", TestConfig::new().tag("foo"), move || {
            single.single_tag.store(true, Ordering::SeqCst);
            Ok(())
        })
        .test_with(
            "support multiple tags",
            TestConfig::new().tags(["foo", "boo"]),
            move || {
                multi.multi_tag.store(true, Ordering::SeqCst);
                Ok(())
            },
        )
        .test_with(
            "support threads parameter",
            TestConfig::new()
                .threads(100)
                .invocations(100)
                .timeout(Duration::from_secs(10)),
            move || {
                std::thread::sleep(Duration::from_millis(1000));
                thr.threads.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        )
        .after_all(move || {
            let invocations = check.invocations.load(Ordering::SeqCst);
            if invocations != 5 {
                anyhow::bail!("expected 5 invocations, counted {invocations}");
            }
            let threads = check.threads.load(Ordering::SeqCst);
            if threads != 100 {
                anyhow::bail!("expected 100 threaded invocations, counted {threads}");
            }
            if !check.single_tag.load(Ordering::SeqCst) {
                anyhow::bail!("single tag test did not run");
            }
            if !check.multi_tag.load(Ordering::SeqCst) {
                anyhow::bail!("multiple tag test did not run");
            }
            Ok(())
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramspec::{SkipReason, SuiteRunner, TagFilter, TestStatus};

    #[test]
    fn test_suite_builds() {
        let suite = suite().unwrap();
        assert_eq!(suite.len(), 8);
        assert!(suite.after_all().is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_self_check_passes() {
        let filtered = suite().unwrap();
        let mut runner = SuiteRunner::new(
            TagFilter::parse("bibble,fibble,foo"),
            Duration::from_secs(5),
        );
        let report = runner.run(&filtered).await;

        assert_eq!(
            report
                .get("support ignored")
                .and_then(|t| t.skipped_reason),
            Some(SkipReason::Ignored)
        );
        assert_eq!(
            report.get("support single tag").map(|t| t.status),
            Some(TestStatus::Passed)
        );
        // untagged tests are excluded once a filter is active, so the hook sees no counts
        assert!(report.callback_error.is_some());

        let mut unfiltered = SuiteRunner::new(TagFilter::none(), Duration::from_secs(5));
        let report = unfiltered.run(&suite().unwrap()).await;
        assert!(report.is_success(), "{report}");
    }
}
