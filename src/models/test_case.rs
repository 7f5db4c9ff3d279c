//! Test case declarations and their execution parameters

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::assertions::TestResult;

/// Executable body of a test case, shared by every worker running it
pub type TestBody = Arc<dyn Fn() -> TestResult + Send + Sync + 'static>;

/// Execution parameters for a single test case
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Number of times the body is executed
    pub invocations: u32,
    /// Number of concurrent workers sharing the invocations
    pub threads: u32,
    /// Bound on the whole invocation set; `None` uses the runner default
    #[serde(with = "optional_millis")]
    pub timeout: Option<Duration>,
    pub ignored: bool,
    pub tag: Option<String>,
    pub tags: BTreeSet<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            invocations: 1,
            threads: 1,
            timeout: None,
            ignored: false,
            tag: None,
            tags: BTreeSet::new(),
        }
    }
}

impl TestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(mut self, invocations: u32) -> Self {
        self.invocations = invocations;
        self
    }

    pub fn threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn ignored(mut self, ignored: bool) -> Self {
        self.ignored = ignored;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Declared tags with the single-tag shorthand unioned in
    pub fn all_tags(&self) -> BTreeSet<String> {
        let mut tags = self.tags.clone();
        if let Some(tag) = &self.tag {
            tags.insert(tag.clone());
        }
        tags
    }

    /// Timeout for this test, falling back to the runner-wide default
    pub fn effective_timeout(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }
}

/// A named, immutable test declaration
#[derive(Clone)]
pub struct TestCase {
    name: String,
    body: TestBody,
    config: TestConfig,
}

impl TestCase {
    pub fn new<F>(name: impl Into<String>, config: TestConfig, body: F) -> Self
    where
        F: Fn() -> TestResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    pub fn body(&self) -> TestBody {
        Arc::clone(&self.body)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        let config = &self.config;
        if config.invocations > 1 || config.threads > 1 {
            write!(
                f,
                " (invocations={}, threads={})",
                config.invocations, config.threads
            )?;
        }
        Ok(())
    }
}

mod optional_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
