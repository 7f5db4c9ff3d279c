//! Tag filter
//!
//! Inclusion-list policy derived once from a comma-separated tag list. When a
//! filter is active, only tests whose tags intersect it are admitted; untagged
//! tests are skipped.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::RunnerConfig;

/// Active tag restriction for one run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagFilter {
    active: Option<BTreeSet<String>>,
}

impl TagFilter {
    /// Filter that admits every test
    pub fn none() -> Self {
        Self { active: None }
    }

    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: BTreeSet<String> = tags.into_iter().map(Into::into).collect();
        if tags.is_empty() {
            Self::none()
        } else {
            Self { active: Some(tags) }
        }
    }

    /// Parse a comma-separated list; blank entries are dropped and a blank
    /// list means no restriction
    pub fn parse(source: &str) -> Self {
        Self::new(
            source
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty()),
        )
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        config
            .tags
            .as_deref()
            .map(Self::parse)
            .unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_tags(&self) -> Option<&BTreeSet<String>> {
        self.active.as_ref()
    }

    /// Decide whether a test with `test_tags` runs under this filter
    pub fn admits(&self, test_tags: &BTreeSet<String>) -> bool {
        match &self.active {
            None => true,
            Some(active) => !active.is_disjoint(test_tags),
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.active {
            None => write!(f, "<all>"),
            Some(tags) => {
                let joined: Vec<&str> = tags.iter().map(String::as_str).collect();
                write!(f, "{}", joined.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_filter_admits_everything() {
        let filter = TagFilter::none();
        assert!(filter.admits(&tags(&[])));
        assert!(filter.admits(&tags(&["anything"])));
    }

    #[test]
    fn test_intersection_semantics() {
        let filter = TagFilter::parse("foo");
        assert!(filter.admits(&tags(&["foo", "boo"])));
        assert!(!filter.admits(&tags(&["bar"])));
        assert!(!filter.admits(&tags(&[])));
    }

    #[test]
    fn test_parse_trims_and_drops_blanks() {
        let filter = TagFilter::parse(" bibble, fibble ,,foo ");
        assert_eq!(filter.active_tags(), Some(&tags(&["bibble", "fibble", "foo"])));
        assert_eq!(filter.to_string(), "bibble,fibble,foo");
    }

    #[test]
    fn test_blank_source_is_no_filter() {
        assert!(!TagFilter::parse("").is_active());
        assert!(!TagFilter::parse(" , ").is_active());
    }

    #[test]
    fn test_from_config() {
        let config = RunnerConfig {
            tags: Some("slow,db".to_string()),
            ..Default::default()
        };
        let filter = TagFilter::from_config(&config);
        assert!(filter.admits(&tags(&["db"])));

        assert!(!TagFilter::from_config(&RunnerConfig::default()).is_active());
    }
}
