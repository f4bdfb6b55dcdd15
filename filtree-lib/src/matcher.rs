//! Text matchers used by the filter.

use std::fmt;
use std::sync::Arc;

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Utf32Str};

/// Predicate deciding whether a candidate string matches the query.
///
/// Called as `matches(candidate, query)`.
#[derive(Clone)]
pub struct Matcher {
    inner: Arc<dyn Fn(&str, &str) -> bool + Send + Sync>,
}

impl Matcher {
    /// Wrap a custom predicate.
    pub fn new(f: impl Fn(&str, &str) -> bool + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    /// Case-insensitive substring containment. This is what the filter does
    /// when no matcher is configured.
    pub fn substring() -> Self {
        Self::new(contains_ignore_case)
    }

    /// Fuzzy matching with nucleo-matcher.
    pub fn fuzzy() -> Self {
        Self::new(fuzzy_match)
    }

    pub fn matches(&self, candidate: &str, query: &str) -> bool {
        (self.inner)(candidate, query)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Matcher")
    }
}

/// Check if `query` occurs in `candidate`, ignoring case.
pub fn contains_ignore_case(candidate: &str, query: &str) -> bool {
    candidate.to_lowercase().contains(&query.to_lowercase())
}

/// Check if `query` fuzzy-matches `candidate`. An empty query matches.
pub fn fuzzy_match(candidate: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let mut matcher = nucleo_matcher::Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );
    let mut buf = Vec::new();
    let haystack = Utf32Str::new(candidate, &mut buf);
    pattern.score(haystack, &mut matcher).is_some()
}
