//! Page sources feeding data into the node tree.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PageError;

/// Which page to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// The page after the items currently loaded.
    Next,
    /// The page before the items currently loaded.
    Previous,
    /// A specific page. Page 0 restarts the listing, e.g. after the search
    /// pattern changed.
    Index(u32),
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => f.write_str("next"),
            Self::Previous => f.write_str("previous"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Result of a page fetch.
///
/// Mirrors the query result document: `{ "resultset": [...] }`. A missing
/// `resultset` means nothing more is available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resultset: Option<Vec<Value>>,
}

impl PageResult {
    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            resultset: Some(rows),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows received, if any result set was returned.
    pub fn len(&self) -> Option<usize> {
        self.resultset.as_ref().map(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len().unwrap_or(0) == 0
    }
}

/// Fetches more data into the node tree.
///
/// The source owns the whole fetch: it is expected to insert new nodes into
/// the tree (which notifies the managers) before resolving. Failures are
/// reported as-is; managers do not retry.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn get_page(&self, page: Page, search_pattern: String) -> Result<PageResult, PageError>;
}

/// [`PageSource`] backed by a closure returning a future.
///
/// # Example
///
/// ```
/// use filtree_lib::{FnPageSource, PageResult};
///
/// let source = FnPageSource::new(|_page, _pattern| async { Ok(PageResult::empty()) });
/// ```
pub struct FnPageSource<F> {
    f: F,
}

impl<F> FnPageSource<F> {
    pub fn new<Fut>(f: F) -> Self
    where
        F: Fn(Page, String) -> Fut + Send + Sync,
        Fut: Future<Output = Result<PageResult, PageError>> + Send,
    {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> PageSource for FnPageSource<F>
where
    F: Fn(Page, String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageResult, PageError>> + Send,
{
    async fn get_page(&self, page: Page, search_pattern: String) -> Result<PageResult, PageError> {
        (self.f)(page, search_pattern).await
    }
}

impl<F> fmt::Debug for FnPageSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnPageSource")
    }
}
