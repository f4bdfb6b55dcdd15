//! Text filtering and visibility propagation.

use crate::matcher::{Matcher, contains_ignore_case};
use crate::page::Page;
use crate::task;

use super::Manager;

impl Manager {
    /// Decide visibility of this subtree against `text`.
    ///
    /// Each node is matched on `prefix` followed by its label. Children are
    /// processed first and a group matches if any child does, so a group
    /// without children never matches; a leaf matches an empty `text`
    /// unconditionally. Every visited node's
    /// visibility is set to its match result, which is returned.
    pub fn filter(&self, text: &str, prefix: &str, matcher: Option<&Matcher>) -> bool {
        let full_string = format!("{}{}", prefix, self.inner.model.label());

        let is_match = if self.inner.model.has_children() {
            let mut any = false;
            for child in &self.children() {
                let child_match = child.filter(text, &full_string, matcher);
                child.model().set_visibility(child_match);
                any |= child_match;
            }
            any
        } else if text.is_empty() {
            true
        } else {
            let is_match = match matcher {
                Some(matcher) => matcher.matches(&full_string, text),
                None => contains_ignore_case(&full_string, text),
            };
            log::debug!("fullstring {} match to {}: {}", full_string, text, is_match);
            is_match
        };

        self.inner.model.set_visibility(is_match);
        is_match
    }

    /// React to new search text.
    ///
    /// Does nothing if `text` is already the active pattern. Otherwise stores
    /// it on the root node and filters this subtree. With server-side search,
    /// page 0 is also requested for the new pattern and the filter runs again
    /// once it arrives, unless the pattern changed in the meantime. The fetch
    /// runs on the current tokio runtime; without one it is skipped and only
    /// the local filter is applied.
    pub fn on_filter_change(&self, text: &str) {
        if self.is_closed() {
            return;
        }
        let root = self.inner.model.root();
        if root.search_pattern() == text {
            return;
        }
        root.set_search_pattern(text);

        if self.inner.configuration.search.server_side {
            let manager = self.clone();
            let pattern = text.to_string();
            let request = self.request_page(Page::Index(0), pattern.clone());
            task::spawn_detached(async move {
                if let Err(e) = request.await {
                    log::debug!("Search page request failed: {}", e);
                }
                if manager.is_closed() || manager.model().search_pattern() != pattern {
                    return;
                }
                manager.apply_filter(&pattern);
            });
        }

        self.apply_filter(text);
    }

    /// Refresh visibility after a selection change.
    ///
    /// Clears the search pattern; a no-op when it is already empty.
    pub fn on_apply(&self) {
        self.on_filter_change("");
    }

    fn apply_filter(&self, text: &str) {
        let matcher = self.inner.configuration.search.matcher.clone();
        self.filter(text, "", matcher.as_ref());
        self.inner.model.root().set_visibility(true);
    }
}
