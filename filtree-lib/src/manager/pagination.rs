//! Page requests.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use futures::FutureExt;
use futures::future::{self, BoxFuture};

use crate::error::FilterError;
use crate::page::{Page, PageResult};

use super::{Manager, ManagerInner};

/// Clears the in-flight flag when the request completes or is dropped.
struct InFlight(Arc<ManagerInner>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::SeqCst);
    }
}

/// Outcome of a page request: `None` when no request was made.
pub type PageRequest = BoxFuture<'static, Result<Option<PageResult>, FilterError>>;

impl Manager {
    /// Request the next page, anchoring on the second-to-last visible child.
    ///
    /// The anchor is recorded before this returns; the fetch itself runs
    /// when the returned future is polled.
    pub fn get_next_page(&self) -> PageRequest {
        let visible = self.visible_sorted_children();
        let anchor = visible.iter().rev().take(2).last();
        self.set_previous_position(anchor);
        self.get_page(Page::Next)
    }

    /// Request the previous page, anchoring on the second visible child.
    pub fn get_previous_page(&self) -> PageRequest {
        let visible = self.visible_sorted_children();
        self.set_previous_position(visible.get(1));
        self.get_page(Page::Previous)
    }

    /// Request `page` for the active search pattern.
    pub fn get_page(&self, page: Page) -> PageRequest {
        log::debug!(
            "Item {} requested page {}",
            self.inner.model.label(),
            page
        );
        self.request_page(page, self.inner.model.search_pattern())
    }

    /// Fetch `page` from the configured page source.
    ///
    /// Resolves to `Ok(None)` without fetching when no page source is
    /// configured, or when a next/previous request from this manager is
    /// still pending.
    pub fn request_page(&self, page: Page, search_pattern: String) -> PageRequest {
        let Some(source) = self.inner.configuration.pagination.page_source.clone() else {
            log::debug!("No page source configured, ignoring request for page {}", page);
            return future::ready(Ok(None)).boxed();
        };

        let tracked = matches!(page, Page::Next | Page::Previous);
        if tracked && self.inner.in_flight.swap(true, Ordering::SeqCst) {
            log::debug!("Page {} skipped, a request is already in flight", page);
            return future::ready(Ok(None)).boxed();
        }

        let guard = tracked.then(|| InFlight(Arc::clone(&self.inner)));
        async move {
            let result = source.get_page(page, search_pattern).await;
            drop(guard);
            match result {
                Ok(result) => {
                    match result.len() {
                        Some(count) => log::debug!("getPage: got {} more items", count),
                        None => log::debug!("getPage: no more items"),
                    }
                    Ok(Some(result))
                }
                Err(e) => Err(FilterError::from(e)),
            }
        }
        .boxed()
    }

    /// Check if a next/previous request is pending.
    pub fn is_loading(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    fn visible_sorted_children(&self) -> Vec<Manager> {
        self.sort_children(self.children())
            .into_iter()
            .filter(|child| child.model().is_visible())
            .collect()
    }

    fn set_previous_position(&self, anchor: Option<&Manager>) {
        let surface = anchor.and_then(Manager::view).map(|view| view.surface());
        if let Ok(mut guard) = self.inner.state.write() {
            guard.previous_position = surface;
        }
    }
}
