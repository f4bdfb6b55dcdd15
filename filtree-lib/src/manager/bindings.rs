//! Wiring between a manager and its event sources.

use std::sync::{Arc, Weak};

use crate::error::FilterError;
use crate::events::{NodeListener, ViewListener};
use crate::node::Node;
use crate::task;

use super::{Manager, ManagerInner};

/// Listener registered on a manager's node and view.
///
/// Holds the manager weakly so that registrations never keep a dropped
/// manager alive.
struct Binding {
    manager: Weak<ManagerInner>,
}

impl Binding {
    fn manager(&self) -> Option<Manager> {
        self.manager
            .upgrade()
            .map(|inner| Manager { inner })
            .filter(|m| !m.is_closed())
    }
}

impl NodeListener for Binding {
    fn on_child_added(&self, child: &Node) {
        if let Some(manager) = self.manager() {
            manager.on_new_data(child);
        }
    }

    fn on_selection_changed(&self, _root: &Node) {
        if let Some(manager) = self.manager() {
            manager.on_apply();
        }
    }

    fn on_selection(&self, node: &Node) {
        if let Some(manager) = self.manager() {
            manager.sort_siblings(node);
        }
    }
}

impl ViewListener for Binding {
    fn on_filter(&self, text: &str) {
        if let Some(manager) = self.manager() {
            manager.inner.filter_throttle.call(text.to_string());
        }
    }

    fn on_scroll_reached_top(&self) {
        if let Some(manager) = self.manager()
            && manager.inner.scroll_top_throttle.try_fire()
        {
            let request = manager.get_previous_page();
            task::spawn_detached(async move {
                if let Err(e) = request.await {
                    log::debug!("Previous page request failed: {}", e);
                }
            });
        }
    }

    fn on_scroll_reached_bottom(&self) {
        if let Some(manager) = self.manager()
            && manager.inner.scroll_bottom_throttle.try_fire()
        {
            let request = manager.get_next_page();
            task::spawn_detached(async move {
                if let Err(e) = request.await {
                    log::debug!("Next page request failed: {}", e);
                }
            });
        }
    }

    fn on_toggle(&self) {
        if let Some(manager) = self.manager() {
            manager.inner.controller.toggle(manager.model());
        }
    }
}

impl Manager {
    /// Subscribe this manager to its node and its view.
    ///
    /// Fails when the manager has no view.
    pub(crate) fn apply_bindings(&self) -> Result<(), FilterError> {
        let view = self.require_view()?;
        let binding = Arc::new(Binding {
            manager: Arc::downgrade(&self.inner),
        });

        let node_listener = self.inner.model.subscribe(binding.clone());
        let view_listener = view.subscribe(binding);

        if let Ok(mut guard) = self.inner.state.write() {
            guard.node_listener = Some(node_listener);
            guard.view_listener = Some(view_listener);
        }
        Ok(())
    }
}
