//! Ordering of child views.

use crate::node::Node;
use crate::sort::{Sorter, composite_sort};
use crate::view::SurfaceId;

use super::Manager;

impl Manager {
    /// Sorters configured for this manager's children, most-significant
    /// first.
    ///
    /// The chain is looked up by the view kind of the first child. Empty
    /// when there are no children or nothing is configured.
    pub fn get_sorters(&self) -> Vec<Sorter> {
        self.children()
            .first()
            .and_then(Manager::view)
            .map(|view| {
                self.inner
                    .configuration
                    .branch(view.kind())
                    .sorters
                    .clone()
            })
            .unwrap_or_default()
    }

    /// Order child managers by the configured sorter chain.
    pub fn sort_children(&self, children: Vec<Manager>) -> Vec<Manager> {
        composite_sort(children, &self.get_sorters(), Manager::model)
    }

    /// Re-append every child surface in sorted order.
    ///
    /// The children container is hidden while surfaces are moved.
    pub fn render_sorted_children(&self) {
        let children = self.children();
        if children.is_empty() {
            return;
        }
        let Some(view) = self.view() else {
            return;
        };

        view.set_children_hidden(true);
        let detached: Vec<(Manager, SurfaceId)> = children
            .into_iter()
            .filter_map(|child| {
                let surface = child.view()?.surface();
                view.detach_child(surface);
                Some((child, surface))
            })
            .collect();

        let sorters = self.get_sorters();
        for (_, surface) in composite_sort(detached, &sorters, |(child, _)| child.model()) {
            view.append_child(surface);
        }
        view.set_children_hidden(false);
    }

    /// Ask the parent to re-sort when this manager's node changed selection.
    pub fn sort_siblings(&self, node: &Node) {
        log::debug!(
            "sort_siblings: {} was triggered from {}:{:?}",
            self.inner.model.label(),
            node.label(),
            node.selection()
        );
        if !self.inner.model.ptr_eq(node) {
            return;
        }
        if let Some(parent) = self.parent() {
            parent.render_sorted_children();
        }
    }
}
