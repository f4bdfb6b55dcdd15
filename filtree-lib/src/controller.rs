//! Behaviour shared by every view of a manager tree.
//!
//! The root manager creates one controller; every descendant manager binds
//! the same instance to its own view. The controller therefore lives as long
//! as the tree and must not keep per-view state beyond what it drops in
//! [`Controller::unbind_view`].

use std::collections::HashMap;
use std::sync::RwLock;

use crate::node::{Node, NodeId, SelectionState};
use crate::view::{PresentationNode, SurfaceId};

/// Strategy reacting to user actions on views.
pub trait Controller: Send + Sync {
    /// Attach to a newly created view.
    fn bind_to_view(&self, model: &Node, view: &dyn PresentationNode);

    /// Detach from a view that is being closed.
    fn unbind_view(&self, view: SurfaceId);

    /// The user toggled the selection of `model`.
    fn toggle(&self, model: &Node);
}

/// Default controller with tri-state selection.
///
/// Toggling selects a node and its whole subtree (or clears it when already
/// fully selected), then recomputes every ancestor.
#[derive(Debug, Default)]
pub struct SelectionController {
    bound: RwLock<HashMap<SurfaceId, NodeId>>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of views currently bound.
    pub fn bound_views(&self) -> usize {
        self.bound.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Node id bound to a view, if any.
    pub fn bound_model(&self, view: SurfaceId) -> Option<NodeId> {
        self.bound.read().ok().and_then(|g| g.get(&view).cloned())
    }

    fn set_subtree(node: &Node, selection: SelectionState) {
        node.set_selection(selection);
        for child in node.children().unwrap_or_default() {
            Self::set_subtree(&child, selection);
        }
    }

    /// Aggregate the selection of a node's children.
    fn aggregate(children: &[Node]) -> SelectionState {
        if children.is_empty() {
            return SelectionState::None;
        }
        if children.iter().all(|c| c.selection() == SelectionState::All) {
            SelectionState::All
        } else if children.iter().all(|c| c.selection() == SelectionState::None) {
            SelectionState::None
        } else {
            SelectionState::Some
        }
    }
}

impl Controller for SelectionController {
    fn bind_to_view(&self, model: &Node, view: &dyn PresentationNode) {
        if let Ok(mut guard) = self.bound.write() {
            guard.insert(view.surface(), model.id());
        }
        log::debug!("Controller bound to view {} of {}", view.surface(), model.id());
    }

    fn unbind_view(&self, view: SurfaceId) {
        if let Ok(mut guard) = self.bound.write() {
            guard.remove(&view);
        }
    }

    fn toggle(&self, model: &Node) {
        let selection = match model.selection() {
            SelectionState::All => SelectionState::None,
            SelectionState::Some | SelectionState::None => SelectionState::All,
        };
        log::debug!("Toggling {} to {:?}", model.label(), selection);
        Self::set_subtree(model, selection);

        let mut current = model.parent();
        while let Some(ancestor) = current {
            let children = ancestor.children().unwrap_or_default();
            ancestor.set_selection(Self::aggregate(&children));
            current = ancestor.parent();
        }

        model.notify_selection_changed();
    }
}
