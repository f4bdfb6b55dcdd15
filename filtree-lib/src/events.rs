//! Typed events and listener registration.
//!
//! Two sources emit events: the [`Node`] tree and presentation nodes. Each
//! source has its own event enum and a listener trait with one method per
//! variant. Sources keep their listeners in a [`ListenerSet`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::node::Node;

/// Handle returned by [`ListenerSet::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

// =============================================================================
// Node events
// =============================================================================

/// Events emitted by the data tree.
#[derive(Debug, Clone)]
pub enum NodeEvent {
    /// A child was appended to the emitting node.
    ChildAdded(Node),
    /// The selection of the tree changed. Carries the root node.
    SelectionChanged(Node),
    /// The selection state of the emitting node changed.
    Selection(Node),
}

impl NodeEvent {
    /// Route this event to the matching listener method.
    pub fn dispatch(&self, listener: &dyn NodeListener) {
        match self {
            Self::ChildAdded(child) => listener.on_child_added(child),
            Self::SelectionChanged(root) => listener.on_selection_changed(root),
            Self::Selection(node) => listener.on_selection(node),
        }
    }
}

/// Receives [`NodeEvent`]s.
pub trait NodeListener: Send + Sync {
    /// A child node was added.
    fn on_child_added(&self, child: &Node);

    /// The tree-wide selection changed.
    fn on_selection_changed(&self, root: &Node);

    /// A single node's selection changed.
    fn on_selection(&self, node: &Node);
}

// =============================================================================
// View events
// =============================================================================

/// Events emitted by presentation nodes in response to user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The search box text changed.
    Filter(String),
    /// The scrollable container reached its top edge.
    ScrollReachedTop,
    /// The scrollable container reached its bottom edge.
    ScrollReachedBottom,
    /// The user toggled the node's selection.
    Toggle,
}

impl ViewEvent {
    /// Route this event to the matching listener method.
    pub fn dispatch(&self, listener: &dyn ViewListener) {
        match self {
            Self::Filter(text) => listener.on_filter(text),
            Self::ScrollReachedTop => listener.on_scroll_reached_top(),
            Self::ScrollReachedBottom => listener.on_scroll_reached_bottom(),
            Self::Toggle => listener.on_toggle(),
        }
    }
}

/// Receives [`ViewEvent`]s.
pub trait ViewListener: Send + Sync {
    /// The search text changed.
    fn on_filter(&self, text: &str);

    /// The container was scrolled to the top.
    fn on_scroll_reached_top(&self);

    /// The container was scrolled to the bottom.
    fn on_scroll_reached_bottom(&self);

    /// The selection was toggled.
    fn on_toggle(&self);
}

// =============================================================================
// Listener registration
// =============================================================================

/// Ordered set of listeners held by an event source.
///
/// Emitting snapshots the current listeners first, so a handler may
/// subscribe or unsubscribe while an event is being delivered.
pub struct ListenerSet<L: ?Sized> {
    entries: RwLock<Vec<(ListenerId, Arc<L>)>>,
}

impl<L: ?Sized> ListenerSet<L> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Register a listener.
    pub fn subscribe(&self, listener: Arc<L>) -> ListenerId {
        let id = ListenerId::new();
        if let Ok(mut guard) = self.entries.write() {
            guard.push((id, listener));
        }
        id
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.entries
            .write()
            .map(|mut guard| {
                let before = guard.len();
                guard.retain(|(entry, _)| *entry != id);
                guard.len() != before
            })
            .unwrap_or(false)
    }

    /// Remove every listener.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.entries.write() {
            guard.clear();
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Check if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<Arc<L>> {
        self.entries
            .read()
            .map(|g| g.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default()
    }
}

impl ListenerSet<dyn NodeListener> {
    /// Deliver an event to every listener.
    pub fn emit(&self, event: &NodeEvent) {
        for listener in self.snapshot() {
            event.dispatch(listener.as_ref());
        }
    }
}

impl ListenerSet<dyn ViewListener> {
    /// Deliver an event to every listener.
    pub fn emit(&self, event: &ViewEvent) {
        for listener in self.snapshot() {
            event.dispatch(listener.as_ref());
        }
    }
}

impl<L: ?Sized> Default for ListenerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> fmt::Debug for ListenerSet<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.len())
            .finish()
    }
}
