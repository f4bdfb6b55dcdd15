//! Presentation nodes.
//!
//! Every manager owns exactly one presentation node. Views come in a closed
//! set of kinds and are produced through a [`ViewRegistry`] handed to the
//! root manager.

mod memory;
mod registry;

pub use memory::MemoryView;
pub use registry::{ViewContext, ViewFactory, ViewRegistry};

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::events::{ListenerId, ViewListener};

/// Kind of presentation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// The top of the tree: search box and scrollable container.
    Root,
    /// A group that renders child views.
    Branch,
    /// A selectable item without children.
    Leaf,
}

/// Identifier of a rendered surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__surface_{}", self.0)
    }
}

/// Where a new view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// The root mount point supplied by the caller.
    Mount { target: String, surface: SurfaceId },
    /// A slot inside a parent view's children container.
    Child { parent: SurfaceId, surface: SurfaceId },
}

impl Slot {
    pub fn mount(target: impl Into<String>) -> Self {
        Self::Mount {
            target: target.into(),
            surface: SurfaceId::new(),
        }
    }

    /// The surface the view rendering into this slot should use.
    pub fn surface(&self) -> SurfaceId {
        match self {
            Self::Mount { surface, .. } | Self::Child { surface, .. } => *surface,
        }
    }
}

/// A renderable surface owned by one manager.
pub trait PresentationNode: Send + Sync + fmt::Debug {
    fn kind(&self) -> ViewKind;

    /// The surface this view renders into.
    fn surface(&self) -> SurfaceId;

    /// Allocate a slot for a child view at the end of the children container.
    fn create_child_slot(&self) -> Slot;

    /// Append a child surface to the children container.
    fn append_child(&self, surface: SurfaceId);

    /// Remove a child surface from the children container.
    /// Returns the surface if it was attached.
    fn detach_child(&self, surface: SurfaceId) -> Option<SurfaceId>;

    /// Child surfaces in container order.
    fn child_surfaces(&self) -> Vec<SurfaceId>;

    /// Hide or reveal the children container.
    fn set_children_hidden(&self, hidden: bool);

    /// Recompute the scroll bar after the content changed.
    fn update_scroll_bar(&self);

    fn has_scroll_bar(&self) -> bool;

    /// Scroll so that `surface` is in view.
    fn set_scroll_bar_at(&self, surface: SurfaceId);

    fn subscribe(&self, listener: Arc<dyn ViewListener>) -> ListenerId;

    fn unsubscribe(&self, id: ListenerId) -> bool;

    /// Release the surface. Closed views emit no further events.
    fn close(&self);

    fn is_closed(&self) -> bool;
}
