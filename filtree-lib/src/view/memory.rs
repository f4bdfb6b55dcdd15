//! Headless presentation node.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::events::{ListenerId, ListenerSet, ViewEvent, ViewListener};

use super::{PresentationNode, Slot, SurfaceId, ViewContext, ViewKind};

#[derive(Debug, Default)]
struct MemoryInner {
    /// Children container, in display order.
    children: Vec<SurfaceId>,
    hidden: bool,
    scroll_anchor: Option<SurfaceId>,
    scroll_updates: usize,
    /// Number of hide/reveal transitions, for asserting reflows.
    reflows: usize,
}

/// In-memory presentation node.
///
/// Records container order, visibility of the children container and the
/// scroll anchor instead of drawing anything. Events are injected with
/// [`MemoryView::emit`].
#[derive(Debug)]
pub struct MemoryView {
    kind: ViewKind,
    surface: SurfaceId,
    label: String,
    inner: RwLock<MemoryInner>,
    listeners: ListenerSet<dyn ViewListener>,
    closed: AtomicBool,
}

impl MemoryView {
    pub fn new(kind: ViewKind, slot: &Slot, label: impl Into<String>) -> Self {
        Self {
            kind,
            surface: slot.surface(),
            label: label.into(),
            inner: RwLock::new(MemoryInner::default()),
            listeners: ListenerSet::new(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn from_context(context: &ViewContext) -> Self {
        Self::new(context.kind, &context.slot, context.model.label())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Deliver a user event to the listeners. Closed views stay silent.
    pub fn emit(&self, event: ViewEvent) {
        if self.is_closed() {
            return;
        }
        self.listeners.emit(&event);
    }

    pub fn is_children_hidden(&self) -> bool {
        self.inner.read().map(|g| g.hidden).unwrap_or(false)
    }

    /// Surface most recently scrolled to.
    pub fn scroll_anchor(&self) -> Option<SurfaceId> {
        self.inner.read().ok().and_then(|g| g.scroll_anchor)
    }

    pub fn scroll_updates(&self) -> usize {
        self.inner.read().map(|g| g.scroll_updates).unwrap_or(0)
    }

    pub fn reflows(&self) -> usize {
        self.inner.read().map(|g| g.reflows).unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl PresentationNode for MemoryView {
    fn kind(&self) -> ViewKind {
        self.kind
    }

    fn surface(&self) -> SurfaceId {
        self.surface
    }

    fn create_child_slot(&self) -> Slot {
        let slot = Slot::Child {
            parent: self.surface,
            surface: SurfaceId::new(),
        };
        self.append_child(slot.surface());
        slot
    }

    fn append_child(&self, surface: SurfaceId) {
        if let Ok(mut guard) = self.inner.write() {
            guard.children.retain(|s| *s != surface);
            guard.children.push(surface);
        }
    }

    fn detach_child(&self, surface: SurfaceId) -> Option<SurfaceId> {
        let mut guard = self.inner.write().ok()?;
        let index = guard.children.iter().position(|s| *s == surface)?;
        Some(guard.children.remove(index))
    }

    fn child_surfaces(&self) -> Vec<SurfaceId> {
        self.inner
            .read()
            .map(|g| g.children.clone())
            .unwrap_or_default()
    }

    fn set_children_hidden(&self, hidden: bool) {
        if let Ok(mut guard) = self.inner.write() {
            if guard.hidden != hidden {
                guard.reflows += usize::from(hidden);
            }
            guard.hidden = hidden;
        }
    }

    fn update_scroll_bar(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.scroll_updates += 1;
        }
    }

    fn has_scroll_bar(&self) -> bool {
        self.kind == ViewKind::Root
    }

    fn set_scroll_bar_at(&self, surface: SurfaceId) {
        if let Ok(mut guard) = self.inner.write() {
            guard.scroll_anchor = Some(surface);
        }
    }

    fn subscribe(&self, listener: Arc<dyn ViewListener>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.listeners.clear();
        if let Ok(mut guard) = self.inner.write() {
            guard.children.clear();
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
