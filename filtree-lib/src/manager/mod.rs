//! Manager tree.
//!
//! One [`Manager`] exists per node of the data tree. Each manager owns the
//! presentation node for its data node, shares the tree's controller, and
//! keeps its children in sync with the data node's children.

mod bindings;
mod filter;
mod pagination;
mod sorting;

pub use pagination::PageRequest;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};

use crate::config::Configuration;
use crate::controller::{Controller, SelectionController};
use crate::error::FilterError;
use crate::events::ListenerId;
use crate::node::Node;
use crate::throttle::{LeadingThrottle, TrailingThrottle};
use crate::view::{PresentationNode, Slot, SurfaceId, ViewContext, ViewKind, ViewRegistry};

pub(crate) struct ManagerInner {
    model: Node,
    parent: Weak<ManagerInner>,
    configuration: Arc<Configuration>,
    registry: Arc<ViewRegistry>,
    controller: Arc<dyn Controller>,
    state: RwLock<ManagerState>,
    scroll_top_throttle: LeadingThrottle,
    scroll_bottom_throttle: LeadingThrottle,
    filter_throttle: TrailingThrottle<String>,
    /// Set while a next/previous page request is pending.
    in_flight: AtomicBool,
    closed: AtomicBool,
}

#[derive(Default)]
struct ManagerState {
    view: Option<Arc<dyn PresentationNode>>,
    children: Vec<Manager>,
    /// Surface to scroll back to once a requested page has been rendered.
    previous_position: Option<SurfaceId>,
    node_listener: Option<ListenerId>,
    view_listener: Option<ListenerId>,
}

/// Controller mirroring one node of the data tree.
///
/// Cloning is cheap and yields a handle to the same manager.
///
/// # Example
///
/// ```
/// use filtree_lib::{Configuration, Manager, Node, ViewRegistry};
///
/// let root = Node::group("root", "Root");
/// let fruit = Node::group("fruit", "Fruit");
/// fruit.add_child(Node::item("apple", "apple"));
/// root.add_child(fruit);
///
/// let manager = Manager::new(root, Configuration::default(), ViewRegistry::headless()).unwrap();
/// assert_eq!(manager.subtree_len(), 3);
/// ```
#[derive(Clone)]
pub struct Manager {
    inner: Arc<ManagerInner>,
}

impl Manager {
    /// Build the manager tree for a root node.
    ///
    /// Creates the root view at the configured mount target, a fresh
    /// controller, and one manager per descendant node.
    pub fn new(
        model: Node,
        configuration: Configuration,
        registry: ViewRegistry,
    ) -> Result<Self, FilterError> {
        Self::build(model, None, Arc::new(configuration), Arc::new(registry), None)
    }

    /// Build the manager tree for a root node using an existing root view.
    pub fn with_view(
        model: Node,
        configuration: Configuration,
        registry: ViewRegistry,
        view: Arc<dyn PresentationNode>,
    ) -> Result<Self, FilterError> {
        Self::build(
            model,
            None,
            Arc::new(configuration),
            Arc::new(registry),
            Some(view),
        )
    }

    fn build(
        model: Node,
        parent: Option<&Manager>,
        configuration: Arc<Configuration>,
        registry: Arc<ViewRegistry>,
        view: Option<Arc<dyn PresentationNode>>,
    ) -> Result<Self, FilterError> {
        let (view, controller) = match parent {
            Some(parent) => {
                let parent_view = parent.require_view()?;
                let controller = Arc::clone(&parent.inner.controller);
                let view = match view {
                    Some(view) => view,
                    None => {
                        let kind = configuration
                            .branch(parent_view.kind())
                            .child_config
                            .kind_for(model.has_children());
                        registry.create(ViewContext {
                            kind,
                            model: model.clone(),
                            slot: parent_view.create_child_slot(),
                        })?
                    }
                };
                (view, controller)
            }
            None => {
                let view = match view {
                    Some(view) => view,
                    None => registry.create(ViewContext {
                        kind: ViewKind::Root,
                        model: model.clone(),
                        slot: Slot::mount(configuration.target.clone()),
                    })?,
                };
                let controller = match &configuration.controller {
                    Some(factory) => factory(),
                    None => Arc::new(SelectionController::new()) as Arc<dyn Controller>,
                };
                (view, controller)
            }
        };

        controller.bind_to_view(&model, view.as_ref());
        log::debug!(
            "View and controller ready for {} : {}",
            model.id(),
            model.label()
        );

        let scroll_window = configuration.pagination.throttle;
        let filter_window = configuration.search.throttle;
        let inner = Arc::new_cyclic(|weak: &Weak<ManagerInner>| {
            let target = weak.clone();
            ManagerInner {
                model,
                parent: parent.map(|p| Arc::downgrade(&p.inner)).unwrap_or_default(),
                configuration,
                registry,
                controller,
                state: RwLock::new(ManagerState {
                    view: Some(view),
                    ..Default::default()
                }),
                scroll_top_throttle: LeadingThrottle::new(scroll_window),
                scroll_bottom_throttle: LeadingThrottle::new(scroll_window),
                filter_throttle: TrailingThrottle::new(filter_window, move |text: String| {
                    if let Some(inner) = target.upgrade() {
                        Manager { inner }.on_filter_change(&text);
                    }
                }),
                in_flight: AtomicBool::new(false),
                closed: AtomicBool::new(false),
            }
        });

        let manager = Self { inner };
        manager.apply_bindings()?;
        manager.update_children()?;
        Ok(manager)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The data node this manager mirrors.
    pub fn model(&self) -> &Node {
        &self.inner.model
    }

    /// The presentation node, until the manager is closed.
    pub fn view(&self) -> Option<Arc<dyn PresentationNode>> {
        self.inner.state.read().ok().and_then(|g| g.view.clone())
    }

    /// Configuration shared by the whole tree.
    pub fn configuration(&self) -> &Configuration {
        &self.inner.configuration
    }

    /// Controller shared by the whole tree.
    pub fn controller(&self) -> Arc<dyn Controller> {
        Arc::clone(&self.inner.controller)
    }

    /// The parent manager, `None` for the root.
    pub fn parent(&self) -> Option<Manager> {
        self.inner.parent.upgrade().map(|inner| Manager { inner })
    }

    /// Check if this manager has no parent.
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Child managers in the order they were created.
    pub fn children(&self) -> Vec<Manager> {
        self.inner
            .state
            .read()
            .map(|g| g.children.clone())
            .unwrap_or_default()
    }

    /// Child managers in the order their surfaces appear in the view.
    pub fn rendered_children(&self) -> Vec<Manager> {
        let Some(view) = self.view() else {
            return Vec::new();
        };
        let children = self.children();
        view.child_surfaces()
            .into_iter()
            .filter_map(|surface| {
                children
                    .iter()
                    .find(|c| c.view().is_some_and(|v| v.surface() == surface))
                    .cloned()
            })
            .collect()
    }

    /// Number of managers in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(Manager::subtree_len)
            .sum::<usize>()
    }

    /// Anchor recorded by the last page request.
    pub fn previous_position(&self) -> Option<SurfaceId> {
        self.inner.state.read().ok().and_then(|g| g.previous_position)
    }

    /// Check if [`Manager::close`] was called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Check if both handles refer to the same manager.
    pub fn ptr_eq(&self, other: &Manager) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Find the manager of `model` in this subtree.
    pub fn find_by_model(&self, model: &Node) -> Option<Manager> {
        if self.inner.model.ptr_eq(model) {
            return Some(self.clone());
        }
        self.children()
            .iter()
            .find_map(|child| child.find_by_model(model))
    }

    fn require_view(&self) -> Result<Arc<dyn PresentationNode>, FilterError> {
        self.view()
            .ok_or_else(|| FilterError::missing_view(self.inner.model.id().to_string()))
    }

    // -------------------------------------------------------------------------
    // Child management
    // -------------------------------------------------------------------------

    /// Create managers for data children that have none yet, then re-render
    /// the children in sorted order.
    ///
    /// Managers whose node left the tree are kept.
    pub fn update_children(&self) -> Result<(), FilterError> {
        if self.is_closed() {
            return Ok(());
        }
        let Some(models) = self.inner.model.children() else {
            return Ok(());
        };

        for model in models {
            let known = self
                .children()
                .iter()
                .any(|child| child.model().ptr_eq(&model));
            if !known {
                log::debug!("Adding child model {}", model.label());
                self.add_child(model)?;
            }
        }

        self.render_sorted_children();
        self.require_view()?.update_scroll_bar();
        Ok(())
    }

    /// Create a manager for `model` as a child of this one.
    pub fn add_child(&self, model: Node) -> Result<Manager, FilterError> {
        let child = Self::build(
            model,
            Some(self),
            Arc::clone(&self.inner.configuration),
            Arc::clone(&self.inner.registry),
            None,
        )?;
        if let Ok(mut guard) = self.inner.state.write() {
            guard.children.push(child.clone());
        }
        Ok(child)
    }

    /// Removing managers for deleted nodes is not supported.
    pub fn remove_child(&self, _model: &Node) -> Result<(), FilterError> {
        Err(FilterError::NotImplemented("remove_child"))
    }

    /// React to a node added anywhere below this manager.
    pub fn on_new_data(&self, item: &Node) {
        log::debug!(
            "New data ({}) caught by {}",
            item.label(),
            self.inner.model.label()
        );
        let Some(parent) = item.parent() else {
            return;
        };
        if let Some(manager) = self.find_by_model(&parent)
            && let Err(e) = manager.on_update_children()
        {
            log::error!("Failed to update children of {}: {}", parent.label(), e);
        }
    }

    /// Sync children after new data arrived and scroll back to the anchor.
    pub fn on_update_children(&self) -> Result<(), FilterError> {
        log::debug!(
            "New data added to {} : updating children",
            self.inner.model.label()
        );
        self.update_children()?;
        self.restore_scroll();
        Ok(())
    }

    /// Scroll to the anchor recorded by the last page request, once.
    pub fn restore_scroll(&self) {
        let Some(view) = self.view() else {
            return;
        };
        if !view.has_scroll_bar() {
            return;
        }
        let anchor = self
            .inner
            .state
            .write()
            .ok()
            .and_then(|mut g| g.previous_position.take());
        if let Some(anchor) = anchor {
            log::debug!("Scrolling back to {}", anchor);
            view.set_scroll_bar_at(anchor);
        }
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Close this manager and its subtree.
    ///
    /// Releases the views, detaches every listener and removes the manager
    /// from its parent. A closed manager ignores all further events.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let (children, view, node_listener, view_listener) = match self.inner.state.write() {
            Ok(mut guard) => (
                std::mem::take(&mut guard.children),
                guard.view.take(),
                guard.node_listener.take(),
                guard.view_listener.take(),
            ),
            Err(_) => return,
        };

        for child in children {
            child.close();
        }

        if let Some(id) = node_listener {
            self.inner.model.unsubscribe(id);
        }
        if let Some(view) = view {
            if let Some(id) = view_listener {
                view.unsubscribe(id);
            }
            self.inner.controller.unbind_view(view.surface());
            if let Some(parent_view) = self.parent().and_then(|p| p.view()) {
                parent_view.detach_child(view.surface());
            }
            view.close();
        }

        if let Some(parent) = self.parent()
            && let Ok(mut guard) = parent.inner.state.write()
        {
            guard.children.retain(|c| !c.ptr_eq(self));
        }

        log::debug!("Closed manager of {}", self.inner.model.label());
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("model", &self.inner.model)
            .field("children", &self.children().len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
