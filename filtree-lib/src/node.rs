//! Data tree mirrored by the manager tree.
//!
//! Nodes are owned by whoever loads the data. Managers only observe them:
//! they read children and labels, and write visibility and selection.

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::events::{ListenerId, ListenerSet, NodeEvent, NodeListener};

/// Identifier of a node in the data tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create an id from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a random UUID v4 id.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tri-state selection of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    /// Neither the node nor any descendant is selected.
    #[default]
    None,
    /// Some descendants are selected.
    Some,
    /// The node and all its descendants are selected.
    All,
}

struct NodeInner {
    id: NodeId,
    state: RwLock<NodeState>,
    listeners: ListenerSet<dyn NodeListener>,
}

struct NodeState {
    label: String,
    parent: Weak<NodeInner>,
    /// `None` for items that can never have children.
    children: Option<Vec<Node>>,
    selection: SelectionState,
    visible: bool,
    /// Only meaningful on the root.
    search_pattern: String,
    attributes: Map<String, Value>,
}

/// Shared handle to a node of the data tree.
///
/// Cloning is cheap; equality is reference identity.
#[derive(Clone)]
pub struct Node {
    inner: Arc<NodeInner>,
}

impl Node {
    fn with_children(id: NodeId, label: impl Into<String>, children: Option<Vec<Node>>) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                id,
                state: RwLock::new(NodeState {
                    label: label.into(),
                    parent: Weak::new(),
                    children,
                    selection: SelectionState::None,
                    visible: true,
                    search_pattern: String::new(),
                    attributes: Map::new(),
                }),
                listeners: ListenerSet::new(),
            }),
        }
    }

    /// Create a node that holds children (a group or the root).
    pub fn group(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_children(NodeId::new(id), label, Some(Vec::new()))
    }

    /// Create a leaf node.
    pub fn item(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_children(NodeId::new(id), label, None)
    }

    /// Parse a JSON [`NodeSpec`] document into a tree.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let spec: NodeSpec = serde_json::from_str(json)?;
        Ok(spec.build())
    }

    /// Identifier of this node.
    pub fn id(&self) -> NodeId {
        self.inner.id.clone()
    }

    /// Display label, matched by the filter.
    pub fn label(&self) -> String {
        self.inner
            .state
            .read()
            .map(|g| g.label.clone())
            .unwrap_or_default()
    }

    /// Replace the display label.
    pub fn set_label(&self, label: impl Into<String>) {
        if let Ok(mut guard) = self.inner.state.write() {
            guard.label = label.into();
        }
    }

    /// Check if both handles point at the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// The parent node, `None` for the root.
    pub fn parent(&self) -> Option<Node> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|g| g.parent.upgrade())
            .map(|inner| Node { inner })
    }

    /// Walk up to the root of the tree.
    pub fn root(&self) -> Node {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Check if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Ordered children, or `None` for a leaf.
    pub fn children(&self) -> Option<Vec<Node>> {
        self.inner.state.read().ok().and_then(|g| g.children.clone())
    }

    /// Check if the node can hold children.
    pub fn has_children(&self) -> bool {
        self.inner
            .state
            .read()
            .map(|g| g.children.is_some())
            .unwrap_or(false)
    }

    /// Append a child and notify listeners with [`NodeEvent::ChildAdded`].
    ///
    /// Leaf nodes never take children: the call is ignored and `false` is
    /// returned.
    pub fn add_child(&self, child: Node) -> bool {
        let added = match self.inner.state.write() {
            Ok(mut guard) => match guard.children.as_mut() {
                Some(children) => {
                    children.push(child.clone());
                    true
                }
                None => false,
            },
            Err(_) => false,
        };
        if !added {
            log::debug!("Ignoring child {} added to leaf {}", child.label(), self.label());
            return false;
        }
        if let Ok(mut guard) = child.inner.state.write() {
            guard.parent = Arc::downgrade(&self.inner);
        }
        self.inner.listeners.emit(&NodeEvent::ChildAdded(child));
        true
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .unwrap_or_default()
            .iter()
            .map(Node::subtree_len)
            .sum::<usize>()
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn get(&self, attr: &str) -> Option<Value> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|g| g.attributes.get(attr).cloned())
    }

    pub fn set(&self, attr: impl Into<String>, value: impl Into<Value>) {
        if let Ok(mut guard) = self.inner.state.write() {
            guard.attributes.insert(attr.into(), value.into());
        }
    }

    // -------------------------------------------------------------------------
    // Visibility & selection
    // -------------------------------------------------------------------------

    pub fn is_visible(&self) -> bool {
        self.inner.state.read().map(|g| g.visible).unwrap_or(false)
    }

    pub fn set_visibility(&self, visible: bool) {
        if let Ok(mut guard) = self.inner.state.write() {
            guard.visible = visible;
        }
    }

    pub fn selection(&self) -> SelectionState {
        self.inner
            .state
            .read()
            .map(|g| g.selection)
            .unwrap_or_default()
    }

    /// Set the selection state.
    ///
    /// Emits [`NodeEvent::Selection`] on this node when the state changes.
    /// Returns `true` if it changed.
    pub fn set_selection(&self, selection: SelectionState) -> bool {
        let changed = self
            .inner
            .state
            .write()
            .map(|mut g| std::mem::replace(&mut g.selection, selection) != selection)
            .unwrap_or(false);
        if changed {
            self.inner.listeners.emit(&NodeEvent::Selection(self.clone()));
        }
        changed
    }

    /// Emit [`NodeEvent::SelectionChanged`] on the root of this tree.
    pub fn notify_selection_changed(&self) {
        let root = self.root();
        root.inner
            .listeners
            .emit(&NodeEvent::SelectionChanged(root.clone()));
    }

    /// Active filter text, read from the root.
    pub fn search_pattern(&self) -> String {
        self.root()
            .inner
            .state
            .read()
            .map(|g| g.search_pattern.clone())
            .unwrap_or_default()
    }

    /// Store the active filter text on the root.
    pub fn set_search_pattern(&self, pattern: impl Into<String>) {
        if let Ok(mut guard) = self.root().inner.state.write() {
            guard.search_pattern = pattern.into();
        }
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    pub fn subscribe(&self, listener: Arc<dyn NodeListener>) -> ListenerId {
        self.inner.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.inner.id)
            .field("label", &self.label())
            .field("visible", &self.is_visible())
            .finish()
    }
}

/// Serializable description of a data tree.
///
/// ```
/// use filtree_lib::NodeSpec;
///
/// let spec: NodeSpec = serde_json::from_str(
///     r#"{ "label": "Root", "children": [{ "id": "a", "label": "apple" }] }"#,
/// ).unwrap();
/// let root = spec.build();
/// assert_eq!(root.subtree_len(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Node id. A random UUID is used when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    /// Child specs. Absent means the node is a leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeSpec>>,
    #[serde(default)]
    pub selected: SelectionState,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl NodeSpec {
    /// Build a fresh node tree from this description.
    pub fn build(&self) -> Node {
        let id = self
            .id
            .clone()
            .map(NodeId::new)
            .unwrap_or_else(NodeId::random);
        let node = Node::with_children(
            id,
            self.label.clone(),
            self.children.as_ref().map(|_| Vec::new()),
        );
        if let Ok(mut guard) = node.inner.state.write() {
            guard.selection = self.selected;
            guard.attributes = self.attributes.clone();
        }
        for child in self.children.iter().flatten() {
            node.add_child(child.build());
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ignores_children() {
        let leaf = Node::item("a1", "apple");
        let seed = Node::item("s", "seed");

        assert!(!leaf.add_child(seed.clone()));
        assert!(leaf.children().is_none());
        assert!(seed.parent().is_none());
        assert!(Node::group("a", "A").add_child(seed));
    }

    #[test]
    fn test_parent_and_root() {
        let root = Node::group("root", "Root");
        let group = Node::group("a", "A");
        let leaf = Node::item("a1", "apple");
        root.add_child(group.clone());
        group.add_child(leaf.clone());

        assert_eq!(leaf.parent(), Some(group.clone()));
        assert_eq!(leaf.root(), root);
        assert!(root.is_root());
        assert!(!leaf.has_children());
        assert!(group.has_children());
        assert_eq!(root.subtree_len(), 3);
    }

    #[test]
    fn test_search_pattern_lives_on_root() {
        let root = Node::group("root", "Root");
        let leaf = Node::item("a1", "apple");
        root.add_child(leaf.clone());

        leaf.set_search_pattern("app");
        assert_eq!(root.search_pattern(), "app");
        assert_eq!(leaf.search_pattern(), "app");
    }

    #[test]
    fn test_set_selection_reports_change() {
        let leaf = Node::item("a1", "apple");
        assert!(leaf.set_selection(SelectionState::All));
        assert!(!leaf.set_selection(SelectionState::All));
        assert_eq!(leaf.selection(), SelectionState::All);
    }

    #[test]
    fn test_from_json() {
        let root = Node::from_json(
            r#"{
                "id": "root",
                "label": "Root",
                "children": [
                    { "id": "g", "label": "Fruit", "children": [
                        { "id": "a", "label": "apple", "selected": "all",
                          "attributes": { "category": 2 } }
                    ]},
                    { "id": "b", "label": "bread" }
                ]
            }"#,
        )
        .unwrap();

        let children = root.children().unwrap();
        assert_eq!(children.len(), 2);
        assert!(children[0].has_children());
        assert!(!children[1].has_children());

        let apple = &children[0].children().unwrap()[0];
        assert_eq!(apple.id().as_str(), "a");
        assert_eq!(apple.selection(), SelectionState::All);
        assert_eq!(apple.get("category"), Some(Value::from(2)));
        assert_eq!(apple.root(), root);
    }
}
