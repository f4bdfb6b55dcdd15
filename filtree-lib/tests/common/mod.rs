//! Shared fixtures for manager tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use filtree_lib::node::NodeId;
use filtree_lib::view::{MemoryView, PresentationNode, ViewContext, ViewKind, ViewRegistry};
use filtree_lib::{Manager, Node};

/// Registry that keeps every created view reachable by node id.
#[derive(Clone, Default)]
pub struct Views {
    by_node: Arc<Mutex<HashMap<NodeId, Arc<MemoryView>>>>,
}

impl Views {
    pub fn registry(&self) -> ViewRegistry {
        let mut registry = ViewRegistry::new();
        for kind in [ViewKind::Root, ViewKind::Branch, ViewKind::Leaf] {
            let views = self.clone();
            registry = registry.with(kind, move |context: ViewContext| {
                let view = Arc::new(MemoryView::from_context(&context));
                views
                    .by_node
                    .lock()
                    .unwrap()
                    .insert(context.model.id(), Arc::clone(&view));
                view as Arc<dyn PresentationNode>
            });
        }
        registry
    }

    pub fn get(&self, id: &str) -> Arc<MemoryView> {
        self.by_node
            .lock()
            .unwrap()
            .get(&NodeId::new(id))
            .cloned()
            .unwrap_or_else(|| panic!("no view for {id}"))
    }

    pub fn all(&self) -> Vec<Arc<MemoryView>> {
        self.by_node.lock().unwrap().values().cloned().collect()
    }
}

/// `Root -> A -> {apple, banana}`
pub fn fruit_tree() -> Node {
    let root = Node::group("root", "Root");
    let a = Node::group("a", "A");
    a.add_child(Node::item("apple", "apple"));
    a.add_child(Node::item("banana", "banana"));
    root.add_child(a);
    root
}

/// Root holding one leaf per label.
pub fn flat_tree(labels: &[&str]) -> Node {
    let root = Node::group("root", "Root");
    for label in labels {
        root.add_child(Node::item(*label, *label));
    }
    root
}

pub fn node(root: &Node, id: &str) -> Node {
    fn find(node: &Node, id: &str) -> Option<Node> {
        if node.id().as_str() == id {
            return Some(node.clone());
        }
        node.children()
            .unwrap_or_default()
            .iter()
            .find_map(|child| find(child, id))
    }
    find(root, id).unwrap_or_else(|| panic!("no node {id}"))
}

pub fn rendered_labels(manager: &Manager) -> Vec<String> {
    manager
        .rendered_children()
        .iter()
        .map(|child| child.model().label())
        .collect()
}
