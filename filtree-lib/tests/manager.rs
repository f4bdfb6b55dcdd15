//! Manager tree behaviour: mirroring, sorting, filtering, teardown.

mod common;

use std::sync::Arc;

use filtree_lib::view::{PresentationNode, ViewKind, ViewRegistry};
use filtree_lib::{
    Configuration, Controller, FilterError, Manager, Node, SelectionController, SelectionState,
    Sorter,
};

use common::{Views, flat_tree, fruit_tree, node, rendered_labels};

fn assert_mirrors(manager: &Manager, model: &Node) {
    assert_eq!(manager.model(), model);
    let children = manager.children();
    let models = model.children().unwrap_or_default();
    assert_eq!(children.len(), models.len());
    for (child, child_model) in children.iter().zip(&models) {
        assert_eq!(child.parent().map(|p| p.model().clone()), Some(model.clone()));
        assert_mirrors(child, child_model);
    }
}

// =============================================================================
// Mirroring
// =============================================================================

#[test]
fn test_one_manager_per_node() {
    let root = Node::group("root", "Root");
    let fruit = Node::group("fruit", "Fruit");
    let citrus = Node::group("citrus", "Citrus");
    citrus.add_child(Node::item("lemon", "lemon"));
    citrus.add_child(Node::item("lime", "lime"));
    fruit.add_child(citrus);
    fruit.add_child(Node::item("apple", "apple"));
    root.add_child(fruit);
    root.add_child(Node::item("bread", "bread"));
    root.add_child(Node::group("empty", "Empty"));

    let manager = Manager::new(root.clone(), Configuration::default(), ViewRegistry::headless()).unwrap();

    assert_eq!(manager.subtree_len(), root.subtree_len());
    assert_eq!(manager.subtree_len(), 8);
    assert!(manager.is_root());
    assert_mirrors(&manager, &root);
}

#[test]
fn test_leaf_keeps_no_children() {
    let views = Views::default();
    let root = fruit_tree();
    let manager = Manager::new(root.clone(), Configuration::default(), views.registry()).unwrap();

    let apple = node(&root, "apple");
    assert!(!apple.add_child(Node::item("seed", "seed")));

    assert!(apple.children().is_none());
    let apple_manager = manager.find_by_model(&apple).unwrap();
    assert!(apple_manager.children().is_empty());
    assert_eq!(views.get("apple").kind(), ViewKind::Leaf);
    assert_eq!(manager.subtree_len(), root.subtree_len());
}

#[test]
fn test_view_kinds_follow_child_config() {
    let views = Views::default();
    let root = fruit_tree();
    let _manager = Manager::new(root, Configuration::default(), views.registry()).unwrap();

    assert_eq!(views.get("root").kind(), ViewKind::Root);
    assert_eq!(views.get("a").kind(), ViewKind::Branch);
    assert_eq!(views.get("apple").kind(), ViewKind::Leaf);
    assert_eq!(views.get("a").child_surfaces().len(), 2);
}

#[test]
fn test_controller_shared_by_tree() {
    let controller = Arc::new(SelectionController::new());
    let shared = Arc::clone(&controller);
    let config = Configuration::default().with_controller(move || shared.clone() as Arc<dyn Controller>);

    let manager = Manager::new(fruit_tree(), config, ViewRegistry::headless()).unwrap();

    assert_eq!(controller.bound_views(), 4);
    let root_controller = manager.controller();
    for child in manager.children() {
        assert!(Arc::ptr_eq(&child.controller(), &root_controller));
        for leaf in child.children() {
            assert!(Arc::ptr_eq(&leaf.controller(), &root_controller));
        }
    }
}

#[test]
fn test_update_children_is_idempotent() {
    let views = Views::default();
    let root = fruit_tree();
    let manager = Manager::new(root.clone(), Configuration::default(), views.registry()).unwrap();

    manager.update_children().unwrap();
    manager.update_children().unwrap();
    for child in manager.children() {
        child.update_children().unwrap();
    }

    assert_eq!(manager.subtree_len(), root.subtree_len());
    assert_eq!(views.get("root").child_surfaces().len(), 1);
    assert_eq!(views.get("a").child_surfaces().len(), 2);
}

#[test]
fn test_new_data_creates_manager_under_parent() {
    let views = Views::default();
    let root = fruit_tree();
    let config = Configuration::default().with_sorter(ViewKind::Leaf, Sorter::by_label());
    let manager = Manager::new(root.clone(), config, views.registry()).unwrap();

    let a = node(&root, "a");
    a.add_child(Node::item("apricot", "apricot"));

    let a_manager = manager.find_by_model(&a).unwrap();
    assert_eq!(a_manager.children().len(), 3);
    assert_eq!(rendered_labels(&a_manager), vec!["apple", "apricot", "banana"]);
    assert_eq!(manager.subtree_len(), root.subtree_len());
    assert!(views.get("a").scroll_updates() >= 2);
}

#[test]
fn test_remove_child_not_implemented() {
    let root = fruit_tree();
    let manager = Manager::new(root.clone(), Configuration::default(), ViewRegistry::headless()).unwrap();

    let err = manager.remove_child(&node(&root, "a")).unwrap_err();
    assert!(matches!(err, FilterError::NotImplemented("remove_child")));
    assert!(err.is_precondition());
    assert_eq!(manager.subtree_len(), 4);
}

#[test]
fn test_unregistered_view_kind_fails() {
    let registry = ViewRegistry::new().with(ViewKind::Root, |context: filtree_lib::view::ViewContext| {
        Arc::new(filtree_lib::MemoryView::from_context(&context)) as Arc<dyn PresentationNode>
    });

    let result = Manager::new(fruit_tree(), Configuration::default(), registry);
    assert!(matches!(result, Err(FilterError::UnregisteredView(ViewKind::Branch))));
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn test_sorters_compose_most_significant_first() {
    let root = Node::group("root", "Root");
    for (label, category) in [("pear", 2), ("banana", 1), ("apple", 2), ("cherry", 1), ("fig", 3)] {
        let item = Node::item(label, label);
        item.set("category", category);
        root.add_child(item);
    }
    let config = Configuration::default()
        .with_sorter(ViewKind::Leaf, Sorter::by_attribute("category"))
        .with_sorter(ViewKind::Leaf, Sorter::by_label());

    let manager = Manager::new(root, config, ViewRegistry::headless()).unwrap();

    let expected = vec!["banana", "cherry", "apple", "pear", "fig"];
    assert_eq!(rendered_labels(&manager), expected);

    let sorted: Vec<String> = manager
        .sort_children(manager.children())
        .iter()
        .map(|m| m.model().label())
        .collect();
    assert_eq!(sorted, expected);
}

#[test]
fn test_no_sorters_keeps_node_order() {
    let manager = Manager::new(flat_tree(&["c", "a", "b"]), Configuration::default(), ViewRegistry::headless()).unwrap();
    assert!(manager.get_sorters().is_empty());
    assert_eq!(rendered_labels(&manager), vec!["c", "a", "b"]);
}

#[test]
fn test_render_hides_container_during_reflow() {
    let views = Views::default();
    let config = Configuration::default().with_sorter(ViewKind::Leaf, Sorter::by_label_desc());
    let manager = Manager::new(flat_tree(&["a", "b", "c"]), config, views.registry()).unwrap();

    let reflows = views.get("root").reflows();
    manager.render_sorted_children();

    assert_eq!(views.get("root").reflows(), reflows + 1);
    assert!(!views.get("root").is_children_hidden());
    assert_eq!(rendered_labels(&manager), vec!["c", "b", "a"]);
}

#[test]
fn test_toggle_resorts_siblings() {
    let views = Views::default();
    let config = Configuration::default()
        .with_sorter(ViewKind::Leaf, Sorter::selected_first())
        .with_sorter(ViewKind::Leaf, Sorter::by_label());
    let root = flat_tree(&["b", "a", "c"]);
    let manager = Manager::new(root.clone(), config, views.registry()).unwrap();
    assert_eq!(rendered_labels(&manager), vec!["a", "b", "c"]);

    views.get("c").emit(filtree_lib::events::ViewEvent::Toggle);

    assert_eq!(node(&root, "c").selection(), SelectionState::All);
    assert_eq!(root.selection(), SelectionState::Some);
    assert_eq!(rendered_labels(&manager), vec!["c", "a", "b"]);
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_filter_propagates_visibility() {
    let root = fruit_tree();
    let manager = Manager::new(root.clone(), Configuration::default(), ViewRegistry::headless()).unwrap();

    manager.on_filter_change("app");
    assert!(node(&root, "apple").is_visible());
    assert!(!node(&root, "banana").is_visible());
    assert!(node(&root, "a").is_visible());
    assert!(root.is_visible());
    assert_eq!(root.search_pattern(), "app");

    manager.on_filter_change("zzz");
    assert!(!node(&root, "apple").is_visible());
    assert!(!node(&root, "banana").is_visible());
    assert!(!node(&root, "a").is_visible());
    assert!(root.is_visible());
}

#[test]
fn test_empty_filter_restores_every_leaf() {
    let root = fruit_tree();
    let manager = Manager::new(root.clone(), Configuration::default(), ViewRegistry::headless()).unwrap();

    manager.on_filter_change("zzz");
    manager.on_filter_change("");

    assert!(node(&root, "apple").is_visible());
    assert!(node(&root, "banana").is_visible());
    assert!(node(&root, "a").is_visible());
    assert_eq!(root.search_pattern(), "");
}

#[test]
fn test_group_without_children_never_matches() {
    let root = Node::group("root", "Root");
    let empty = Node::group("empty", "Empty");
    root.add_child(empty.clone());
    root.add_child(Node::item("bread", "bread"));
    let manager = Manager::new(root.clone(), Configuration::default(), ViewRegistry::headless()).unwrap();

    manager.on_filter_change("Emp");
    assert!(!empty.is_visible());
    assert!(!node(&root, "bread").is_visible());

    manager.on_filter_change("");
    assert!(!empty.is_visible());
    assert!(node(&root, "bread").is_visible());
}

#[test]
fn test_filter_matches_on_prefixed_label() {
    let root = fruit_tree();
    let manager = Manager::new(root.clone(), Configuration::default(), ViewRegistry::headless()).unwrap();

    let matcher = filtree_lib::Matcher::new(|candidate, query| candidate == query);
    assert!(manager.filter("RootAapple", "", Some(&matcher)));
    assert!(node(&root, "apple").is_visible());
    assert!(!node(&root, "banana").is_visible());
}

#[test]
fn test_same_pattern_is_ignored() {
    let root = fruit_tree();
    let manager = Manager::new(root.clone(), Configuration::default(), ViewRegistry::headless()).unwrap();

    manager.on_filter_change("app");
    node(&root, "banana").set_visibility(true);
    manager.on_filter_change("app");

    assert!(node(&root, "banana").is_visible());
}

#[test]
fn test_selection_change_clears_search() {
    let views = Views::default();
    let root = fruit_tree();
    let manager = Manager::new(root.clone(), Configuration::default(), views.registry()).unwrap();

    manager.on_filter_change("app");
    assert!(!node(&root, "banana").is_visible());

    views.get("apple").emit(filtree_lib::events::ViewEvent::Toggle);

    assert_eq!(root.search_pattern(), "");
    assert!(node(&root, "banana").is_visible());
}

// =============================================================================
// Teardown
// =============================================================================

#[test]
fn test_close_releases_views_and_listeners() {
    let views = Views::default();
    let controller = Arc::new(SelectionController::new());
    let shared = Arc::clone(&controller);
    let config = Configuration::default().with_controller(move || shared.clone() as Arc<dyn Controller>);
    let root = fruit_tree();
    let manager = Manager::new(root.clone(), config, views.registry()).unwrap();

    manager.close();

    assert!(manager.is_closed());
    assert!(manager.view().is_none());
    assert!(manager.children().is_empty());
    assert!(views.all().iter().all(|v| v.is_closed()));
    assert_eq!(controller.bound_views(), 0);
    assert_eq!(root.listener_count(), 0);
    assert_eq!(node(&root, "apple").listener_count(), 0);

    root.add_child(Node::item("late", "late"));
    manager.on_filter_change("app");
    assert_eq!(manager.subtree_len(), 1);

    let err = manager.add_child(Node::item("orphan", "orphan")).unwrap_err();
    assert!(matches!(err, FilterError::MissingView { .. }));
}

#[test]
fn test_close_child_detaches_from_parent() {
    let views = Views::default();
    let root = fruit_tree();
    let manager = Manager::new(root.clone(), Configuration::default(), views.registry()).unwrap();

    let a = manager.find_by_model(&node(&root, "a")).unwrap();
    let apple = a.find_by_model(&node(&root, "apple")).unwrap();
    apple.close();

    assert_eq!(a.children().len(), 1);
    assert_eq!(views.get("a").child_surfaces().len(), 1);
    assert!(views.get("apple").is_closed());
    assert!(!manager.is_closed());
}
