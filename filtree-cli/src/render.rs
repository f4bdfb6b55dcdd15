//! Text rendering of a manager tree.

use std::fmt::Write;

use filtree_lib::{Manager, SelectionState};

/// Render the tree in view order, one node per line.
///
/// Hidden nodes are skipped unless `all` is set, in which case they are
/// prefixed with `~`.
pub fn render(manager: &Manager, all: bool) -> String {
    let mut out = String::new();
    render_into(manager, 0, all, &mut out);
    out
}

fn render_into(manager: &Manager, depth: usize, all: bool, out: &mut String) {
    let model = manager.model();
    let visible = model.is_visible();
    if !visible && !all {
        return;
    }

    let marker = match model.selection() {
        SelectionState::All => "[x]",
        SelectionState::Some => "[-]",
        SelectionState::None => "[ ]",
    };
    let hidden = if visible { "" } else { "~" };
    let _ = writeln!(out, "{}{}{} {}", "  ".repeat(depth), hidden, marker, model.label());

    for child in manager.rendered_children() {
        render_into(&child, depth + 1, all, out);
    }
}

#[cfg(test)]
mod tests {
    use filtree_lib::{Configuration, Node, Sorter, ViewKind, ViewRegistry};

    use super::*;

    fn manager() -> Manager {
        let root = Node::from_json(
            r#"{
                "id": "root", "label": "Root", "children": [
                    { "label": "Fruit", "children": [
                        { "label": "pear" },
                        { "label": "apple", "selected": "all" }
                    ]},
                    { "label": "bread" }
                ]
            }"#,
        )
        .unwrap();
        let config = Configuration::default()
            .with_sorter(ViewKind::Branch, Sorter::by_label())
            .with_sorter(ViewKind::Leaf, Sorter::by_label());
        Manager::new(root, config, ViewRegistry::headless()).unwrap()
    }

    #[test]
    fn test_render_sorted_and_filtered() {
        let manager = manager();
        manager.on_filter_change("pe");

        assert_eq!(render(&manager, false), "[ ] Root\n  [ ] Fruit\n    [ ] pear\n");
        assert_eq!(
            render(&manager, true),
            "[ ] Root\n  [ ] Fruit\n    ~[x] apple\n    [ ] pear\n  ~[ ] bread\n"
        );
    }
}
