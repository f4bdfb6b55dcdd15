//! Sorter chains and composite ordering.
//!
//! A chain lists comparators most-significant first. The composite order is
//! built by stable-sorting once per comparator, least-significant first, so
//! ties left by a more significant criterion keep the order produced by the
//! less significant ones.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::node::{Node, SelectionState};

/// Comparator over two nodes.
#[derive(Clone)]
pub struct Sorter {
    inner: Arc<dyn Fn(&Node, &Node) -> Ordering + Send + Sync>,
}

impl Sorter {
    /// Wrap a comparator.
    pub fn new(f: impl Fn(&Node, &Node) -> Ordering + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    /// Compare nodes by a derived key.
    pub fn by_key<K: Ord>(key: impl Fn(&Node) -> K + Send + Sync + 'static) -> Self {
        Self::new(move |a, b| key(a).cmp(&key(b)))
    }

    /// Ascending by label.
    pub fn by_label() -> Self {
        Self::by_key(|n| n.label())
    }

    /// Descending by label.
    pub fn by_label_desc() -> Self {
        Self::new(|a, b| b.label().cmp(&a.label()))
    }

    /// Fully selected nodes first, then partially selected ones.
    pub fn selected_first() -> Self {
        Self::by_key(|n| match n.selection() {
            SelectionState::All => 0u8,
            SelectionState::Some => 1,
            SelectionState::None => 2,
        })
    }

    /// Ascending by an attribute value. Missing attributes sort first.
    pub fn by_attribute(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |a, b| compare_values(a.get(&name).as_ref(), b.get(&name).as_ref()))
    }

    pub fn compare(&self, a: &Node, b: &Node) -> Ordering {
        (self.inner)(a, b)
    }
}

impl fmt::Debug for Sorter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sorter")
    }
}

/// Order items by a chain of sorters, most-significant first.
///
/// Returns the input unchanged when the chain is empty.
pub fn composite_sort<T>(mut items: Vec<T>, sorters: &[Sorter], node_of: impl Fn(&T) -> &Node) -> Vec<T> {
    for sorter in sorters.iter().rev() {
        items.sort_by(|a, b| sorter.compare(node_of(a), node_of(b)));
    }
    items
}

/// Total order over JSON scalars: null < bool < number < string.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) | Some(Value::Object(_)) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
