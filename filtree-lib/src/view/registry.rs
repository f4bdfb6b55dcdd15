//! View factories keyed by kind.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::FilterError;
use crate::node::Node;

use super::{MemoryView, PresentationNode, Slot, ViewKind};

/// Everything a factory needs to build a view.
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub kind: ViewKind,
    pub model: Node,
    pub slot: Slot,
}

/// Builds presentation nodes of one kind.
pub trait ViewFactory: Send + Sync {
    fn create(&self, context: ViewContext) -> Arc<dyn PresentationNode>;
}

impl<F> ViewFactory for F
where
    F: Fn(ViewContext) -> Arc<dyn PresentationNode> + Send + Sync,
{
    fn create(&self, context: ViewContext) -> Arc<dyn PresentationNode> {
        self(context)
    }
}

/// Map from view kind to the factory producing it.
#[derive(Clone, Default)]
pub struct ViewRegistry {
    factories: HashMap<ViewKind, Arc<dyn ViewFactory>>,
}

impl ViewRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry producing [`MemoryView`]s for every kind.
    pub fn headless() -> Self {
        let factory: Arc<dyn ViewFactory> = Arc::new(|context: ViewContext| {
            Arc::new(MemoryView::from_context(&context)) as Arc<dyn PresentationNode>
        });
        Self::new()
            .with_arc(ViewKind::Root, Arc::clone(&factory))
            .with_arc(ViewKind::Branch, Arc::clone(&factory))
            .with_arc(ViewKind::Leaf, factory)
    }

    /// Register a factory for a kind, replacing any previous one.
    pub fn with(self, kind: ViewKind, factory: impl ViewFactory + 'static) -> Self {
        self.with_arc(kind, Arc::new(factory))
    }

    fn with_arc(mut self, kind: ViewKind, factory: Arc<dyn ViewFactory>) -> Self {
        self.factories.insert(kind, factory);
        self
    }

    pub fn contains(&self, kind: ViewKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Build a view of the context's kind.
    pub fn create(&self, context: ViewContext) -> Result<Arc<dyn PresentationNode>, FilterError> {
        let factory = self
            .factories
            .get(&context.kind)
            .ok_or(FilterError::UnregisteredView(context.kind))?;
        Ok(factory.create(context))
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
