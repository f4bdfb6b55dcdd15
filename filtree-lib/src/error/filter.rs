//! Manager error types

use crate::view::ViewKind;

use super::PageError;

/// Errors raised by the manager tree.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// The operation exists in the interface but is not supported.
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    /// Bindings were applied to a manager that has no view.
    #[error("Manager for node '{node}' has no view to bind to")]
    MissingView {
        /// Id of the node whose manager is missing its view.
        node: String,
    },

    /// No view factory is registered for the requested kind.
    #[error("No view factory registered for {0:?}")]
    UnregisteredView(ViewKind),

    /// The page source failed.
    #[error("Page request failed: {0}")]
    Page(#[from] PageError),
}

impl FilterError {
    /// Creates a missing-view error for the given node id.
    pub fn missing_view(node: impl Into<String>) -> Self {
        Self::MissingView { node: node.into() }
    }

    /// Returns `true` if this error signals a programmer error rather than
    /// a runtime failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotImplemented(_) | Self::MissingView { .. } | Self::UnregisteredView(_)
        )
    }
}
