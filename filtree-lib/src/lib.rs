//! Hierarchical filter controller.
//!
//! A tree of [`Manager`]s mirrors an externally owned [`Node`] tree, keeping
//! one presentation node per data node in sync while supporting composite
//! sorting, recursive text filtering and throttled, paginated loading.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod manager;
pub mod matcher;
pub mod node;
pub mod page;
pub mod sort;
pub mod throttle;
pub mod view;

mod task;

pub use config::{BranchConfig, ChildConfig, Configuration, PaginationConfig, SearchConfig, Settings};
pub use controller::{Controller, SelectionController};
pub use error::{FilterError, PageError, SettingsError};
pub use manager::Manager;
pub use matcher::Matcher;
pub use node::{Node, NodeId, NodeSpec, SelectionState};
pub use page::{FnPageSource, Page, PageResult, PageSource};
pub use sort::Sorter;
pub use view::{MemoryView, PresentationNode, Slot, SurfaceId, ViewKind, ViewRegistry};
