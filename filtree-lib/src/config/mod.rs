//! Manager tree configuration.

mod settings;

pub use settings::{BranchSettings, MatcherKind, PaginationSettings, SearchSettings, Settings, SorterSpec};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::controller::Controller;
use crate::matcher::Matcher;
use crate::page::PageSource;
use crate::sort::Sorter;
use crate::view::ViewKind;

/// Builds the controller shared by a whole manager tree.
pub type ControllerFactory = Arc<dyn Fn() -> Arc<dyn Controller> + Send + Sync>;

/// Which view kinds a view of a given kind creates for its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildConfig {
    /// Kind used for children that hold children themselves.
    pub with_children: ViewKind,
    /// Kind used for leaf children.
    pub without_children: ViewKind,
}

impl Default for ChildConfig {
    fn default() -> Self {
        Self {
            with_children: ViewKind::Branch,
            without_children: ViewKind::Leaf,
        }
    }
}

impl ChildConfig {
    /// Pick the kind for a child depending on whether it has children.
    pub fn kind_for(&self, has_children: bool) -> ViewKind {
        if has_children {
            self.with_children
        } else {
            self.without_children
        }
    }
}

/// Settings for one view kind.
#[derive(Debug, Clone, Default)]
pub struct BranchConfig {
    /// Sorters applied to children of this kind, most-significant first.
    pub sorters: Vec<Sorter>,
    pub child_config: ChildConfig,
}

/// Pagination settings.
#[derive(Clone, Default)]
pub struct PaginationConfig {
    /// Fetches more data. Pagination is a no-op without one.
    pub page_source: Option<Arc<dyn PageSource>>,
    /// Scroll events inside this window after a fetch are dropped.
    pub throttle: Duration,
}

impl fmt::Debug for PaginationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationConfig")
            .field("page_source", &self.page_source.is_some())
            .field("throttle", &self.throttle)
            .finish()
    }
}

/// Search settings.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// Custom matcher. Case-insensitive substring matching when `None`.
    pub matcher: Option<Matcher>,
    /// Fetch page 0 for every new search pattern.
    pub server_side: bool,
    /// Filter text is applied once typing pauses for this long.
    pub throttle: Duration,
}

/// Read-only configuration shared by a manager tree.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use filtree_lib::{Configuration, Sorter, ViewKind};
///
/// let config = Configuration::default()
///     .with_target("#filter")
///     .with_search_throttle(Duration::from_millis(250))
///     .with_sorter(ViewKind::Leaf, Sorter::selected_first())
///     .with_sorter(ViewKind::Leaf, Sorter::by_label());
/// assert_eq!(config.branch(ViewKind::Leaf).sorters.len(), 2);
/// ```
#[derive(Clone)]
pub struct Configuration {
    /// Mount point of the root view.
    pub target: String,
    pub pagination: PaginationConfig,
    pub search: SearchConfig,
    pub root: BranchConfig,
    pub branch: BranchConfig,
    pub leaf: BranchConfig,
    /// Controller for the tree. A `SelectionController` when `None`.
    pub controller: Option<ControllerFactory>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            target: "root".to_string(),
            pagination: PaginationConfig::default(),
            search: SearchConfig::default(),
            root: BranchConfig::default(),
            branch: BranchConfig::default(),
            leaf: BranchConfig::default(),
            controller: None,
        }
    }
}

impl Configuration {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings for views of the given kind.
    pub fn branch(&self, kind: ViewKind) -> &BranchConfig {
        match kind {
            ViewKind::Root => &self.root,
            ViewKind::Branch => &self.branch,
            ViewKind::Leaf => &self.leaf,
        }
    }

    fn branch_mut(&mut self, kind: ViewKind) -> &mut BranchConfig {
        match kind {
            ViewKind::Root => &mut self.root,
            ViewKind::Branch => &mut self.branch,
            ViewKind::Leaf => &mut self.leaf,
        }
    }

    /// Sets the root mount point.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Sets the page source.
    pub fn with_page_source(mut self, source: impl PageSource + 'static) -> Self {
        self.pagination.page_source = Some(Arc::new(source));
        self
    }

    /// Sets the scroll throttle window.
    pub fn with_pagination_throttle(mut self, window: Duration) -> Self {
        self.pagination.throttle = window;
        self
    }

    /// Sets a custom matcher.
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.search.matcher = Some(matcher);
        self
    }

    /// Enables or disables server-side search.
    pub fn with_server_side_search(mut self, enabled: bool) -> Self {
        self.search.server_side = enabled;
        self
    }

    /// Sets the search throttle window.
    pub fn with_search_throttle(mut self, window: Duration) -> Self {
        self.search.throttle = window;
        self
    }

    /// Appends a sorter for children of the given kind. Sorters added first
    /// are the most significant.
    pub fn with_sorter(mut self, kind: ViewKind, sorter: Sorter) -> Self {
        self.branch_mut(kind).sorters.push(sorter);
        self
    }

    /// Replaces the sorter chain for children of the given kind.
    pub fn with_sorters(mut self, kind: ViewKind, sorters: Vec<Sorter>) -> Self {
        self.branch_mut(kind).sorters = sorters;
        self
    }

    /// Sets the child view kinds used under views of the given kind.
    pub fn with_child_config(mut self, kind: ViewKind, child_config: ChildConfig) -> Self {
        self.branch_mut(kind).child_config = child_config;
        self
    }

    /// Sets the controller factory.
    pub fn with_controller(
        mut self,
        factory: impl Fn() -> Arc<dyn Controller> + Send + Sync + 'static,
    ) -> Self {
        self.controller = Some(Arc::new(factory));
        self
    }

    /// Builds a configuration from serialisable settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut config = Self::default()
            .with_pagination_throttle(Duration::from_millis(
                settings.pagination.throttle_time_milliseconds,
            ))
            .with_search_throttle(Duration::from_millis(settings.search.throttle_time_milliseconds))
            .with_server_side_search(settings.search.server_side);

        if let Some(target) = &settings.target {
            config.target = target.clone();
        }
        config.search.matcher = match settings.search.matcher {
            MatcherKind::Substring => None,
            MatcherKind::Fuzzy => Some(Matcher::fuzzy()),
        };

        for (kind, branch) in [
            (ViewKind::Root, &settings.root),
            (ViewKind::Branch, &settings.branch),
            (ViewKind::Leaf, &settings.leaf),
        ] {
            let target = config.branch_mut(kind);
            target.sorters = branch.sorters.iter().map(SorterSpec::to_sorter).collect();
            if let Some(child_config) = branch.child_config {
                target.child_config = child_config;
            }
        }
        config
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("target", &self.target)
            .field("pagination", &self.pagination)
            .field("search", &self.search)
            .field("root", &self.root)
            .field("branch", &self.branch)
            .field("leaf", &self.leaf)
            .field("controller", &self.controller.is_some())
            .finish()
    }
}
