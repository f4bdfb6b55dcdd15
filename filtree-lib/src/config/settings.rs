//! Serialisable settings document.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::sort::Sorter;

use super::ChildConfig;

/// Matcher selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    #[default]
    Substring,
    Fuzzy,
}

/// Sorter selected by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "camelCase")]
pub enum SorterSpec {
    Label,
    LabelDesc,
    SelectedFirst,
    Attribute { name: String },
}

impl SorterSpec {
    pub fn to_sorter(&self) -> Sorter {
        match self {
            Self::Label => Sorter::by_label(),
            Self::LabelDesc => Sorter::by_label_desc(),
            Self::SelectedFirst => Sorter::selected_first(),
            Self::Attribute { name } => Sorter::by_attribute(name.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationSettings {
    pub throttle_time_milliseconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchSettings {
    pub matcher: MatcherKind,
    pub server_side: bool,
    pub throttle_time_milliseconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BranchSettings {
    /// Most-significant first.
    pub sorters: Vec<SorterSpec>,
    pub child_config: Option<ChildConfig>,
}

/// Settings that can be stored as JSON and turned into a
/// [`Configuration`](super::Configuration).
///
/// ```
/// use filtree_lib::Settings;
///
/// let settings = Settings::from_json(r#"{
///     "search": { "throttleTimeMilliseconds": 250, "matcher": "fuzzy" },
///     "leaf": { "sorters": [{ "by": "selectedFirst" }, { "by": "label" }] }
/// }"#).unwrap();
/// assert_eq!(settings.leaf.sorters.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub target: Option<String>,
    pub pagination: PaginationSettings,
    pub search: SearchSettings,
    pub root: BranchSettings,
    pub branch: BranchSettings,
    pub leaf: BranchSettings,
}

impl Settings {
    /// Parse and validate a JSON settings document.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(target) = &self.target
            && target.trim().is_empty()
        {
            return Err(SettingsError::invalid("target", "must not be empty"));
        }

        for (field, branch) in [("root", &self.root), ("branch", &self.branch), ("leaf", &self.leaf)] {
            let unnamed = branch
                .sorters
                .iter()
                .any(|s| matches!(s, SorterSpec::Attribute { name } if name.is_empty()));
            if unnamed {
                return Err(SettingsError::invalid(
                    format!("{field}.sorters"),
                    "attribute sorter needs a name",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::Configuration;
    use crate::view::ViewKind;

    #[test]
    fn test_defaults_from_empty_document() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());

        let config = Configuration::from_settings(&settings);
        assert_eq!(config.search.throttle, Duration::ZERO);
        assert!(config.search.matcher.is_none());
        assert!(config.branch(ViewKind::Leaf).sorters.is_empty());
    }

    #[test]
    fn test_full_document() {
        let settings = Settings::from_json(
            r##"{
                "target": "#filter",
                "pagination": { "throttleTimeMilliseconds": 500 },
                "search": { "serverSide": true, "matcher": "fuzzy", "throttleTimeMilliseconds": 250 },
                "root": { "childConfig": { "withChildren": "branch", "withoutChildren": "leaf" } },
                "leaf": { "sorters": [{ "by": "attribute", "name": "category" }, { "by": "labelDesc" }] }
            }"##,
        )
        .unwrap();

        let config = Configuration::from_settings(&settings);
        assert_eq!(config.target, "#filter");
        assert_eq!(config.pagination.throttle, Duration::from_millis(500));
        assert_eq!(config.search.throttle, Duration::from_millis(250));
        assert!(config.search.server_side);
        assert!(config.search.matcher.is_some());
        assert_eq!(config.branch(ViewKind::Leaf).sorters.len(), 2);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "target": " " }"#),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "leaf": { "sorters": [{ "by": "attribute", "name": "" }] } }"#),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "search": { "matcher": "regex" } }"#),
            Err(SettingsError::Parse(_))
        ));
    }
}
