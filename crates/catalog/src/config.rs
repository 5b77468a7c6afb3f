use keyword_tree::{MatchPolicy, TreeConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the catalog finds its resources and how strictly it checks them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Suggestion data location, relative to the source root.
    ///
    /// Default: `"data/suggestions.json"`
    pub suggestions_path: String,

    /// Icon location, relative to the source root. Resolved, never fetched.
    ///
    /// Default: `"icons/favicon.ico"`
    pub icon_path: String,

    /// Reject payloads whose tree references records that do not exist.
    ///
    /// When disabled such phrases load anyway and simply never produce a
    /// result.
    ///
    /// Default: `true`
    pub validate_indices: bool,

    /// Lookup policy for the keyword tree.
    pub tree: TreeConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            suggestions_path: "data/suggestions.json".into(),
            icon_path: "icons/favicon.ico".into(),
            validate_indices: true,
            tree: TreeConfig::default(),
        }
    }
}

/// Errors that can occur when validating a [`CatalogConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    EmptyPath { field: &'static str },
    #[error("{field} must be relative to the source root, got {path:?}")]
    AbsolutePath { field: &'static str, path: String },
    #[error("min_prefix_chars must be at least 1 for unique_prefix matching")]
    ZeroPrefixLength,
}

impl CatalogConfig {
    /// Checks internal consistency. Call once at start-up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_relative("suggestions_path", &self.suggestions_path)?;
        check_relative("icon_path", &self.icon_path)?;
        if self.tree.match_policy == MatchPolicy::UniquePrefix && self.tree.min_prefix_chars == 0 {
            return Err(ConfigError::ZeroPrefixLength);
        }
        Ok(())
    }
}

fn check_relative(field: &'static str, path: &str) -> Result<(), ConfigError> {
    if path.trim().is_empty() {
        return Err(ConfigError::EmptyPath { field });
    }
    if path.starts_with('/') || path.contains("://") {
        return Err(ConfigError::AbsolutePath {
            field,
            path: path.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = CatalogConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.suggestions_path, "data/suggestions.json");
        assert_eq!(cfg.icon_path, "icons/favicon.ico");
        assert!(cfg.validate_indices);
    }

    #[test]
    fn absolute_paths_are_rejected() {
        let cfg = CatalogConfig {
            icon_path: "/icons/favicon.ico".into(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::AbsolutePath { field: "icon_path", .. })
        ));

        let cfg = CatalogConfig {
            suggestions_path: "https://elsewhere.example/data.json".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_path_is_rejected() {
        let cfg = CatalogConfig {
            suggestions_path: " ".into(),
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmptyPath {
                field: "suggestions_path"
            })
        );
    }

    #[test]
    fn zero_prefix_length_is_rejected() {
        let cfg = CatalogConfig {
            tree: TreeConfig::unique_prefix(0),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPrefixLength));
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: CatalogConfig =
            serde_json::from_str(r#"{ "tree": { "match_policy": "unique_prefix" } }"#).unwrap();
        assert_eq!(cfg.tree.match_policy, MatchPolicy::UniquePrefix);
        assert_eq!(cfg.tree.min_prefix_chars, 1);
        assert_eq!(cfg.icon_path, "icons/favicon.ico");
    }
}
