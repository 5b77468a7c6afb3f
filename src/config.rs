//! YAML configuration for a QuickSuggest deployment.
//!
//! One file carries everything an enrolled context needs: where the install
//! lives, how the catalog reads it, how the provider identifies itself, and
//! how verbose the logs are.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! source_root: "file:///opt/quicksuggest/"
//!
//! logging:
//!   level: "info"
//!   format: "text"
//!
//! catalog:
//!   suggestions_path: "data/suggestions.json"
//!   icon_path: "icons/favicon.ico"
//!   validate_indices: true
//!   tree:
//!     match_policy: "exact"
//!     min_prefix_chars: 1
//!
//! provider:
//!   name: "ProviderDynamicPalmTree"
//!   priority: 0
//!   suggested_index: 1
//!   impression_scalar: "browser.search.experiments.impressions"
//! ```

use std::fs;
use std::path::Path;

use catalog::{CatalogConfig, SourceRoot};
use provider::ProviderConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Reasons a QuickSuggest config file is rejected before enrollment.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read quicksuggest config: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("quicksuggest config is not valid YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Top-level configuration for one enrolled QuickSuggest context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QuickSuggestConfig {
    /// Configuration format version
    pub version: String,

    /// Install root the catalog resolves its resources against.
    #[serde(default)]
    pub source_root: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub provider: ProviderConfig,
}

impl QuickSuggestConfig {
    /// Configuration with defaults everywhere except the install root.
    pub fn new(source_root: impl Into<String>) -> Self {
        Self {
            version: "1.0".to_string(),
            source_root: source_root.into(),
            logging: LoggingConfig::default(),
            catalog: CatalogConfig::default(),
            provider: ProviderConfig::default(),
        }
    }

    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: QuickSuggestConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.source_root()?;
        self.logging.validate()?;
        self.catalog
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("catalog: {e}")))?;
        self.provider
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("provider: {e}")))?;

        Ok(())
    }

    /// Parsed install root.
    pub fn source_root(&self) -> Result<SourceRoot, ConfigLoadError> {
        if self.source_root.trim().is_empty() {
            return Err(ConfigLoadError::MissingField("source_root".into()));
        }
        SourceRoot::parse(&self.source_root)
            .map_err(|e| ConfigLoadError::Validation(format!("source_root: {e}")))
    }
}

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `catalog=debug,info`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.filter().map(|_| ())
    }

    pub(crate) fn filter(&self) -> Result<EnvFilter, ConfigLoadError> {
        EnvFilter::try_new(&self.level)
            .map_err(|e| ConfigLoadError::Validation(format!("logging.level '{}': {e}", self.level)))
    }
}
