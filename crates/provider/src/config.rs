use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity and placement of the keyword provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Stable provider identity; also the key of the impression counter.
    pub name: String,
    /// Host priority. Providers with a higher priority run exclusively.
    pub priority: u32,
    /// Preferred row of the suggestion in the dropdown.
    pub suggested_index: u32,
    /// Keyed counter incremented once per session with a shown suggestion.
    pub impression_scalar: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "ProviderDynamicPalmTree".into(),
            priority: 0,
            suggested_index: 1,
            impression_scalar: "browser.search.experiments.impressions".into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("provider name must not be empty")]
    EmptyName,
    #[error("impression scalar name must not be empty")]
    EmptyScalar,
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.impression_scalar.trim().is_empty() {
            return Err(ConfigError::EmptyScalar);
        }
        Ok(())
    }
}
