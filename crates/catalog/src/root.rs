use std::fmt;
use std::path::Path;
use std::str::FromStr;

use reqwest::Url;

use crate::error::NetworkError;

/// Install root that suggestion resources are resolved against.
///
/// The root is always treated as a directory: `https://cdn.example/qs` and
/// `https://cdn.example/qs/` resolve `data/suggestions.json` identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    base: Url,
}

impl SourceRoot {
    pub fn parse(root: &str) -> Result<Self, NetworkError> {
        let mut base =
            Url::parse(root).map_err(|e| NetworkError::InvalidUrl(format!("{root}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl(format!(
                "{root}: cannot be used as a base url"
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    /// Root backed by a local directory. `dir` must be absolute.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let dir = dir.as_ref();
        let base = Url::from_directory_path(dir)
            .map_err(|()| NetworkError::InvalidUrl(format!("{}: not an absolute path", dir.display())))?;
        Ok(Self { base })
    }

    pub fn resolve(&self, relative: &str) -> Result<Url, NetworkError> {
        self.base
            .join(relative)
            .map_err(|e| NetworkError::InvalidUrl(format!("{relative}: {e}")))
    }

    pub fn as_url(&self) -> &Url {
        &self.base
    }
}

impl FromStr for SourceRoot {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SourceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.base.fmt(f)
    }
}
