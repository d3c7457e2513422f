//! Persisted user preferences.
//!
//! ```toml
//! autoretrieve = "inspire"   # or "none"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::apis::{ApiRegistry, CitationApi};

/// Backend used when new items are added
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AutoRetrieve {
    #[default]
    None,
    Api(String),
}

impl From<String> for AutoRetrieve {
    fn from(value: String) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("none") {
            AutoRetrieve::None
        } else {
            AutoRetrieve::Api(value.to_string())
        }
    }
}

impl From<AutoRetrieve> for String {
    fn from(value: AutoRetrieve) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AutoRetrieve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoRetrieve::None => write!(f, "none"),
            AutoRetrieve::Api(key) => write!(f, "{}", key),
        }
    }
}

/// Preferences file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub autoretrieve: AutoRetrieve,
}

impl Preferences {
    /// Load preferences, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, PreferenceError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| PreferenceError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| PreferenceError::Parse(e.to_string()))
    }

    /// Save preferences to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), PreferenceError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| PreferenceError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PreferenceError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| PreferenceError::Io(e.to_string()))
    }

    /// `<config dir>/citation-counts/preferences.toml`
    pub fn default_path() -> PathBuf {
        super::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("preferences.toml")
    }

    /// The backend to retrieve from automatically, if any.
    ///
    /// A key that names no registered backend disables auto-retrieval.
    pub fn autoretrieve_api<'a>(
        &self,
        registry: &'a ApiRegistry,
    ) -> Option<&'a std::sync::Arc<dyn CitationApi>> {
        match &self.autoretrieve {
            AutoRetrieve::None => None,
            AutoRetrieve::Api(key) => {
                let api = registry.get(key);
                if api.is_none() {
                    tracing::warn!("Unknown autoretrieve API '{}', auto-retrieval disabled", key);
                }
                api
            }
        }
    }
}

/// Preference file errors
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
