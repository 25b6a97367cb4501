//! Adapter configuration supplied by the host

use crate::error::{MtError, MtResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options recognised by the adapter
///
/// Missing keys fall back to their defaults, so `{}` is a valid configuration.
///
/// ```json
/// { "include_codes": true, "locale_map_path": "/Configuration/locales.txt" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfiguration {
    /// Emit inline formatting codes in results
    pub include_codes: bool,
    /// Resource path of the locale override table; `None` disables remapping
    pub locale_map_path: Option<String>,
}

impl AdapterConfiguration {
    pub fn with_include_codes(mut self, include_codes: bool) -> Self {
        self.include_codes = include_codes;
        self
    }

    pub fn with_locale_map_path(mut self, path: impl Into<String>) -> Self {
        self.locale_map_path = Some(path.into());
        self
    }

    /// The configured locale-map path, ignoring blank values
    pub fn locale_map_path(&self) -> Option<&str> {
        self.locale_map_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    pub fn from_json_str(json: &str) -> MtResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MtError::Configuration(format!("Invalid adapter configuration: {}", e)))
    }

    pub fn load_from_file(path: &Path) -> MtResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MtError::Configuration(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }
}
