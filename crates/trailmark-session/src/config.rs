//! Tracker configuration
//!
//! Loaded from TOML; every field has a default so a partial file is fine.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trailmark_model::DEFAULT_ERROR_LIMIT;

/// Settings for a tracker instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Directory or base URL holding the manifest and route files
    pub data: String,
    /// Manifest file name inside `data`
    pub manifest: String,
    /// File backing persisted state; `None` keeps state in memory
    pub state_file: Option<PathBuf>,
    /// Prefix of completion-map storage keys
    pub namespace: String,
    /// Storage key remembering the last loaded route
    pub last_route_key: String,
    /// Phase that receives custom items
    pub anchor_phase: String,
    /// Section name for custom items
    pub custom_section: String,
    /// Schema errors shown before the overflow line
    pub error_limit: usize,
    /// Base of shareable links
    pub base_url: String,
    /// Prefix of export file names
    pub export_prefix: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data: "data".to_string(),
            manifest: "manifest.json".to_string(),
            state_file: None,
            namespace: "trailmark-checklist-v1".to_string(),
            last_route_key: "trailmark-route-last".to_string(),
            anchor_phase: "p1".to_string(),
            custom_section: "Custom".to_string(),
            error_limit: DEFAULT_ERROR_LIMIT,
            base_url: "http://localhost/".to_string(),
            export_prefix: "trailmark".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for invalid TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// IO or parse failures.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// With data directory or URL
    #[inline]
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    /// With persisted state file
    #[inline]
    #[must_use]
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = Some(path.into());
        self
    }

    /// With custom-item anchor phase
    #[inline]
    #[must_use]
    pub fn with_anchor_phase(mut self, phase_id: impl Into<String>) -> Self {
        self.anchor_phase = phase_id.into();
        self
    }

    /// With share-link base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = TrackerConfig::from_toml_str(
            r#"
            data = "routes"
            anchor_phase = "intro"
            "#,
        )
        .unwrap();
        assert_eq!(config.data, "routes");
        assert_eq!(config.anchor_phase, "intro");
        assert_eq!(config.error_limit, 8);
        assert_eq!(config.custom_section, "Custom");
        assert!(config.state_file.is_none());
    }

    #[test]
    fn mistyped_field_is_rejected() {
        assert!(matches!(
            TrackerConfig::from_toml_str("error_limit = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn builders() {
        let config = TrackerConfig::new()
            .with_data("d")
            .with_state_file("/tmp/s.json")
            .with_anchor_phase("p2")
            .with_base_url("https://example.com/tracker");
        assert_eq!(config.data, "d");
        assert_eq!(config.state_file.as_deref(), Some(Path::new("/tmp/s.json")));
        assert_eq!(config.anchor_phase, "p2");
    }
}
