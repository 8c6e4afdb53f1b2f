//! Error types for the session layer
//!
//! Covers:
//! - Source failures (filesystem / HTTP)
//! - Manifest and route load failures, rendered into the status area
//! - Session operations (storage, tree, import)
//! - Configuration loading

use crate::loader::LoaderState;
use std::path::PathBuf;
use trailmark_model::{TreeError, ValidationReport};
use trailmark_store::{ImportError, StoreError};

/// Failures fetching raw text from a route source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// No such file in the source
    #[error("not found: {0}")]
    NotFound(String),

    /// IO error reading a file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Name could not be joined onto the base URL
    #[error("invalid url for {name}: {source}")]
    Url {
        name: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport-level HTTP failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Failures of one manifest or route load attempt
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Manifest could not be fetched
    #[error("manifest fetch failed: {0}")]
    ManifestFetch(#[source] SourceError),

    /// Manifest text is not a valid manifest
    #[error("manifest parse failed: {0}")]
    ManifestParse(#[source] serde_json::Error),

    /// Route file could not be fetched
    #[error("failed to fetch {file}: {source}")]
    RouteFetch {
        file: String,
        #[source]
        source: SourceError,
    },

    /// Route file is not JSON
    #[error("Invalid JSON in {file}: {message}")]
    RouteParse { file: String, message: String },

    /// Route JSON failed structural validation
    #[error("route {file} failed validation ({} errors)", .report.len())]
    RouteSchema {
        file: String,
        report: ValidationReport,
    },

    /// Manifest has neither the requested route nor its default
    #[error("route '{0}' is not in the manifest")]
    UnknownRoute(String),

    /// Completion state for the new route could not be read
    #[error("failed to read saved progress: {0}")]
    Store(#[from] StoreError),
}

impl LoadError {
    /// Whether the failure happened before any route was attempted
    #[inline]
    #[must_use]
    pub fn is_manifest_error(&self) -> bool {
        matches!(self, Self::ManifestFetch(_) | Self::ManifestParse(_))
    }

    /// Error body for the status area, schema errors bounded to `limit`
    #[must_use]
    pub fn detail(&self, limit: usize) -> String {
        match self {
            Self::RouteSchema { report, .. } => report.summary(limit),
            other => other.to_string(),
        }
    }

    /// Full status-area message
    #[must_use]
    pub fn status_message(&self, route_id: Option<&str>, limit: usize) -> String {
        if self.is_manifest_error() {
            return format!("Failed to load routes manifest:\n{}", self.detail(limit));
        }
        format!(
            "Failed to load route {}:\n{}",
            route_id.unwrap_or("?"),
            self.detail(limit)
        )
    }
}

/// Illegal loader state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal loader transition: {from:?} -> {to:?}")]
pub struct TransitionError {
    /// State before
    pub from: LoaderState,
    /// Requested state
    pub to: LoaderState,
}

/// Failures of tracker operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Operation needs a loaded route
    #[error("no route loaded")]
    NoSession,

    /// Operation needs the manifest
    #[error("routes manifest not loaded")]
    NoManifest,

    /// Unknown item id
    #[error("item '{0}' not found in this route")]
    UnknownItem(String),

    /// Unknown phase id
    #[error("phase '{0}' not found in this route")]
    UnknownPhase(String),

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// User-visible tree mutation failure
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Import failure
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Loader state machine violation
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Route load failure
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Failures loading tracker configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the config shape
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Base URL is not a URL
    #[error("invalid base url '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Data location could not be turned into a source
    #[error("invalid data location: {0}")]
    Source(#[from] SourceError),

    /// Storage could not be opened
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_status_is_bounded() {
        let report = ValidationReport::new((0..10).map(|i| format!("e{i}")).collect());
        let err = LoadError::RouteSchema {
            file: "a.json".to_string(),
            report,
        };
        let msg = err.status_message(Some("a"), 8);
        assert!(msg.starts_with("Failed to load route a:\nRoute schema errors:"));
        assert!(msg.ends_with("…and 2 more."));
    }

    #[test]
    fn manifest_status_names_manifest() {
        let err = LoadError::ManifestFetch(SourceError::NotFound("manifest.json".into()));
        assert!(err.is_manifest_error());
        assert_eq!(
            err.status_message(None, 8),
            "Failed to load routes manifest:\nmanifest fetch failed: not found: manifest.json"
        );
    }

    #[test]
    fn parse_error_display() {
        let err = LoadError::RouteParse {
            file: "a.json".into(),
            message: "EOF while parsing".into(),
        };
        assert_eq!(err.to_string(), "Invalid JSON in a.json: EOF while parsing");
    }
}
