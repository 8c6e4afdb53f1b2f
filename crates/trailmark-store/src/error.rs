//! Error types for completion storage

use std::path::PathBuf;

/// Failures reading or writing persisted state
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error on the backing file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// State could not be encoded
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures importing a user-supplied progress file
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// File text is not JSON
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// JSON parsed but is not an object of id → flag
    #[error("Invalid JSON: expected an object mapping item ids to booleans")]
    NotAnObject,

    /// Import parsed but could not be persisted
    #[error("failed to save imported progress: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::io_error(
            "/tmp/state.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "io error on /tmp/state.json: denied");
    }

    #[test]
    fn import_error_display() {
        assert!(ImportError::NotAnObject.to_string().starts_with("Invalid JSON"));
    }
}
