//! Where manifest and route files come from

use crate::error::SourceError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Async text fetch by file name
#[async_trait]
pub trait RouteSource: Debug + Send + Sync {
    /// Fetch the full text of `name`
    async fn fetch_text(&self, name: &str) -> Result<String, SourceError>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// Files under a local directory
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Source rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl RouteSource for FsSource {
    async fn fetch_text(&self, name: &str) -> Result<String, SourceError> {
        let path = self.root.join(name);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound(path.display().to_string())
            } else {
                SourceError::Io { path, source: e }
            }
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Files under an HTTP base URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: Url,
    client: reqwest::Client,
}

impl HttpSource {
    /// Source rooted at `base`; a trailing slash is added if missing
    #[must_use]
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            base,
            client: reqwest::Client::new(),
        }
    }

    fn url_for(&self, name: &str) -> Result<Url, SourceError> {
        self.base.join(name).map_err(|source| SourceError::Url {
            name: name.to_string(),
            source,
        })
    }
}

#[async_trait]
impl RouteSource for HttpSource {
    async fn fetch_text(&self, name: &str) -> Result<String, SourceError> {
        let url = self.url_for(name)?;
        tracing::debug!(url = %url, "fetching");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// Files held in memory, with optional per-file latency
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

impl MemorySource {
    /// Empty source
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style file
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.files.insert(name.into(), text.into());
        self
    }

    /// Builder-style latency for one file
    #[must_use]
    pub fn with_delay(mut self, name: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(name.into(), delay);
        self
    }
}

#[async_trait]
impl RouteSource for MemorySource {
    async fn fetch_text(&self, name: &str) -> Result<String, SourceError> {
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(name.to_string()))
    }

    fn describe(&self) -> String {
        format!("memory ({} files)", self.files.len())
    }
}

/// HTTP source for `http(s)://` locations, filesystem otherwise
///
/// # Errors
/// [`SourceError::Url`] when an HTTP location does not parse.
pub fn source_for(data: &str) -> Result<Arc<dyn RouteSource>, SourceError> {
    if data.starts_with("http://") || data.starts_with("https://") {
        let base = Url::parse(data).map_err(|source| SourceError::Url {
            name: data.to_string(),
            source,
        })?;
        Ok(Arc::new(HttpSource::new(base)))
    } else {
        Ok(Arc::new(FsSource::new(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_source_serves_files() {
        let source = MemorySource::new().with_file("a.json", "{}");
        assert_eq!(source.fetch_text("a.json").await.unwrap(), "{}");
        assert!(matches!(
            source.fetch_text("b.json").await,
            Err(SourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn fs_source_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("m.json"), "[]").unwrap();
        let source = FsSource::new(dir.path());
        assert_eq!(source.fetch_text("m.json").await.unwrap(), "[]");
        assert!(matches!(
            source.fetch_text("missing.json").await,
            Err(SourceError::NotFound(_))
        ));
    }

    #[test]
    fn http_source_joins_under_base_path() {
        let source = HttpSource::new(Url::parse("https://example.com/tracker/data").unwrap());
        assert_eq!(
            source.url_for("a.json").unwrap().as_str(),
            "https://example.com/tracker/data/a.json"
        );
    }

    #[test]
    fn source_for_picks_backend() {
        assert!(source_for("https://example.com/data/").unwrap().describe().starts_with("https://"));
        assert_eq!(source_for("routes").unwrap().describe(), "routes");
    }
}
