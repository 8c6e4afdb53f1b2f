//! Route loader: state machine, tickets, and fetch + validate

use crate::error::{LoadError, TransitionError};
use crate::source::RouteSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use trailmark_model::{ModelError, RouteDocument, RouteEntry, RouteManifest};

/// Loader lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoaderState {
    /// Nothing requested yet
    Idle,
    /// Manifest fetch in flight
    ManifestLoading,
    /// Manifest available, no route requested
    ManifestLoaded,
    /// Route fetch in flight
    RouteLoading,
    /// A route is loaded and rendered
    Ready,
    /// Last manifest or route load failed
    Failed,
}

/// States reachable from `from`
#[must_use]
pub fn allowed_transitions(from: LoaderState) -> Vec<LoaderState> {
    use LoaderState::*;
    match from {
        Idle => vec![ManifestLoading],
        ManifestLoading => vec![ManifestLoaded, Failed],
        ManifestLoaded => vec![RouteLoading],
        RouteLoading => vec![RouteLoading, Ready, Failed],
        Ready => vec![RouteLoading],
        Failed => vec![RouteLoading],
    }
}

/// Check a state change against [`allowed_transitions`]
///
/// # Errors
/// [`TransitionError`] naming both states.
pub fn validate_transition(from: LoaderState, to: LoaderState) -> Result<(), TransitionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

/// Sequence number of one route load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub u64);

/// Result of applying a fetched route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Session now shows this route
    Loaded {
        /// Loaded route id
        route_id: String,
    },
    /// A newer request was issued first; response discarded
    Superseded,
}

/// Fetched, parsed, and validated route, not yet applied
#[derive(Debug)]
pub struct FetchedRoute {
    /// Request this answers
    pub ticket: LoadTicket,
    /// Manifest entry that was fetched
    pub entry: RouteEntry,
    /// Document or the reason there is none
    pub result: Result<RouteDocument, LoadError>,
}

/// Fetches manifests and route documents; issues load tickets
#[derive(Debug, Clone)]
pub struct RouteLoader {
    source: Arc<dyn RouteSource>,
    latest: Arc<AtomicU64>,
}

impl RouteLoader {
    /// Loader over `source`
    #[must_use]
    pub fn new(source: Arc<dyn RouteSource>) -> Self {
        Self {
            source,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Underlying source
    #[inline]
    #[must_use]
    pub fn source(&self) -> &Arc<dyn RouteSource> {
        &self.source
    }

    /// Issue a new ticket; every older ticket becomes stale
    pub fn issue_ticket(&self) -> LoadTicket {
        LoadTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is the most recent one issued
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Fetch and parse the manifest
    ///
    /// # Errors
    /// [`LoadError::ManifestFetch`] or [`LoadError::ManifestParse`].
    pub async fn fetch_manifest(&self, name: &str) -> Result<RouteManifest, LoadError> {
        let text = self
            .source
            .fetch_text(name)
            .await
            .map_err(LoadError::ManifestFetch)?;
        let manifest = RouteManifest::from_json_str(&text).map_err(LoadError::ManifestParse)?;
        tracing::info!(
            source = %self.source.describe(),
            routes = manifest.routes.len(),
            default = %manifest.default,
            "loaded routes manifest"
        );
        Ok(manifest)
    }

    /// Fetch, parse, and validate one route file
    ///
    /// # Errors
    /// [`LoadError::RouteFetch`], [`LoadError::RouteParse`], or
    /// [`LoadError::RouteSchema`] carrying every violation.
    pub async fn fetch_route(&self, entry: &RouteEntry) -> Result<RouteDocument, LoadError> {
        let text = self
            .source
            .fetch_text(&entry.file)
            .await
            .map_err(|source| LoadError::RouteFetch {
                file: entry.file.clone(),
                source,
            })?;
        RouteDocument::from_json_str(&text).map_err(|e| match e {
            ModelError::Json(err) => LoadError::RouteParse {
                file: entry.file.clone(),
                message: err.to_string(),
            },
            ModelError::Schema(report) => LoadError::RouteSchema {
                file: entry.file.clone(),
                report,
            },
        })
    }
}

/// A ticketed route request that can be fetched without borrowing the tracker
#[derive(Debug)]
pub struct PendingLoad {
    loader: RouteLoader,
    ticket: LoadTicket,
    entry: RouteEntry,
}

impl PendingLoad {
    pub(crate) fn new(loader: RouteLoader, ticket: LoadTicket, entry: RouteEntry) -> Self {
        Self {
            loader,
            ticket,
            entry,
        }
    }

    /// Ticket of this request
    #[inline]
    #[must_use]
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Route being requested
    #[inline]
    #[must_use]
    pub fn entry(&self) -> &RouteEntry {
        &self.entry
    }

    /// Perform the fetch
    pub async fn fetch(self) -> FetchedRoute {
        let result = self.loader.fetch_route(&self.entry).await;
        FetchedRoute {
            ticket: self.ticket,
            entry: self.entry,
            result,
        }
    }
}
