//! The currently loaded route

use trailmark_model::{RouteDocument, RouteEntry};
use trailmark_store::CompletionStore;

/// Document plus completion state for one route
///
/// Built whole on a successful load and replaced whole on the next one.
#[derive(Debug, Clone)]
pub struct Session {
    route: RouteEntry,
    document: RouteDocument,
    completion: CompletionStore,
}

impl Session {
    /// Assemble a session
    #[must_use]
    pub fn new(route: RouteEntry, document: RouteDocument, completion: CompletionStore) -> Self {
        Self {
            route,
            document,
            completion,
        }
    }

    /// Route id
    #[inline]
    #[must_use]
    pub fn route_id(&self) -> &str {
        &self.route.id
    }

    /// Manifest entry
    #[inline]
    #[must_use]
    pub fn route(&self) -> &RouteEntry {
        &self.route
    }

    /// Route tree
    #[inline]
    #[must_use]
    pub fn document(&self) -> &RouteDocument {
        &self.document
    }

    /// Route tree, mutable
    #[inline]
    pub fn document_mut(&mut self) -> &mut RouteDocument {
        &mut self.document
    }

    /// Completion flags
    #[inline]
    #[must_use]
    pub fn completion(&self) -> &CompletionStore {
        &self.completion
    }

    /// Completion flags, mutable
    #[inline]
    pub fn completion_mut(&mut self) -> &mut CompletionStore {
        &mut self.completion
    }

    /// Split borrow for operations that read the tree and write completion
    pub fn parts_mut(&mut self) -> (&RouteDocument, &mut CompletionStore) {
        (&self.document, &mut self.completion)
    }
}
