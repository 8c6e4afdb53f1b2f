//! Tracker: the explicit context object for a tracking session
//!
//! Everything the checklist needs lives here: configuration, storage, the
//! loader and its state, the manifest, the current [`Session`], filter and
//! expand/collapse state, the shareable link, and the status line. It is
//! constructed at boot and the session inside it is replaced whole on every
//! successful route load.

use crate::config::TrackerConfig;
use crate::error::{ConfigError, LoadError, SessionError, TransitionError};
use crate::loader::{
    validate_transition, FetchedRoute, LoadOutcome, LoaderState, PendingLoad, RouteLoader,
};
use crate::location::Location;
use crate::session::Session;
use crate::source::{source_for, RouteSource};
use std::sync::Arc;
use trailmark_model::{Item, ItemType, MoveOutcome, RouteManifest};
use trailmark_store::{
    export_file_name, export_json, parse_import, CompletionStore, FileStorage, LastRoute,
    MemoryStorage, Storage,
};
use trailmark_view::{render_board, BoardView, Expansion, FilterState};

/// Status shown before any route is loaded
pub const NO_ROUTE_STATUS: &str = "No route loaded.";

/// A progress export ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Suggested file name
    pub file_name: String,
    /// Pretty JSON body
    pub body: String,
}

/// Tracking session owner
#[derive(Debug)]
pub struct Tracker {
    config: TrackerConfig,
    storage: Arc<dyn Storage>,
    loader: RouteLoader,
    last_route: LastRoute,
    state: LoaderState,
    manifest: Option<RouteManifest>,
    session: Option<Session>,
    filter: FilterState,
    expansion: Expansion,
    location: Location,
    status: Option<String>,
}

impl Tracker {
    /// Tracker over explicit storage and source
    ///
    /// # Errors
    /// [`ConfigError::BaseUrl`] when the configured base URL is invalid.
    pub fn new(
        config: TrackerConfig,
        storage: Arc<dyn Storage>,
        source: Arc<dyn RouteSource>,
    ) -> Result<Self, ConfigError> {
        let location = Location::parse(&config.base_url).map_err(|source| ConfigError::BaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        Ok(Self {
            last_route: LastRoute::new(config.last_route_key.clone()),
            loader: RouteLoader::new(source),
            storage,
            state: LoaderState::Idle,
            manifest: None,
            session: None,
            filter: FilterState::new(),
            expansion: Expansion::default(),
            location,
            status: None,
            config,
        })
    }

    /// Tracker with storage and source derived from the config
    ///
    /// # Errors
    /// Storage open, data location, or base URL failures.
    pub fn from_config(config: TrackerConfig) -> Result<Self, ConfigError> {
        let storage: Arc<dyn Storage> = match &config.state_file {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        let source = source_for(&config.data)?;
        Self::new(config, storage, source)
    }

    /// Replace the shareable link (read once at boot for the `route` parameter)
    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    fn transition(&mut self, to: LoaderState) -> Result<(), TransitionError> {
        validate_transition(self.state, to)?;
        tracing::debug!(from = ?self.state, to = ?to, "loader transition");
        self.state = to;
        Ok(())
    }

    fn fail(&mut self, err: &LoadError, route_id: Option<&str>) {
        tracing::error!(route = route_id.unwrap_or("-"), error = %err, "load failed");
        self.status = Some(err.status_message(route_id, self.config.error_limit));
        if let Err(e) = self.transition(LoaderState::Failed) {
            tracing::warn!(error = %e, "could not enter failed state");
        }
    }

    /// Fetch the manifest, then load the starting route
    ///
    /// Starting route: link `route` parameter, then the last loaded route,
    /// then the manifest default.
    ///
    /// # Errors
    /// Manifest or route load failures; the status line carries the message.
    pub async fn boot(&mut self) -> Result<LoadOutcome, SessionError> {
        self.transition(LoaderState::ManifestLoading)?;
        let manifest = match self.loader.fetch_manifest(&self.config.manifest).await {
            Ok(manifest) => manifest,
            Err(e) => {
                self.fail(&e, None);
                return Err(e.into());
            }
        };
        self.transition(LoaderState::ManifestLoaded)?;

        let link = self.location.route_param();
        let last = self.last_route.get(self.storage.as_ref())?;
        let start = manifest
            .starting_route(link.as_deref(), last.as_deref())
            .to_string();
        self.manifest = Some(manifest);
        self.select_route(&start).await
    }

    /// Load a route end to end
    ///
    /// # Errors
    /// As [`Self::begin_load`] and [`Self::apply`].
    pub async fn select_route(&mut self, route_id: &str) -> Result<LoadOutcome, SessionError> {
        let pending = self.begin_load(route_id)?;
        let fetched = pending.fetch().await;
        self.apply(fetched)
    }

    /// Start a route load and hand back the request to fetch
    ///
    /// Issuing the request makes every earlier in-flight request stale.
    /// Unknown ids fall back to the manifest default.
    ///
    /// # Errors
    /// [`SessionError::NoManifest`] before boot; [`LoadError::UnknownRoute`]
    /// when neither the id nor the default is in the manifest.
    pub fn begin_load(&mut self, route_id: &str) -> Result<PendingLoad, SessionError> {
        let entry = self
            .manifest
            .as_ref()
            .ok_or(SessionError::NoManifest)?
            .resolve(route_id)
            .cloned();
        self.transition(LoaderState::RouteLoading)?;

        let Some(entry) = entry else {
            let e = LoadError::UnknownRoute(route_id.to_string());
            self.fail(&e, Some(route_id));
            return Err(e.into());
        };
        if entry.id != route_id {
            tracing::warn!(requested = route_id, fallback = %entry.id, "route not in manifest, using default");
        }
        let ticket = self.loader.issue_ticket();
        tracing::info!(route = %entry.id, file = %entry.file, ticket = ticket.0, "loading route");
        Ok(PendingLoad::new(self.loader.clone(), ticket, entry))
    }

    /// Apply a fetched route
    ///
    /// Stale responses are discarded untouched. Failures keep the previous
    /// session and only change the status line.
    ///
    /// # Errors
    /// The load failure, after it has been written to the status line.
    pub fn apply(&mut self, fetched: FetchedRoute) -> Result<LoadOutcome, SessionError> {
        if !self.loader.is_current(fetched.ticket) || self.state != LoaderState::RouteLoading {
            tracing::debug!(
                route = %fetched.entry.id,
                ticket = fetched.ticket.0,
                "discarding superseded route response"
            );
            return Ok(LoadOutcome::Superseded);
        }

        let route_id = fetched.entry.id.clone();
        let document = match fetched.result {
            Ok(document) => document,
            Err(e) => {
                self.fail(&e, Some(&route_id));
                return Err(e.into());
            }
        };
        let completion =
            match CompletionStore::open(self.storage.clone(), &self.config.namespace, &route_id) {
                Ok(completion) => completion,
                Err(e) => {
                    let e = LoadError::Store(e);
                    self.fail(&e, Some(&route_id));
                    return Err(e.into());
                }
            };

        tracing::info!(
            route = %route_id,
            phases = document.phases.len(),
            items = document.item_count(),
            "route ready"
        );
        self.session = Some(Session::new(fetched.entry, document, completion));
        self.location.set_route_param(&route_id);
        if let Err(e) = self.last_route.set(self.storage.as_ref(), &route_id) {
            tracing::warn!(error = %e, "failed to remember last route");
        }
        self.status = None;
        self.transition(LoaderState::Ready)?;
        Ok(LoadOutcome::Loaded { route_id })
    }

    fn session_mut(&mut self) -> Result<&mut Session, SessionError> {
        self.session.as_mut().ok_or(SessionError::NoSession)
    }

    /// Whether an item is complete in the current route
    #[must_use]
    pub fn is_complete(&self, item_id: &str) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.completion().is_complete(item_id))
    }

    /// Set one item's flag
    ///
    /// Successful completion changes clear a failure left on the status line,
    /// so progress shows again.
    ///
    /// # Errors
    /// No session, unknown item, or storage failure.
    pub fn set_complete(&mut self, item_id: &str, done: bool) -> Result<(), SessionError> {
        let session = self.session_mut()?;
        if session.document().item(item_id).is_none() {
            return Err(SessionError::UnknownItem(item_id.to_string()));
        }
        session.completion_mut().set_complete(item_id, done)?;
        tracing::debug!(item = item_id, done, "set completion");
        self.status = None;
        Ok(())
    }

    /// Flip one item's flag, returning the new value
    ///
    /// # Errors
    /// As [`Self::set_complete`].
    pub fn toggle(&mut self, item_id: &str) -> Result<bool, SessionError> {
        let done = !self.is_complete(item_id);
        self.set_complete(item_id, done)?;
        Ok(done)
    }

    /// Set every currently visible item of a section (shift-click)
    ///
    /// Items hidden by the filter are left alone. Returns how many were set.
    ///
    /// # Errors
    /// No session, unknown phase, or storage failure.
    pub fn set_section(
        &mut self,
        phase_id: &str,
        section_index: usize,
        done: bool,
    ) -> Result<usize, SessionError> {
        let filter = &self.filter;
        let session = self.session.as_mut().ok_or(SessionError::NoSession)?;
        let (document, completion) = session.parts_mut();
        let phase = document
            .phase(phase_id)
            .ok_or_else(|| SessionError::UnknownPhase(phase_id.to_string()))?;
        let ids: Vec<String> = phase
            .sections
            .get(section_index)
            .map(|section| {
                section
                    .items
                    .iter()
                    .filter(|it| filter.shows(it, completion.is_complete(&it.id)))
                    .map(|it| it.id.clone())
                    .collect()
            })
            .unwrap_or_default();
        let count = completion.set_many(&ids, done)?;
        self.status = None;
        Ok(count)
    }

    /// Clear every item of a phase, visible or not
    ///
    /// # Errors
    /// No session, unknown phase, or storage failure.
    pub fn mark_phase_incomplete(&mut self, phase_id: &str) -> Result<usize, SessionError> {
        let session = self.session_mut()?;
        if session.document().phase(phase_id).is_none() {
            return Err(SessionError::UnknownPhase(phase_id.to_string()));
        }
        let ids = session.document().phase_item_ids(phase_id);
        let count = session.completion_mut().set_many(&ids, false)?;
        self.status = None;
        Ok(count)
    }

    /// Move an item to the end of a section; silently does nothing when
    /// anything is unresolved
    pub fn move_item(
        &mut self,
        item_id: &str,
        target_phase_id: &str,
        target_section_index: usize,
    ) -> MoveOutcome {
        match self.session.as_mut() {
            Some(session) => {
                session
                    .document_mut()
                    .move_item(item_id, target_phase_id, target_section_index)
            }
            None => MoveOutcome::Unresolved,
        }
    }

    /// Add a custom item to the configured anchor phase
    ///
    /// # Errors
    /// No session, blank label, or missing anchor phase.
    pub fn add_custom_item(
        &mut self,
        label: &str,
        item_type: ItemType,
    ) -> Result<Item, SessionError> {
        let config = &self.config;
        let session = self.session.as_mut().ok_or(SessionError::NoSession)?;
        Ok(session.document_mut().add_custom_item(
            label,
            item_type,
            &config.anchor_phase,
            &config.custom_section,
        )?)
    }

    /// Completion map of the current route as a named JSON export
    ///
    /// # Errors
    /// No session.
    pub fn export_progress(&self) -> Result<Export, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NoSession)?;
        let body = export_json(session.completion().snapshot())
            .map_err(|e| SessionError::Store(e.into()))?;
        Ok(Export {
            file_name: export_file_name(&self.config.export_prefix, session.route_id()),
            body,
        })
    }

    /// Replace the completion map with an imported one
    ///
    /// Invalid JSON changes nothing. Returns the number of imported entries.
    ///
    /// # Errors
    /// No session, invalid import, or storage failure.
    pub fn import_progress(&mut self, text: &str) -> Result<usize, SessionError> {
        let session = self.session_mut()?;
        let map = parse_import(text)?;
        let count = map.len();
        session.completion_mut().replace_all(map)?;
        tracing::info!(route = session.route_id(), entries = count, "imported progress");
        self.status = None;
        Ok(count)
    }

    /// Render the current board; the status line overrides progress
    #[must_use]
    pub fn render(&self) -> BoardView {
        let board = match &self.session {
            Some(session) => render_board(
                session.document(),
                session.completion(),
                &self.filter,
                &self.expansion,
            ),
            None => BoardView::empty().with_status(NO_ROUTE_STATUS),
        };
        match &self.status {
            Some(status) => board.with_status(status.clone()),
            None => board,
        }
    }

    /// Loader state
    #[inline]
    #[must_use]
    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Status line, if a failure replaced the progress text
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Loaded manifest
    #[inline]
    #[must_use]
    pub fn manifest(&self) -> Option<&RouteManifest> {
        self.manifest.as_ref()
    }

    /// Current session
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Current route id
    #[must_use]
    pub fn route_id(&self) -> Option<&str> {
        self.session.as_ref().map(Session::route_id)
    }

    /// Filter state
    #[inline]
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Filter state, mutable
    #[inline]
    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    /// Expand/collapse state, mutable
    #[inline]
    pub fn expansion_mut(&mut self) -> &mut Expansion {
        &mut self.expansion
    }

    /// Shareable link for the current route
    #[inline]
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Backing storage
    #[inline]
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}
