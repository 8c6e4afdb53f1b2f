//! Trailmark session layer
//!
//! Owns the lifecycle of a tracking session: fetch the manifest, pick the
//! starting route, fetch and validate route documents, and keep one
//! [`Session`] (document + completion store) current at a time.
//!
//! # Loader states
//!
//! ```text
//! Idle → ManifestLoading → ManifestLoaded → RouteLoading → Ready
//!              └────────────→ Failed ←────────────┘
//! Ready | Failed → RouteLoading   (route change)
//! ```
//!
//! Route loads are ticketed: a response that resolves after a newer request
//! was issued is discarded.
//!
//! # Example
//!
//! ```rust,ignore
//! use trailmark_session::{Tracker, TrackerConfig};
//!
//! let config = TrackerConfig::default().with_data("data");
//! let mut tracker = Tracker::from_config(config)?;
//! tracker.boot().await?;
//! tracker.toggle("i1")?;
//! println!("{}", trailmark_view::render_text(&tracker.render()));
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod loader;
pub mod location;
pub mod session;
pub mod source;
pub mod tracker;

pub use config::TrackerConfig;
pub use error::{ConfigError, LoadError, SessionError, SourceError, TransitionError};
pub use loader::{
    allowed_transitions, validate_transition, FetchedRoute, LoadOutcome, LoadTicket, LoaderState,
    PendingLoad, RouteLoader,
};
pub use location::Location;
pub use session::Session;
pub use source::{source_for, FsSource, HttpSource, MemorySource, RouteSource};
pub use tracker::{Export, Tracker};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a tracker
    pub use crate::{LoadOutcome, LoaderState, Session, Tracker, TrackerConfig};
    pub use trailmark_model::{ItemType, MoveOutcome, RouteDocument};
    pub use trailmark_view::{render_text, BoardView, FilterState};
}
