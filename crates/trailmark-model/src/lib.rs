//! Trailmark route model
//!
//! Typed representation of a progression route and the operations that
//! mutate it.
//!
//! # Core Concepts
//!
//! - [`RouteManifest`]: the list of fetchable routes plus the default id
//! - [`RouteDocument`]: phases → sections → items, built only from input the
//!   validator accepted
//! - [`validate_route`]: structural checks over arbitrary JSON, returning every
//!   violation
//! - [`Progress`]: done/total/percent aggregation over a [`CompletionLookup`]
//!
//! # Example
//!
//! ```rust,ignore
//! use trailmark_model::{RouteDocument, ItemType};
//!
//! let mut doc = RouteDocument::from_json_str(&text)?;
//! doc.move_item("i1", "p2", 0);
//! doc.add_custom_item("Grab the key", ItemType::Quest, "p1", "Custom")?;
//! ```

#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod item_type;
pub mod manifest;
pub mod progress;
pub mod tree;
pub mod validate;

pub use document::{Item, Phase, RouteDocument, Section, DEFAULT_PHASE_TAG};
pub use error::{ModelError, TreeError};
pub use item_type::{ItemType, UnknownItemType};
pub use manifest::{RouteEntry, RouteManifest};
pub use progress::{CompletionLookup, Progress};
pub use tree::{slugify, ItemLocation, MoveOutcome};
pub use validate::{validate_route, ValidationReport, DEFAULT_ERROR_LIMIT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
