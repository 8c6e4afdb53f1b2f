//! Trailmark completion store
//!
//! Persists which checklist items are done, one map per route, through a
//! synchronous key/value [`Storage`]. Every mutation is written through
//! before the call returns; nothing is buffered.
//!
//! # Architecture
//!
//! ```text
//! CompletionStore ──set_complete──▶ Storage::set("<namespace>::<route>", json)
//!                                     ├─ MemoryStorage (process lifetime)
//!                                     └─ FileStorage   (JSON file, atomic rewrite)
//! ```

#![warn(unreachable_pub)]

pub mod completion;
pub mod error;
pub mod storage;
pub mod transfer;

pub use completion::{completion_key, CompletionStore};
pub use error::{ImportError, StoreError};
pub use storage::{FileStorage, LastRoute, MemoryStorage, Storage};
pub use transfer::{export_file_name, export_json, parse_import};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with completion state
    pub use crate::completion::CompletionStore;
    pub use crate::error::{ImportError, StoreError};
    pub use crate::storage::{FileStorage, LastRoute, MemoryStorage, Storage};
    pub use trailmark_model::CompletionLookup;
}
