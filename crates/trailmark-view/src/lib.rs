//! Trailmark checklist view
//!
//! A pure projection of (route document, completion flags, filter state) into
//! a [`BoardView`], plus a plain-text renderer for terminals.
//!
//! Filtering never changes the document or the completion map; hidden items
//! still count toward progress.

#![warn(unreachable_pub)]

pub mod board;
pub mod filter;
pub mod text;

pub use board::{render_board, BoardView, ItemRow, PhaseView, SectionView, NO_PHASES_STATUS};
pub use filter::{Expansion, FilterState};
pub use text::{progress_line, render_filters, render_text};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
