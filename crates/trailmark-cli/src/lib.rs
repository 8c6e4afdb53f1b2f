//! Trailmark command line
//!
//! Argument definitions, one-shot commands, and the interactive shell used by
//! the `trailmark` binary. Every command boots a [`Tracker`] from the merged
//! configuration (file, then flags) and writes its output to a caller-supplied
//! writer.

#![warn(unreachable_pub)]

pub mod commands;
pub mod shell;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use trailmark_session::{Location, Tracker, TrackerConfig};

/// Progression-route checklist tracker
#[derive(Parser, Debug)]
#[command(name = "trailmark", version, about)]
pub struct Cli {
    /// Options shared by every command
    #[command(flatten)]
    pub global: GlobalArgs,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory or base URL holding the manifest and route files
    #[arg(long, global = true)]
    pub data: Option<String>,

    /// File that persists completion state between runs
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Shareable link to open (its `route` parameter picks the route)
    #[arg(long, global = true)]
    pub link: Option<String>,

    /// Route to open, overriding the link and the last used route
    #[arg(long, short = 'r', global = true)]
    pub route: Option<String>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check a route file against the schema without loading it
    Validate {
        /// Route JSON file
        file: PathBuf,
    },
    /// Commands that boot a tracker first
    #[command(flatten)]
    Session(SessionCommand),
}

impl From<SessionCommand> for Command {
    fn from(command: SessionCommand) -> Self {
        Self::Session(command)
    }
}

/// Subcommands that run against a booted tracker
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List the routes in the manifest
    Routes,
    /// Print the checklist
    Show {
        /// Only show these item types (repeatable)
        #[arg(long = "type", short = 't')]
        types: Vec<String>,
        /// Hide completed items
        #[arg(long)]
        incomplete: bool,
        /// Case-insensitive label search
        #[arg(long, short = 's')]
        search: Option<String>,
        /// Start with every phase collapsed
        #[arg(long)]
        collapsed: bool,
    },
    /// Mark items complete
    Check {
        /// Item ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Mark items incomplete
    Uncheck {
        /// Item ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Mark every item of a phase incomplete
    ResetPhase {
        /// Phase id
        phase: String,
    },
    /// Write the completion map of the current route to a JSON file
    Export {
        /// Output path (defaults to the suggested file name)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },
    /// Replace the completion map of the current route from a JSON file
    Import {
        /// JSON file with an id → bool object
        file: PathBuf,
    },
    /// Print the shareable link for the current route
    Link,
    /// Interactive session on stdin
    Shell,
}

impl GlobalArgs {
    /// Configuration file merged with flag overrides
    ///
    /// # Errors
    /// Configuration file read or parse failures.
    pub fn config(&self) -> anyhow::Result<TrackerConfig> {
        let mut config = match &self.config {
            Some(path) => TrackerConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => TrackerConfig::default(),
        };
        if let Some(data) = &self.data {
            config = config.with_data(data.clone());
        }
        if let Some(state) = &self.state {
            config = config.with_state_file(state.clone());
        }
        Ok(config)
    }

    /// Tracker for these flags, not yet booted
    ///
    /// # Errors
    /// Configuration, storage, or link failures.
    pub fn tracker(&self) -> anyhow::Result<Tracker> {
        let config = self.config()?;
        let mut tracker = Tracker::from_config(config).context("opening tracker")?;
        let mut location = match &self.link {
            Some(link) => Location::parse(link).with_context(|| format!("invalid link {link}"))?,
            None => tracker.location().clone(),
        };
        if let Some(route) = &self.route {
            location.set_route_param(route);
        }
        tracker.set_location(location);
        Ok(tracker)
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
