//! Interactive session
//!
//! Reads one command per line and re-renders after every change. Moves and
//! custom items live only as long as the session (or until the route is
//! reloaded); completion changes are persisted immediately.

use crate::commands;
use anyhow::{anyhow, bail, Context};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use trailmark_model::{ItemType, MoveOutcome};
use trailmark_session::Tracker;
use trailmark_view::{render_filters, render_text};

const PROMPT: &str = "trailmark> ";

const HELP: &str = "\
commands:
  show                              print the checklist
  phases                            list phase ids and section indices
  check <id> | uncheck <id>         set one item
  toggle <id>                       flip one item
  toggle-section <phase> <n> [off]  set every visible item of a section
  reset-phase <phase>               mark a whole phase incomplete
  move <id> <phase> <n>             move an item to the end of section n
  add <type> <label...>             add a custom item
  filter [type]                     toggle a type filter, or list filters
  search [text...]                  filter by label; no text clears
  incomplete                        toggle hiding completed items
  expand [phase] | collapse [phase] open or close one phase or all
  route <id> | routes               switch route, list routes
  export [path] | import <path>     save or load the completion map
  link                              print the shareable link
  quit";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Print the command list
    Help,
    /// Render the board
    Show,
    /// List phases
    Phases,
    /// Set one item
    Set {
        /// Item id
        id: String,
        /// New flag
        done: bool,
    },
    /// Flip one item
    Toggle(String),
    /// Set visible items of a section
    ToggleSection {
        /// Phase id
        phase: String,
        /// Section index
        index: usize,
        /// New flag
        done: bool,
    },
    /// Clear a phase
    ResetPhase(String),
    /// Move an item
    Move {
        /// Item id
        id: String,
        /// Target phase id
        phase: String,
        /// Target section index
        index: usize,
    },
    /// Add a custom item
    Add {
        /// Category
        item_type: ItemType,
        /// Label
        label: String,
    },
    /// Toggle one type, or list filters when `None`
    Filter(Option<ItemType>),
    /// Replace the search query
    Search(String),
    /// Toggle incomplete-only
    Incomplete,
    /// Expand one phase or everything
    Expand(Option<String>),
    /// Collapse one phase or everything
    Collapse(Option<String>),
    /// Switch route
    Route(String),
    /// List routes
    Routes,
    /// Export progress
    Export(Option<PathBuf>),
    /// Import progress
    Import(PathBuf),
    /// Print the link
    Link,
    /// Leave the shell
    Quit,
}

fn index_arg(text: Option<&str>) -> anyhow::Result<usize> {
    let text = text.ok_or_else(|| anyhow!("missing section index"))?;
    text.parse()
        .with_context(|| format!("invalid section index '{text}'"))
}

fn required<'a>(arg: Option<&'a str>, what: &str) -> anyhow::Result<&'a str> {
    arg.ok_or_else(|| anyhow!("missing {what}"))
}

/// Parse one input line; blank lines parse to `None`
///
/// # Errors
/// Unknown commands and missing or malformed arguments.
pub fn parse_line(line: &str) -> anyhow::Result<Option<ShellCommand>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest = |words: std::str::SplitWhitespace<'_>| words.collect::<Vec<_>>().join(" ");

    let command = match head {
        "help" | "?" => ShellCommand::Help,
        "show" | "ls" => ShellCommand::Show,
        "phases" => ShellCommand::Phases,
        "check" | "uncheck" => ShellCommand::Set {
            id: required(words.next(), "item id")?.to_string(),
            done: head == "check",
        },
        "toggle" => ShellCommand::Toggle(required(words.next(), "item id")?.to_string()),
        "toggle-section" => {
            let phase = required(words.next(), "phase id")?.to_string();
            let index = index_arg(words.next())?;
            let done = match words.next() {
                None | Some("on") => true,
                Some("off") => false,
                Some(other) => bail!("expected 'on' or 'off', got '{other}'"),
            };
            ShellCommand::ToggleSection { phase, index, done }
        }
        "reset-phase" => ShellCommand::ResetPhase(required(words.next(), "phase id")?.to_string()),
        "move" => ShellCommand::Move {
            id: required(words.next(), "item id")?.to_string(),
            phase: required(words.next(), "phase id")?.to_string(),
            index: index_arg(words.next())?,
        },
        "add" => {
            let item_type = required(words.next(), "item type")?.parse::<ItemType>()?;
            ShellCommand::Add {
                item_type,
                label: rest(words),
            }
        }
        "filter" => ShellCommand::Filter(words.next().map(str::parse::<ItemType>).transpose()?),
        "search" => ShellCommand::Search(rest(words)),
        "incomplete" => ShellCommand::Incomplete,
        "expand" => ShellCommand::Expand(words.next().map(str::to_string)),
        "collapse" => ShellCommand::Collapse(words.next().map(str::to_string)),
        "route" => ShellCommand::Route(required(words.next(), "route id")?.to_string()),
        "routes" => ShellCommand::Routes,
        "export" => ShellCommand::Export(words.next().map(PathBuf::from)),
        "import" => ShellCommand::Import(PathBuf::from(required(words.next(), "file")?)),
        "link" => ShellCommand::Link,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

fn board(tracker: &Tracker, out: &mut dyn Write) -> anyhow::Result<()> {
    write!(out, "{}", render_text(&tracker.render()))?;
    Ok(())
}

fn set_phase_open(tracker: &mut Tracker, phase: Option<&str>, open: bool) -> anyhow::Result<()> {
    let index = match phase {
        Some(id) => Some(
            tracker
                .session()
                .and_then(|s| s.document().phases.iter().position(|p| p.id == id))
                .ok_or_else(|| anyhow!("phase '{id}' not found in this route"))?,
        ),
        None => None,
    };
    let expansion = tracker.expansion_mut();
    match index {
        None if open => expansion.expand_all(),
        None => expansion.collapse_all(),
        Some(index) => {
            if expansion.is_phase_open(index) != open {
                expansion.toggle_phase(index);
            }
        }
    }
    Ok(())
}

/// Apply one command; returns `false` when the shell should exit
///
/// # Errors
/// Failures of the underlying tracker operation. Route load failures are
/// reported through the status line, not as errors.
pub async fn apply(
    tracker: &mut Tracker,
    command: ShellCommand,
    out: &mut dyn Write,
) -> anyhow::Result<bool> {
    match command {
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Show => board(tracker, out)?,
        ShellCommand::Phases => {
            let session = tracker
                .session()
                .ok_or_else(|| anyhow!("no route loaded"))?;
            for phase in &session.document().phases {
                writeln!(out, "{}  {}", phase.id, phase.title)?;
                for (i, section) in phase.sections.iter().enumerate() {
                    writeln!(out, "  {i}. {}", section.name)?;
                }
            }
        }
        ShellCommand::Set { id, done } => {
            tracker.set_complete(&id, done)?;
            board(tracker, out)?;
        }
        ShellCommand::Toggle(id) => {
            tracker.toggle(&id)?;
            board(tracker, out)?;
        }
        ShellCommand::ToggleSection { phase, index, done } => {
            tracker.set_section(&phase, index, done)?;
            board(tracker, out)?;
        }
        ShellCommand::ResetPhase(phase) => {
            tracker.mark_phase_incomplete(&phase)?;
            board(tracker, out)?;
        }
        ShellCommand::Move { id, phase, index } => {
            if tracker.move_item(&id, &phase, index) == MoveOutcome::Unresolved {
                tracing::debug!(item = %id, phase = %phase, index, "move ignored");
            }
            board(tracker, out)?;
        }
        ShellCommand::Add { item_type, label } => {
            let item = tracker.add_custom_item(&label, item_type)?;
            writeln!(out, "Added {}", item.id)?;
            board(tracker, out)?;
        }
        ShellCommand::Filter(None) => writeln!(out, "{}", render_filters(tracker.filter()))?,
        ShellCommand::Filter(Some(item_type)) => {
            tracker.filter_mut().toggle_type(item_type);
            writeln!(out, "{}", render_filters(tracker.filter()))?;
            board(tracker, out)?;
        }
        ShellCommand::Search(query) => {
            tracker.filter_mut().set_search(&query);
            board(tracker, out)?;
        }
        ShellCommand::Incomplete => {
            let filter = tracker.filter_mut();
            filter.incomplete_only = !filter.incomplete_only;
            board(tracker, out)?;
        }
        ShellCommand::Expand(phase) => {
            set_phase_open(tracker, phase.as_deref(), true)?;
            board(tracker, out)?;
        }
        ShellCommand::Collapse(phase) => {
            set_phase_open(tracker, phase.as_deref(), false)?;
            board(tracker, out)?;
        }
        ShellCommand::Route(id) => {
            if let Err(e) = tracker.select_route(&id).await {
                tracing::debug!(error = %e, "route change failed");
            }
            board(tracker, out)?;
        }
        ShellCommand::Routes => commands::routes(tracker, out)?,
        ShellCommand::Export(path) => commands::export(tracker, path.as_deref(), out)?,
        ShellCommand::Import(path) => commands::import(tracker, &path, out)?,
        ShellCommand::Link => writeln!(out, "{}", tracker.location())?,
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Run the shell until end of input or `quit`
///
/// Errors from individual commands are printed and the session continues.
///
/// # Errors
/// Only input/output failures end the shell with an error.
pub async fn run<R>(tracker: &mut Tracker, input: R, out: &mut dyn Write) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    board(tracker, out)?;
    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {e:#}")?;
                continue;
            }
        };
        match apply(tracker, command, out).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => writeln!(out, "error: {e:#}")?,
        }
    }
    writeln!(out)?;
    Ok(())
}
