//! One-shot subcommands

use crate::{shell, Command, GlobalArgs, SessionCommand};
use anyhow::{anyhow, bail, Context};
use std::io::Write;
use std::path::{Path, PathBuf};
use trailmark_model::{ItemType, RouteDocument, ValidationReport};
use trailmark_session::Tracker;
use trailmark_view::{progress_line, render_text};

/// Run one subcommand, writing user-facing output to `out`
///
/// # Errors
/// Any failure of the command; load failures carry the status message.
pub async fn execute(
    global: &GlobalArgs,
    command: &Command,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let command = match command {
        Command::Validate { file } => return validate(file, out),
        Command::Session(command) => command,
    };
    let mut tracker = global.tracker()?;
    boot(&mut tracker).await?;

    match command {
        SessionCommand::Routes => routes(&tracker, out),
        SessionCommand::Show {
            types,
            incomplete,
            search,
            collapsed,
        } => {
            if !types.is_empty() {
                let wanted = types
                    .iter()
                    .map(|t| t.parse::<ItemType>())
                    .collect::<Result<Vec<_>, _>>()?;
                let filter = tracker.filter_mut();
                filter.active_types = wanted.into_iter().collect();
            }
            tracker.filter_mut().incomplete_only = *incomplete;
            if let Some(query) = search {
                tracker.filter_mut().set_search(query);
            }
            if *collapsed {
                tracker.expansion_mut().collapse_all();
            }
            write!(out, "{}", render_text(&tracker.render()))?;
            Ok(())
        }
        SessionCommand::Check { ids } => set_items(&mut tracker, ids, true, out),
        SessionCommand::Uncheck { ids } => set_items(&mut tracker, ids, false, out),
        SessionCommand::ResetPhase { phase } => {
            let count = tracker.mark_phase_incomplete(phase)?;
            writeln!(out, "Reset {count} item(s) in {phase}")?;
            writeln!(out, "{}", progress_line(tracker.render().global))?;
            Ok(())
        }
        SessionCommand::Export { out: path } => export(&tracker, path.as_deref(), out),
        SessionCommand::Import { file } => import(&mut tracker, file, out),
        SessionCommand::Link => {
            writeln!(out, "{}", tracker.location())?;
            Ok(())
        }
        SessionCommand::Shell => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run(&mut tracker, stdin, out).await
        }
    }
}

/// Boot the tracker; a failed boot reports the status line
pub(crate) async fn boot(tracker: &mut Tracker) -> anyhow::Result<()> {
    if let Err(e) = tracker.boot().await {
        return Err(match tracker.status() {
            Some(status) => anyhow!("{status}"),
            None => e.into(),
        });
    }
    Ok(())
}

fn validate(file: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| anyhow!("Invalid JSON in {}: {e}", file.display()))?;

    let report = ValidationReport::of(&value);
    if !report.is_valid() {
        writeln!(out, "{}", report.summary(report.len()))?;
        bail!("{}: {} schema error(s)", file.display(), report.len());
    }

    let document = RouteDocument::from_value(value)?;
    writeln!(
        out,
        "{}: OK ({} phases, {} items)",
        file.display(),
        document.phases.len(),
        document.item_count()
    )?;
    for id in document.duplicate_item_ids() {
        writeln!(out, "warning: duplicate item id {id}")?;
    }
    Ok(())
}

pub(crate) fn routes(tracker: &Tracker, out: &mut dyn Write) -> anyhow::Result<()> {
    let manifest = tracker
        .manifest()
        .ok_or_else(|| anyhow!("routes manifest not loaded"))?;
    let current = tracker.route_id();
    for entry in &manifest.routes {
        let marker = if Some(entry.id.as_str()) == current { '*' } else { ' ' };
        let default = if entry.id == manifest.default { " (default)" } else { "" };
        writeln!(out, "{marker} {}  {}{default}", entry.id, entry.name)?;
    }
    Ok(())
}

fn set_items(
    tracker: &mut Tracker,
    ids: &[String],
    done: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    for id in ids {
        tracker.set_complete(id, done)?;
    }
    writeln!(out, "{}", progress_line(tracker.render().global))?;
    Ok(())
}

pub(crate) fn export(
    tracker: &Tracker,
    path: Option<&Path>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let export = tracker.export_progress()?;
    let path = path.map_or_else(|| PathBuf::from(&export.file_name), Path::to_path_buf);
    std::fs::write(&path, &export.body).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported progress");
    writeln!(out, "Exported {}", path.display())?;
    Ok(())
}

pub(crate) fn import(
    tracker: &mut Tracker,
    file: &Path,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let count = tracker
        .import_progress(&text)
        .with_context(|| format!("importing {}", file.display()))?;
    writeln!(out, "Imported {count} entries")?;
    writeln!(out, "{}", progress_line(tracker.render().global))?;
    Ok(())
}
