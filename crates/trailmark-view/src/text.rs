//! Plain-text rendering of a board

use crate::board::BoardView;
use crate::filter::FilterState;
use std::fmt::Write;
use trailmark_model::{ItemType, Progress};

const BAR_CELLS: usize = 20;

fn bar(progress: Progress) -> String {
    let filled = usize::from(progress.percent) * BAR_CELLS / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_CELLS - filled))
}

/// Global progress line, e.g. `Global Progress: 1/3 (33%)`
#[must_use]
pub fn progress_line(progress: Progress) -> String {
    format!(
        "Global Progress: {}/{} ({}%)",
        progress.done, progress.total, progress.percent
    )
}

/// Render the board for a terminal
///
/// Collapsed phases show only their header; collapsed sections only their name.
#[must_use]
pub fn render_text(board: &BoardView) -> String {
    let mut out = String::new();

    for phase in &board.phases {
        let marker = if phase.open { 'v' } else { '>' };
        let _ = writeln!(
            out,
            "{marker} [{}] {}  {}/{} completed {}",
            phase.tag,
            phase.title,
            phase.progress.done,
            phase.progress.total,
            bar(phase.progress)
        );
        if !phase.open {
            continue;
        }
        for section in &phase.sections {
            let marker = if section.open { 'v' } else { '>' };
            let _ = writeln!(
                out,
                "  {marker} {}. {} ({})",
                section.index, section.name, section.item_count
            );
            if !section.open {
                continue;
            }
            for row in &section.rows {
                let check = if row.done { 'x' } else { ' ' };
                let _ = writeln!(
                    out,
                    "      [{check}] {}  <{}>  ({})",
                    row.label, row.item_type, row.id
                );
            }
        }
        out.push('\n');
    }

    match &board.status {
        Some(status) => out.push_str(status),
        None => out.push_str(&progress_line(board.global)),
    }
    out.push('\n');
    out
}

/// Filter chips: active categories in brackets, inactive in parentheses
#[must_use]
pub fn render_filters(filter: &FilterState) -> String {
    ItemType::ALL
        .iter()
        .map(|ty| {
            if filter.is_active(*ty) {
                format!("[{ty}]")
            } else {
                format!("({ty})")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(Progress::new(0, 0)), format!("[{}]", "-".repeat(20)));
        assert_eq!(bar(Progress::new(1, 2)), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(bar(Progress::new(3, 3)), format!("[{}]", "#".repeat(20)));
    }

    #[test]
    fn progress_line_format() {
        assert_eq!(progress_line(Progress::new(1, 3)), "Global Progress: 1/3 (33%)");
    }

    #[test]
    fn filter_chips() {
        let mut f = FilterState::new();
        f.toggle_type(ItemType::Npc);
        let chips = render_filters(&f);
        assert!(chips.starts_with("[boss] [dungeon] (npc) [gear]"));
    }
}
