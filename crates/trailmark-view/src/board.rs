//! Board view model

use crate::filter::{Expansion, FilterState};
use serde::Serialize;
use trailmark_model::{CompletionLookup, ItemType, Progress, RouteDocument};

/// Status shown when a route has no phases
pub const NO_PHASES_STATUS: &str = "No phases for this route.";

/// One visible checklist row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    /// Item id
    pub id: String,
    /// Display label
    pub label: String,
    /// Category
    pub item_type: ItemType,
    /// Checkbox state
    pub done: bool,
}

/// One section of a phase card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    /// Index within the phase, the move target address
    pub index: usize,
    /// Display name
    pub name: String,
    /// Items in the section, visible or not
    pub item_count: usize,
    /// Whether the section is expanded
    pub open: bool,
    /// Rows that passed the filters, in document order
    pub rows: Vec<ItemRow>,
}

/// One phase card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseView {
    /// Phase id
    pub id: String,
    /// Tag shown before the title
    pub tag: String,
    /// Title
    pub title: String,
    /// Completion over every item of the phase
    pub progress: Progress,
    /// Whether the card is expanded
    pub open: bool,
    /// Sections in document order
    pub sections: Vec<SectionView>,
}

/// Whole rendered board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// Phase cards in document order
    pub phases: Vec<PhaseView>,
    /// Completion over the whole route
    pub global: Progress,
    /// Message that replaces the progress line, if any
    pub status: Option<String>,
}

impl BoardView {
    /// Board for a route with no phases
    #[must_use]
    pub fn empty() -> Self {
        Self {
            phases: Vec::new(),
            global: Progress::default(),
            status: Some(NO_PHASES_STATUS.to_string()),
        }
    }

    /// Replace the progress line with a status message
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Number of visible rows
    #[must_use]
    pub fn visible_rows(&self) -> usize {
        self.phases
            .iter()
            .flat_map(|p| &p.sections)
            .map(|s| s.rows.len())
            .sum()
    }

    /// Phase card by id
    #[must_use]
    pub fn phase(&self, id: &str) -> Option<&PhaseView> {
        self.phases.iter().find(|p| p.id == id)
    }
}

/// Project a document into a board
///
/// Pure: same inputs, same board. Ordering is document order.
#[must_use]
pub fn render_board(
    doc: &RouteDocument,
    completion: &dyn CompletionLookup,
    filter: &FilterState,
    expansion: &Expansion,
) -> BoardView {
    if doc.is_empty() {
        return BoardView::empty();
    }

    let phases: Vec<PhaseView> = doc
        .phases
        .iter()
        .enumerate()
        .map(|(phase_index, phase)| {
            let sections = phase
                .sections
                .iter()
                .enumerate()
                .map(|(index, section)| SectionView {
                    index,
                    name: section.name.clone(),
                    item_count: section.items.len(),
                    open: expansion.is_section_open(phase_index, index),
                    rows: section
                        .items
                        .iter()
                        .filter_map(|item| {
                            let done = completion.is_complete(&item.id);
                            filter.shows(item, done).then(|| ItemRow {
                                id: item.id.clone(),
                                label: item.label.clone(),
                                item_type: item.item_type,
                                done,
                            })
                        })
                        .collect(),
                })
                .collect();

            PhaseView {
                id: phase.id.clone(),
                tag: phase.display_tag().to_string(),
                title: phase.title.clone(),
                progress: Progress::of_phase(phase, completion),
                open: expansion.is_phase_open(phase_index),
                sections,
            }
        })
        .collect();

    let global = phases
        .iter()
        .map(|p| p.progress)
        .fold(Progress::default(), Progress::combine);

    BoardView {
        phases,
        global,
        status: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use trailmark_model::{Item, Phase, Section};

    fn doc() -> RouteDocument {
        RouteDocument::new(vec![Phase::new("p1", "Limgrave").with_section(
            Section::new("Bosses")
                .with_item(Item::new("i1", ItemType::Boss, "Margit"))
                .with_item(Item::new("i2", ItemType::Map, "Map: Limgrave West")),
        )])
    }

    #[test]
    fn empty_document_shows_status() {
        let board = render_board(
            &RouteDocument::default(),
            &HashMap::new(),
            &FilterState::new(),
            &Expansion::default(),
        );
        assert_eq!(board.status.as_deref(), Some(NO_PHASES_STATUS));
        assert_eq!(board.global.percent, 0);
    }

    #[test]
    fn filters_hide_rows_but_not_progress() {
        let mut done = HashMap::new();
        done.insert("i1".to_string(), true);
        let filter = FilterState::new().with_incomplete_only(true);
        let board = render_board(&doc(), &done, &filter, &Expansion::default());

        assert_eq!(board.visible_rows(), 1);
        assert_eq!(board.phases[0].sections[0].item_count, 2);
        assert_eq!(board.phases[0].progress, Progress::new(1, 2));
        assert_eq!(board.global, Progress::new(1, 2));
    }

    #[test]
    fn default_tag_and_open_state() {
        let mut expansion = Expansion::default();
        expansion.toggle_section(0, 0);
        let board = render_board(&doc(), &HashMap::new(), &FilterState::new(), &expansion);
        let phase = board.phase("p1").unwrap();
        assert_eq!(phase.tag, "Phase");
        assert!(phase.open);
        assert!(!phase.sections[0].open);
    }

    #[test]
    fn phases_without_ids_collapse_independently() {
        let doc = RouteDocument::new(vec![
            Phase::new("", "First").with_section(
                Section::new("S").with_item(Item::new("a", ItemType::Boss, "A")),
            ),
            Phase::new("", "Second").with_section(
                Section::new("S").with_item(Item::new("b", ItemType::Boss, "B")),
            ),
        ]);
        let mut expansion = Expansion::default();
        expansion.toggle_phase(1);
        let board = render_board(&doc, &HashMap::new(), &FilterState::new(), &expansion);
        assert!(board.phases[0].open);
        assert!(!board.phases[1].open);
    }
}
