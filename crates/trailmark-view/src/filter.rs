//! Filter and expand/collapse state

use std::collections::BTreeSet;
use trailmark_model::{Item, ItemType};

/// Which items the board shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Categories currently shown
    pub active_types: BTreeSet<ItemType>,
    /// Hide completed items
    pub incomplete_only: bool,
    search: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active_types: ItemType::ALL.into_iter().collect(),
            incomplete_only: false,
            search: String::new(),
        }
    }
}

impl FilterState {
    /// Everything visible
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one category on or off
    pub fn toggle_type(&mut self, ty: ItemType) {
        if !self.active_types.remove(&ty) {
            self.active_types.insert(ty);
        }
    }

    /// Whether a category is shown
    #[inline]
    #[must_use]
    pub fn is_active(&self, ty: ItemType) -> bool {
        self.active_types.contains(&ty)
    }

    /// Set the search text; matching is trimmed and case-insensitive
    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_lowercase();
    }

    /// Normalized search text
    #[inline]
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Builder-style incomplete-only flag
    #[must_use]
    pub fn with_incomplete_only(mut self, on: bool) -> Self {
        self.incomplete_only = on;
        self
    }

    /// Builder-style search
    #[must_use]
    pub fn with_search(mut self, query: &str) -> Self {
        self.set_search(query);
        self
    }

    /// Whether an item passes every filter
    #[must_use]
    pub fn shows(&self, item: &Item, done: bool) -> bool {
        if !self.is_active(item.item_type) {
            return false;
        }
        if self.incomplete_only && done {
            return false;
        }
        self.search.is_empty() || item.label.to_lowercase().contains(&self.search)
    }
}

/// Open/closed state of phase cards and their sections
///
/// Keyed by position in the document, so phases without an id still collapse
/// independently. Everything starts open; `collapse_all`/`expand_all` reset
/// per-card toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    default_open: bool,
    toggled_phases: BTreeSet<usize>,
    toggled_sections: BTreeSet<(usize, usize)>,
}

impl Default for Expansion {
    fn default() -> Self {
        Self {
            default_open: true,
            toggled_phases: BTreeSet::new(),
            toggled_sections: BTreeSet::new(),
        }
    }
}

impl Expansion {
    /// Open everything
    pub fn expand_all(&mut self) {
        *self = Self::default();
    }

    /// Close everything
    pub fn collapse_all(&mut self) {
        self.default_open = false;
        self.toggled_phases.clear();
        self.toggled_sections.clear();
    }

    /// Flip one phase card
    pub fn toggle_phase(&mut self, phase_index: usize) {
        if !self.toggled_phases.remove(&phase_index) {
            self.toggled_phases.insert(phase_index);
        }
    }

    /// Flip one section
    pub fn toggle_section(&mut self, phase_index: usize, section_index: usize) {
        let key = (phase_index, section_index);
        if !self.toggled_sections.remove(&key) {
            self.toggled_sections.insert(key);
        }
    }

    /// Whether a phase card is open
    #[must_use]
    pub fn is_phase_open(&self, phase_index: usize) -> bool {
        self.default_open ^ self.toggled_phases.contains(&phase_index)
    }

    /// Whether a section is open
    #[must_use]
    pub fn is_section_open(&self, phase_index: usize, section_index: usize) -> bool {
        self.default_open ^ self.toggled_sections.contains(&(phase_index, section_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(ty: ItemType, label: &str) -> Item {
        Item::new("x", ty, label)
    }

    #[test]
    fn default_shows_everything() {
        let f = FilterState::new();
        assert!(f.shows(&item(ItemType::Boss, "Margit"), true));
        assert!(f.shows(&item(ItemType::Warning, "Missable"), false));
    }

    #[test]
    fn type_toggle_hides_category() {
        let mut f = FilterState::new();
        f.toggle_type(ItemType::Boss);
        assert!(!f.shows(&item(ItemType::Boss, "Margit"), false));
        f.toggle_type(ItemType::Boss);
        assert!(f.shows(&item(ItemType::Boss, "Margit"), false));
    }

    #[test]
    fn incomplete_only_hides_done_items() {
        let f = FilterState::new().with_incomplete_only(true);
        assert!(!f.shows(&item(ItemType::Boss, "Margit"), true));
        assert!(f.shows(&item(ItemType::Boss, "Margit"), false));
    }

    #[test]
    fn search_is_trimmed_and_case_insensitive() {
        let f = FilterState::new().with_search("  MARG ");
        assert_eq!(f.search(), "marg");
        assert!(f.shows(&item(ItemType::Boss, "Margit the Fell"), false));
        assert!(!f.shows(&item(ItemType::Boss, "Godrick"), false));
    }

    #[test]
    fn expansion_toggles_and_resets() {
        let mut e = Expansion::default();
        assert!(e.is_phase_open(0));
        e.toggle_phase(0);
        assert!(!e.is_phase_open(0));
        assert!(e.is_phase_open(1));
        e.collapse_all();
        assert!(!e.is_phase_open(0));
        assert!(!e.is_section_open(1, 0));
        e.toggle_section(1, 0);
        assert!(e.is_section_open(1, 0));
        assert!(!e.is_section_open(0, 0));
        e.expand_all();
        assert!(e.is_section_open(1, 1));
        assert!(e.is_phase_open(0));
    }
}
