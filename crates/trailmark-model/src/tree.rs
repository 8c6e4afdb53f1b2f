//! In-session mutations of the route tree
//!
//! Moves resolve every target before touching the tree, so an unresolved move
//! leaves the document exactly as it was.

use crate::document::{Item, RouteDocument, Section};
use crate::error::TreeError;
use crate::item_type::ItemType;
use rand::Rng;

/// Position of an item inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemLocation {
    /// Phase index
    pub phase: usize,
    /// Section index within the phase
    pub section: usize,
    /// Item index within the section
    pub item: usize,
}

/// Result of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Item now sits at the end of the target section
    Moved,
    /// Target already held that id; the moved copy was dropped
    DroppedDuplicate,
    /// Item, phase, or section not found; nothing changed
    Unresolved,
}

impl MoveOutcome {
    /// Whether the tree changed
    #[inline]
    #[must_use]
    pub fn changed(self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 4;

/// Lowercase `label`, collapsing each run of characters outside `[a-z0-9]` to `-`
#[must_use]
pub fn slugify(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_gap = false;
    for c in label.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push('-');
            in_gap = true;
        }
    }
    out
}

fn random_suffix<R: Rng>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| char::from(SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())]))
        .collect()
}

impl RouteDocument {
    /// Locate an item by id (first occurrence in document order)
    #[must_use]
    pub fn find_item(&self, item_id: &str) -> Option<ItemLocation> {
        self.phases.iter().enumerate().find_map(|(pi, phase)| {
            phase.sections.iter().enumerate().find_map(|(si, section)| {
                section
                    .items
                    .iter()
                    .position(|it| it.id == item_id)
                    .map(|ii| ItemLocation {
                        phase: pi,
                        section: si,
                        item: ii,
                    })
            })
        })
    }

    /// Item by id
    #[must_use]
    pub fn item(&self, item_id: &str) -> Option<&Item> {
        let loc = self.find_item(item_id)?;
        Some(&self.phases[loc.phase].sections[loc.section].items[loc.item])
    }

    /// Move an item to the end of another section
    ///
    /// Unknown items or targets are a silent no-op; the caller re-renders
    /// either way.
    pub fn move_item(
        &mut self,
        item_id: &str,
        target_phase_id: &str,
        target_section_index: usize,
    ) -> MoveOutcome {
        let Some(from) = self.find_item(item_id) else {
            return MoveOutcome::Unresolved;
        };
        let Some(to_phase) = self.phases.iter().position(|p| p.id == target_phase_id) else {
            return MoveOutcome::Unresolved;
        };
        if target_section_index >= self.phases[to_phase].sections.len() {
            return MoveOutcome::Unresolved;
        }

        let moved = self.phases[from.phase].sections[from.section]
            .items
            .remove(from.item);
        let target = &mut self.phases[to_phase].sections[target_section_index].items;
        if target.iter().any(|it| it.id == moved.id) {
            tracing::debug!(item = %moved.id, "move target already holds item, dropping copy");
            return MoveOutcome::DroppedDuplicate;
        }
        tracing::debug!(
            item = %moved.id,
            phase = target_phase_id,
            section = target_section_index,
            "moved item"
        );
        target.push(moved);
        MoveOutcome::Moved
    }

    /// Add a user-defined item to the custom section of the anchor phase
    ///
    /// # Errors
    /// - [`TreeError::EmptyLabel`] for a blank label
    /// - [`TreeError::AnchorPhaseMissing`] when the anchor phase is absent
    pub fn add_custom_item(
        &mut self,
        label: &str,
        item_type: ItemType,
        anchor_phase_id: &str,
        section_name: &str,
    ) -> Result<Item, TreeError> {
        self.add_custom_item_with_rng(
            label,
            item_type,
            anchor_phase_id,
            section_name,
            &mut rand::rng(),
        )
    }

    /// [`Self::add_custom_item`] with a caller-supplied random source
    ///
    /// # Errors
    /// Same as [`Self::add_custom_item`].
    pub fn add_custom_item_with_rng<R: Rng>(
        &mut self,
        label: &str,
        item_type: ItemType,
        anchor_phase_id: &str,
        section_name: &str,
        rng: &mut R,
    ) -> Result<Item, TreeError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(TreeError::EmptyLabel);
        }
        let phase = self
            .phases
            .iter_mut()
            .find(|p| p.id == anchor_phase_id)
            .ok_or_else(|| TreeError::AnchorPhaseMissing(anchor_phase_id.to_string()))?;

        let id = format!("cust-{}-{}", slugify(label), random_suffix(rng));
        let item = Item::new(id, item_type, label);

        let index = match phase.sections.iter().position(|s| s.name == section_name) {
            Some(i) => i,
            None => {
                phase.sections.push(Section::new(section_name));
                phase.sections.len() - 1
            }
        };
        phase.sections[index].items.push(item.clone());
        tracing::debug!(item = %item.id, phase = anchor_phase_id, "added custom item");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Phase;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn doc() -> RouteDocument {
        RouteDocument::new(vec![
            Phase::new("p1", "One")
                .with_section(
                    Section::new("A")
                        .with_item(Item::new("a1", ItemType::Boss, "A1"))
                        .with_item(Item::new("a2", ItemType::Gear, "A2"))
                        .with_item(Item::new("a3", ItemType::Map, "A3")),
                )
                .with_section(Section::new("B").with_item(Item::new("b1", ItemType::Npc, "B1"))),
            Phase::new("p2", "Two").with_section(Section::new("C")),
        ])
    }

    #[test]
    fn slugify_collapses_runs() {
        assert_eq!(slugify("Kill Margit!!"), "kill-margit-");
        assert_eq!(slugify("  Röd  Key "), "-r-d-key-");
        assert_eq!(slugify("abc123"), "abc123");
    }

    #[test]
    fn move_appends_to_target_and_keeps_source_order() {
        let mut d = doc();
        assert_eq!(d.move_item("a2", "p2", 0), MoveOutcome::Moved);
        assert_eq!(d.section_item_ids("p1", 0), vec!["a1", "a3"]);
        assert_eq!(d.section_item_ids("p2", 0), vec!["a2"]);
    }

    #[test]
    fn move_within_same_section_goes_to_end() {
        let mut d = doc();
        assert_eq!(d.move_item("a1", "p1", 0), MoveOutcome::Moved);
        assert_eq!(d.section_item_ids("p1", 0), vec!["a2", "a3", "a1"]);
    }

    #[test]
    fn unresolved_moves_leave_tree_unchanged() {
        let mut d = doc();
        let before = d.clone();
        assert_eq!(d.move_item("nope", "p2", 0), MoveOutcome::Unresolved);
        assert_eq!(d.move_item("a1", "p9", 0), MoveOutcome::Unresolved);
        assert_eq!(d.move_item("a1", "p2", 3), MoveOutcome::Unresolved);
        assert_eq!(d, before);
    }

    #[test]
    fn duplicate_in_target_is_dropped() {
        let mut d = doc();
        d.phases[1].sections[0]
            .items
            .push(Item::new("a1", ItemType::Boss, "A1 copy"));
        assert_eq!(d.move_item("a1", "p2", 0), MoveOutcome::DroppedDuplicate);
        assert_eq!(d.section_item_ids("p2", 0), vec!["a1"]);
        assert_eq!(d.section_item_ids("p1", 0), vec!["a2", "a3"]);
    }

    #[test]
    fn custom_item_creates_section_once() {
        let mut d = doc();
        let mut rng = StdRng::seed_from_u64(7);
        let first = d
            .add_custom_item_with_rng("  Find Key ", ItemType::Quest, "p1", "Custom", &mut rng)
            .unwrap();
        let second = d
            .add_custom_item_with_rng("Other", ItemType::Warning, "p1", "Custom", &mut rng)
            .unwrap();

        assert_eq!(first.label, "Find Key");
        assert!(first.id.starts_with("cust-find-key-"));
        assert_eq!(first.id.len(), "cust-find-key-".len() + 4);
        let sections = &d.phase("p1").unwrap().sections;
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[2].name, "Custom");
        assert_eq!(sections[2].items, vec![first, second]);
    }

    #[test]
    fn custom_item_reuses_existing_section() {
        let mut d = doc();
        d.phases[0].sections.insert(0, Section::new("Custom"));
        d.add_custom_item("x", ItemType::Ash, "p1", "Custom").unwrap();
        assert_eq!(d.phases[0].sections.len(), 3);
        assert_eq!(d.phases[0].sections[0].items.len(), 1);
    }

    #[test]
    fn custom_item_rejects_blank_label() {
        let mut d = doc();
        let before = d.clone();
        assert_eq!(
            d.add_custom_item(" \t ", ItemType::Boss, "p1", "Custom"),
            Err(TreeError::EmptyLabel)
        );
        assert_eq!(d, before);
    }

    #[test]
    fn custom_item_requires_anchor_phase() {
        let mut d = doc();
        assert_eq!(
            d.add_custom_item("x", ItemType::Boss, "p7", "Custom"),
            Err(TreeError::AnchorPhaseMissing("p7".to_string()))
        );
    }
}
