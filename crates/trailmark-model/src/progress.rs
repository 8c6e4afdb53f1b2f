//! Completion counting

use crate::document::{Phase, RouteDocument};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Read side of a completion map
pub trait CompletionLookup {
    /// Whether the item is marked complete; unknown ids are incomplete
    fn is_complete(&self, id: &str) -> bool;
}

impl CompletionLookup for HashMap<String, bool> {
    fn is_complete(&self, id: &str) -> bool {
        self.get(id).copied().unwrap_or(false)
    }
}

impl CompletionLookup for BTreeMap<String, bool> {
    fn is_complete(&self, id: &str) -> bool {
        self.get(id).copied().unwrap_or(false)
    }
}

/// Done/total counts with a rounded percentage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Completed items
    pub done: usize,
    /// All items
    pub total: usize,
    /// `round(100 * done / total)`, 0 when total is 0
    pub percent: u8,
}

impl Progress {
    /// Build from counts
    #[must_use]
    pub fn new(done: usize, total: usize) -> Self {
        Self {
            done,
            total,
            percent: percent(done, total),
        }
    }

    /// Progress over one phase
    #[must_use]
    pub fn of_phase(phase: &Phase, completion: &dyn CompletionLookup) -> Self {
        let (done, total) = phase.items().fold((0, 0), |(d, t), item| {
            (d + usize::from(completion.is_complete(&item.id)), t + 1)
        });
        Self::new(done, total)
    }

    /// Progress over a whole route
    #[must_use]
    pub fn of_document(doc: &RouteDocument, completion: &dyn CompletionLookup) -> Self {
        doc.phases
            .iter()
            .map(|p| Self::of_phase(p, completion))
            .fold(Self::default(), Self::combine)
    }

    /// Sum two progress values
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self::new(self.done + other.done, self.total + other.total)
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Item, Section};
    use crate::item_type::ItemType;
    use proptest::prelude::*;

    #[test]
    fn empty_total_is_zero_percent() {
        assert_eq!(Progress::new(0, 0).percent, 0);
    }

    #[test]
    fn one_of_three_rounds_to_33() {
        assert_eq!(Progress::new(1, 3).percent, 33);
        assert_eq!(Progress::new(2, 3).percent, 67);
        assert_eq!(Progress::new(1, 2).percent, 50);
    }

    #[test]
    fn phase_and_document_progress() {
        let phase = Phase::new("p1", "T").with_section(
            Section::new("S")
                .with_item(Item::new("a", ItemType::Boss, "A"))
                .with_item(Item::new("b", ItemType::Map, "B")),
        );
        let doc = RouteDocument::new(vec![phase.clone(), Phase::new("p2", "Empty")]);
        let mut done = HashMap::new();
        done.insert("a".to_string(), true);
        done.insert("orphan".to_string(), true);

        assert_eq!(Progress::of_phase(&phase, &done), Progress::new(1, 2));
        assert_eq!(Progress::of_document(&doc, &done), Progress::new(1, 2));
        assert_eq!(Progress::of_phase(&doc.phases[1], &done).percent, 0);
    }

    proptest! {
        #[test]
        fn percent_is_bounded(total in 0usize..10_000, frac in 0.0f64..=1.0) {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let done = (total as f64 * frac) as usize;
            let p = Progress::new(done, total);
            prop_assert!(p.percent <= 100);
            if done == total && total > 0 {
                prop_assert_eq!(p.percent, 100);
            }
        }
    }
}
