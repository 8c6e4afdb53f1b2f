//! Typed route document: phases → sections → items
//!
//! Documents are only built through [`RouteDocument::from_value`], which runs
//! the structural validator first.

use crate::error::ModelError;
use crate::item_type::ItemType;
use crate::validate::{validate_route, ValidationReport};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Tag shown for phases that do not declare one
pub const DEFAULT_PHASE_TAG: &str = "Phase";

/// Single trackable task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique across the whole document
    pub id: String,
    /// Category tag
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Display string
    pub label: String,
}

impl Item {
    /// Create an item
    #[must_use]
    pub fn new(id: impl Into<String>, item_type: ItemType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_type,
            label: label.into(),
        }
    }
}

/// Grouping of items within a phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Display name, not guaranteed unique
    pub name: String,
    /// Items in document order
    pub items: Vec<Item>,
}

impl Section {
    /// Create an empty section
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Builder-style item append
    #[must_use]
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }
}

/// Top-level grouping, rendered as a collapsible card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Unique within a document; used for move and custom-item targeting
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    /// Display title
    pub title: String,
    /// Optional short tag shown before the title
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub tag: Option<String>,
    /// Sections in document order
    pub sections: Vec<Section>,
}

impl Phase {
    /// Create an empty phase
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tag: None,
            sections: Vec::new(),
        }
    }

    /// Builder-style tag
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Builder-style section append
    #[must_use]
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Tag to display, falling back to [`DEFAULT_PHASE_TAG`]
    #[must_use]
    pub fn display_tag(&self) -> &str {
        self.tag.as_deref().unwrap_or(DEFAULT_PHASE_TAG)
    }

    /// All items of the phase in document order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }
}

/// Phase ids are unchecked by the validator: numbers and booleans keep their
/// JSON text, null becomes empty.
fn scalar_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn string_or_none<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A loaded progression route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDocument {
    /// Phases in document order
    pub phases: Vec<Phase>,
}

impl RouteDocument {
    /// Build from phases directly (trusted callers and tests)
    #[must_use]
    pub fn new(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    /// Validate raw JSON and convert it into the typed model
    ///
    /// # Errors
    /// [`ModelError::Schema`] with every violation when validation fails.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        let errors = validate_route(&value);
        if !errors.is_empty() {
            return Err(ModelError::Schema(ValidationReport::new(errors)));
        }
        let doc: Self = serde_json::from_value(value)?;

        let dupes = doc.duplicate_item_ids();
        if !dupes.is_empty() {
            tracing::warn!(count = dupes.len(), ids = ?dupes, "route document repeats item ids");
        }
        Ok(doc)
    }

    /// Parse JSON text, validate, and convert
    ///
    /// # Errors
    /// [`ModelError::Json`] for malformed text, otherwise as [`Self::from_value`].
    pub fn from_json_str(text: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// True when the route has no phases
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Every item in document order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.phases.iter().flat_map(Phase::items)
    }

    /// Total number of items
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    /// Phase with the given id
    #[must_use]
    pub fn phase(&self, phase_id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == phase_id)
    }

    /// Ids of every item in a phase, empty for unknown phases
    #[must_use]
    pub fn phase_item_ids(&self, phase_id: &str) -> Vec<String> {
        self.phase(phase_id)
            .map(|p| p.items().map(|it| it.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Ids of every item in a section, empty when the section does not exist
    #[must_use]
    pub fn section_item_ids(&self, phase_id: &str, section_index: usize) -> Vec<String> {
        self.phase(phase_id)
            .and_then(|p| p.sections.get(section_index))
            .map(|s| s.items.iter().map(|it| it.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Item ids appearing more than once, in first-repeat order
    #[must_use]
    pub fn duplicate_item_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        for item in self.items() {
            if !seen.insert(item.id.as_str()) && !dupes.contains(&item.id) {
                dupes.push(item.id.clone());
            }
        }
        dupes
    }
}
