//! Structural validation of route documents
//!
//! Runs over an arbitrary [`serde_json::Value`] before anything is trusted.
//! Every malformed field becomes a reportable error; no input shape panics.
//! Only a missing top-level `phases` array stops the walk early.

use crate::item_type::ItemType;
use serde_json::Value;
use std::fmt;

/// Number of violations shown before the overflow line
pub const DEFAULT_ERROR_LIMIT: usize = 8;

/// Validate a parsed route document, returning every violation found
///
/// An empty vector means the document is structurally valid.
#[must_use]
pub fn validate_route(data: &Value) -> Vec<String> {
    let mut errs = Vec::new();

    let Some(phases) = data.get("phases").and_then(Value::as_array) else {
        errs.push(r#"Top-level "phases" must be an array."#.to_string());
        return errs;
    };

    for (pi, phase) in phases.iter().enumerate() {
        if !is_string(phase.get("title")) {
            errs.push(format!("phases[{pi}].title missing or not a string"));
        }
        let sections = phase.get("sections").and_then(Value::as_array);
        if sections.is_none() {
            errs.push(format!("phases[{pi}].sections must be an array"));
        }

        for (si, section) in sections.into_iter().flatten().enumerate() {
            if !is_string(section.get("name")) {
                errs.push(format!(
                    "phases[{pi}].sections[{si}].name missing or not a string"
                ));
            }
            let items = section.get("items").and_then(Value::as_array);
            if items.is_none() {
                errs.push(format!("phases[{pi}].sections[{si}].items must be an array"));
            }

            for (ii, item) in items.into_iter().flatten().enumerate() {
                let at = format!("phases[{pi}].sections[{si}].items[{ii}]");
                if !is_string(item.get("id")) {
                    errs.push(format!("item id missing at {at}"));
                }
                let ty = item.get("type");
                let known = ty
                    .and_then(Value::as_str)
                    .and_then(ItemType::from_name)
                    .is_some();
                if !known {
                    errs.push(format!(
                        "invalid item.type=\"{}\" at {at}",
                        display_type(ty)
                    ));
                }
                if !is_string(item.get("label")) {
                    errs.push(format!("item label missing at {at}"));
                }
            }
        }
    }

    errs
}

fn is_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(_)))
}

// Mirrors how a template string would show the offending value.
fn display_type(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(_)) => "[object Object]".to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| display_type(Some(v)))
            .collect::<Vec<_>>()
            .join(","),
        Some(other) => other.to_string(),
    }
}

/// Accumulated validation errors plus the bounded presentation policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    /// Wrap a list of violations
    #[inline]
    #[must_use]
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }

    /// Validate and wrap in one step
    #[must_use]
    pub fn of(data: &Value) -> Self {
        Self::new(validate_route(data))
    }

    /// True when no violations were found
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of violations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Every violation, unbounded
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Bulleted summary showing at most `limit` violations plus an overflow line
    #[must_use]
    pub fn summary(&self, limit: usize) -> String {
        let mut out = String::from("Route schema errors:");
        for err in self.errors.iter().take(limit) {
            out.push_str("\n- ");
            out.push_str(err);
        }
        if self.errors.len() > limit {
            out.push_str(&format!("\n…and {} more.", self.errors.len() - limit));
        }
        out
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary(DEFAULT_ERROR_LIMIT))
    }
}
