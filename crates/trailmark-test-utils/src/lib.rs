//! Testing utilities for the Trailmark workspace
//!
//! Shared fixtures: a two-route manifest, route documents, and helpers to lay
//! them out on disk.

#![allow(missing_docs)]

use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use trailmark_model::RouteDocument;
use trailmark_store::{MemoryStorage, Storage};

pub const MANIFEST_FILE: &str = "manifest.json";

pub const SCENARIO_MANIFEST: &str = r#"{
  "routes": [
    {"id": "a", "name": "A", "file": "a.json"},
    {"id": "b", "name": "B", "file": "b.json"}
  ],
  "default": "a"
}"#;

pub const ROUTE_A: &str = r#"{
  "phases": [
    {"id": "p1", "title": "T", "sections": [
      {"name": "S", "items": [{"id": "i1", "type": "boss", "label": "Boss"}]}
    ]}
  ]
}"#;

pub const ROUTE_B: &str = r#"{
  "phases": [
    {"id": "p1", "title": "Start", "sections": [
      {"name": "Main", "items": [
        {"id": "b1", "type": "boss", "label": "Margit"},
        {"id": "b2", "type": "npc", "label": "Meet Ranni"},
        {"id": "b3", "type": "gear", "label": "Flail"}
      ]}
    ]},
    {"id": "p2", "title": "Later", "tag": "Act II", "sections": [
      {"name": "Loot", "items": [{"id": "b4", "type": "talisman", "label": "Crimson Amber"}]},
      {"name": "Warnings", "items": [{"id": "b5", "type": "warning", "label": "Point of no return"}]}
    ]}
  ]
}"#;

pub const MALFORMED_ROUTE: &str = r#"{"phases": [ {"id": "p1", "#;

/// Route with ten item-level violations (every item lacks a label)
#[must_use]
pub fn invalid_route() -> String {
    let items: Vec<_> = (0..10)
        .map(|i| json!({"id": format!("x{i}"), "type": "boss"}))
        .collect();
    json!({"phases": [{"id": "p1", "title": "T", "sections": [{"name": "S", "items": items}]}]})
        .to_string()
}

#[must_use]
pub fn route_a() -> RouteDocument {
    RouteDocument::from_json_str(ROUTE_A).unwrap()
}

#[must_use]
pub fn route_b() -> RouteDocument {
    RouteDocument::from_json_str(ROUTE_B).unwrap()
}

#[must_use]
pub fn memory_storage() -> Arc<dyn Storage> {
    Arc::new(MemoryStorage::new())
}

/// Write manifest and both routes into `dir`
pub fn write_scenario(dir: &Path) {
    std::fs::write(dir.join(MANIFEST_FILE), SCENARIO_MANIFEST).unwrap();
    std::fs::write(dir.join("a.json"), ROUTE_A).unwrap();
    std::fs::write(dir.join("b.json"), ROUTE_B).unwrap();
}
