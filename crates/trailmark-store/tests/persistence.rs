//! Completion state across storage reopen, import, and route switches

use proptest::prelude::*;
use std::sync::Arc;
use tempfile::tempdir;
use trailmark_store::prelude::*;
use trailmark_store::{export_json, parse_import};

const NS: &str = "trailmark-checklist-v1";

#[test]
fn file_backed_completion_survives_process_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&path).unwrap());
        let mut store = CompletionStore::open(storage, NS, "a").unwrap();
        store.set_complete("i1", true).unwrap();
        store.set_complete("i2", true).unwrap();
        store.set_complete("i2", false).unwrap();
    }

    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&path).unwrap());
    let store = CompletionStore::open(storage, NS, "a").unwrap();
    assert!(store.is_complete("i1"));
    assert!(!store.is_complete("i2"));
}

#[test]
fn import_overwrites_prior_state() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let mut store = CompletionStore::open(storage.clone(), NS, "a").unwrap();
    store.set_complete("i1", false).unwrap();
    store.set_complete("old", true).unwrap();

    store.replace_all(parse_import(r#"{"i1": true}"#).unwrap()).unwrap();

    assert!(store.is_complete("i1"));
    assert!(!store.is_complete("old"));
    let reloaded = CompletionStore::open(storage, NS, "a").unwrap();
    assert!(reloaded.is_complete("i1"));
}

#[test]
fn failed_import_leaves_state_untouched() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let mut store = CompletionStore::open(storage, NS, "a").unwrap();
    store.set_complete("i1", true).unwrap();

    assert!(parse_import("{ nope").is_err());
    assert!(store.is_complete("i1"));
}

#[test]
fn export_then_import_restores_map() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let mut a = CompletionStore::open(storage.clone(), NS, "a").unwrap();
    a.set_many(["x", "y"], true).unwrap();
    let exported = export_json(a.snapshot()).unwrap();

    let mut b = CompletionStore::open(storage, NS, "b").unwrap();
    b.replace_all(parse_import(&exported).unwrap()).unwrap();
    assert_eq!(a.snapshot(), b.snapshot());
}

proptest! {
    #[test]
    fn last_write_wins_after_reload(ops in proptest::collection::vec(("[a-d]", any::<bool>()), 1..32)) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = CompletionStore::open(storage.clone(), NS, "r").unwrap();
        for (id, done) in &ops {
            store.set_complete(id, *done).unwrap();
        }
        let reloaded = CompletionStore::open(storage, NS, "r").unwrap();
        for (id, _) in &ops {
            let last = ops.iter().rev().find(|(i, _)| i == id).map(|(_, d)| *d).unwrap();
            prop_assert_eq!(reloaded.is_complete(id), last);
        }
    }
}
