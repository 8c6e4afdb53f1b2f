//! Property tests for validation, moves and custom items

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use trailmark_model::{validate_route, ItemType, MoveOutcome, RouteDocument};

#[derive(Debug, Clone)]
struct ItemShape {
    id_ok: bool,
    type_ok: bool,
    label_ok: bool,
}

#[derive(Debug, Clone)]
struct SectionShape {
    name_ok: bool,
    items: Option<Vec<ItemShape>>,
}

#[derive(Debug, Clone)]
struct PhaseShape {
    title_ok: bool,
    sections: Option<Vec<SectionShape>>,
}

fn item_shape() -> impl Strategy<Value = ItemShape> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(id_ok, type_ok, label_ok)| ItemShape {
        id_ok,
        type_ok,
        label_ok,
    })
}

fn section_shape() -> impl Strategy<Value = SectionShape> {
    (
        any::<bool>(),
        proptest::option::weighted(0.8, proptest::collection::vec(item_shape(), 0..4)),
    )
        .prop_map(|(name_ok, items)| SectionShape { name_ok, items })
}

fn phase_shape() -> impl Strategy<Value = PhaseShape> {
    (
        any::<bool>(),
        proptest::option::weighted(0.8, proptest::collection::vec(section_shape(), 0..4)),
    )
        .prop_map(|(title_ok, sections)| PhaseShape { title_ok, sections })
}

/// Build JSON for the shapes and count the violations it must produce.
fn build(phases: &[PhaseShape]) -> (Value, usize) {
    let mut expected = 0;
    let mut n = 0;
    let mut out = Vec::new();
    for (pi, p) in phases.iter().enumerate() {
        let mut phase = Map::new();
        phase.insert("id".into(), json!(format!("p{pi}")));
        if p.title_ok {
            phase.insert("title".into(), json!("T"));
        } else {
            phase.insert("title".into(), json!(42));
            expected += 1;
        }
        match &p.sections {
            None => expected += 1,
            Some(sections) => {
                let mut secs = Vec::new();
                for s in sections {
                    let mut section = Map::new();
                    if s.name_ok {
                        section.insert("name".into(), json!("S"));
                    } else {
                        expected += 1;
                    }
                    match &s.items {
                        None => {
                            section.insert("items".into(), json!("not an array"));
                            expected += 1;
                        }
                        Some(items) => {
                            let mut its = Vec::new();
                            for it in items {
                                n += 1;
                                let mut item = Map::new();
                                if it.id_ok {
                                    item.insert("id".into(), json!(format!("i{n}")));
                                } else {
                                    expected += 1;
                                }
                                if it.type_ok {
                                    item.insert("type".into(), json!("quest"));
                                } else {
                                    item.insert("type".into(), json!("secret"));
                                    expected += 1;
                                }
                                if it.label_ok {
                                    item.insert("label".into(), json!("L"));
                                } else {
                                    item.insert("label".into(), Value::Null);
                                    expected += 1;
                                }
                                its.push(Value::Object(item));
                            }
                            section.insert("items".into(), Value::Array(its));
                        }
                    }
                    secs.push(Value::Object(section));
                }
                phase.insert("sections".into(), Value::Array(secs));
            }
        }
        out.push(Value::Object(phase));
    }
    (json!({ "phases": out }), expected)
}

fn valid_doc() -> impl Strategy<Value = RouteDocument> {
    proptest::collection::vec(proptest::collection::vec(0usize..5, 0..4), 1..4).prop_map(|phases| {
        let mut n = 0;
        let phases: Vec<Value> = phases
            .iter()
            .enumerate()
            .map(|(pi, sections)| {
                let sections: Vec<Value> = sections
                    .iter()
                    .map(|&count| {
                        let items: Vec<Value> = (0..count)
                            .map(|_| {
                                n += 1;
                                json!({"id": format!("i{n}"), "type": "boss", "label": format!("Item {n}")})
                            })
                            .collect();
                        json!({"name": "S", "items": items})
                    })
                    .collect();
                json!({"id": format!("p{pi}"), "title": "T", "sections": sections})
            })
            .collect();
        RouteDocument::from_value(json!({ "phases": phases })).unwrap()
    })
}

proptest! {
    #[test]
    fn validator_counts_every_violation(phases in proptest::collection::vec(phase_shape(), 0..5)) {
        let (value, expected) = build(&phases);
        prop_assert_eq!(validate_route(&value).len(), expected);
    }

    #[test]
    fn validator_never_panics_on_arbitrary_json(s in "[\\[\\]{}\":,a-z0-9 ]{0,64}") {
        if let Ok(value) = serde_json::from_str::<Value>(&s) {
            let _ = validate_route(&value);
        }
    }

    #[test]
    fn moves_preserve_item_count_and_uniqueness(
        doc in valid_doc(),
        pick in any::<prop::sample::Index>(),
        phase in 0usize..4,
        section in 0usize..4,
    ) {
        let mut doc = doc;
        let total = doc.item_count();
        prop_assume!(total > 0);
        let id = doc.items().nth(pick.index(total)).unwrap().id.clone();
        let before = doc.clone();

        let outcome = doc.move_item(&id, &format!("p{phase}"), section);

        prop_assert_eq!(doc.item_count(), total);
        prop_assert!(doc.duplicate_item_ids().is_empty());
        if outcome == MoveOutcome::Unresolved {
            prop_assert_eq!(doc, before);
        } else {
            let ids = doc.section_item_ids(&format!("p{phase}"), section);
            prop_assert_eq!(ids.last(), Some(&id));
        }
    }

    #[test]
    fn custom_items_get_unique_slugged_ids(labels in proptest::collection::vec("[A-Za-z ]{1,12}", 1..8)) {
        let mut doc = RouteDocument::from_value(json!({
            "phases": [{"id": "p1", "title": "T", "sections": []}]
        })).unwrap();
        for label in &labels {
            match doc.add_custom_item(label, ItemType::Quest, "p1", "Custom") {
                Ok(item) => prop_assert!(item.id.starts_with("cust-")),
                Err(_) => prop_assert!(label.trim().is_empty()),
            }
        }
        prop_assert!(doc.phases[0].sections.len() <= 1);
    }
}
