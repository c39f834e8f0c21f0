use std::fs;
use std::path::PathBuf;

use serde_json::{Value, json};
use zerobot_core::core_api::{
    CoreErrorCode, DragSource, DropOutcome, DropTarget, ProfileStore, Slot,
};
use zerobot_core::kind::SectionKind;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture_bytes(name: &str) -> Vec<u8> {
    let path = workspace_root().join("tests/fixtures").join(name);
    fs::read(&path).unwrap_or_else(|e| panic!("failed to read {:?}: {}", path, e))
}

fn store_with(first: &str, second: Option<&str>) -> ProfileStore {
    let mut store = ProfileStore::new();
    store
        .load_bytes(Slot::First, fixture_bytes(first))
        .expect("first fixture should load");
    if let Some(second) = second {
        store
            .load_bytes(Slot::Second, fixture_bytes(second))
            .expect("second fixture should load");
    }
    store
}

fn names(store: &ProfileStore, slot: Slot, kind: SectionKind) -> Vec<String> {
    store
        .section_summary(slot, kind)
        .expect("slot should be loaded")
        .expect("section should exist")
        .profiles
        .into_iter()
        .map(|p| p.name)
        .collect()
}

fn section_json(store: &ProfileStore, slot: Slot, kind: SectionKind) -> Value {
    store
        .document(slot)
        .expect("slot should be loaded")
        .raw_section(kind)
        .cloned()
        .expect("section should exist")
}

#[test]
fn copy_suffixes_colliding_name() {
    let mut store = store_with("char_a.json", Some("char_b.json"));

    let final_name = store
        .copy_profile(Slot::First, Slot::Second, SectionKind::Targeting, 0)
        .expect("copy should succeed");

    assert_eq!(final_name, "Alpha (1)");
    assert_eq!(
        names(&store, Slot::Second, SectionKind::Targeting),
        vec!["Alpha", "Alpha (1)"]
    );
    assert_eq!(
        names(&store, Slot::First, SectionKind::Targeting),
        vec!["Alpha", "Beta", ""]
    );
}

#[test]
fn copy_carries_key_modifier_and_payload() {
    let mut store = store_with("char_a.json", Some("char_b.json"));

    store
        .copy_profile(Slot::First, Slot::Second, SectionKind::Targeting, 1)
        .expect("copy should succeed");

    let section = section_json(&store, Slot::Second, SectionKind::Targeting);
    assert_eq!(section["profileKeys"], json!(["F1", "F2"]));
    assert_eq!(section["profileModifiers"], json!([0, 1]));
    assert_eq!(section["profileNames"], json!(["Alpha", "Beta"]));
    assert_eq!(
        section["list"][1],
        json!([{ "name": "Rotworm", "priority": 1, "stance": "chase" }])
    );
}

#[test]
fn copy_of_unnamed_profile_uses_positional_name() {
    let mut store = store_with("char_a.json", Some("char_b.json"));

    let final_name = store
        .copy_profile(Slot::First, Slot::Second, SectionKind::Targeting, 2)
        .expect("copy should succeed");

    assert_eq!(final_name, "Profile 2");
}

#[test]
fn copy_creates_missing_target_section() {
    let mut store = store_with("char_a.json", Some("char_b.json"));
    assert!(
        !store
            .document(Slot::Second)
            .expect("loaded")
            .has_section(SectionKind::Healing)
    );

    let final_name = store
        .copy_profile(Slot::First, Slot::Second, SectionKind::Healing, 0)
        .expect("copy should succeed");

    assert_eq!(final_name, "Default");
    let section = section_json(&store, Slot::Second, SectionKind::Healing);
    assert_eq!(
        section,
        json!({
            "healingList": [[{ "spell": "exura", "hpBelow": 80 }]],
            "profileKeys": ["F9"],
            "profileModifiers": [0],
            "profileNames": ["Default"]
        })
    );
}

#[test]
fn copy_into_full_section_fails_without_mutation() {
    let mut store = store_with("char_a.json", Some("char_b.json"));
    let before = store.document(Slot::Second).cloned();

    let err = store
        .copy_profile(Slot::First, Slot::Second, SectionKind::Equipment, 0)
        .expect_err("target already holds ten profiles");

    assert_eq!(err.code, CoreErrorCode::CapacityExceeded);
    assert_eq!(store.document(Slot::Second).cloned(), before);
}

#[test]
fn copy_reports_missing_source_section_and_bad_index() {
    let mut store = store_with("char_b.json", Some("char_a.json"));

    let err = store
        .copy_profile(Slot::First, Slot::Second, SectionKind::Healing, 0)
        .expect_err("char_b has no healing section");
    assert_eq!(err.code, CoreErrorCode::SectionNotFound);

    let err = store
        .copy_profile(Slot::First, Slot::Second, SectionKind::Targeting, 4)
        .expect_err("index beyond the section");
    assert_eq!(err.code, CoreErrorCode::IndexOutOfRange);
}

#[test]
fn operations_on_empty_slot_fail() {
    let mut store = store_with("char_a.json", None);

    let err = store
        .copy_profile(Slot::First, Slot::Second, SectionKind::Targeting, 0)
        .expect_err("second slot is empty");
    assert_eq!(err.code, CoreErrorCode::DocumentNotLoaded);

    let err = store
        .document_summary(Slot::Second)
        .expect_err("second slot is empty");
    assert_eq!(err.code, CoreErrorCode::DocumentNotLoaded);
}

#[test]
fn load_rejects_malformed_and_non_object_json() {
    let mut store = ProfileStore::new();

    let err = store
        .load_bytes(Slot::First, b"{ not json")
        .expect_err("malformed JSON");
    assert_eq!(err.code, CoreErrorCode::Parse);

    let err = store
        .load_bytes(Slot::First, b"[1, 2, 3]")
        .expect_err("top level must be an object");
    assert_eq!(err.code, CoreErrorCode::Parse);
    assert_eq!(store.loaded_count(), 0);
}

#[test]
fn drop_on_other_profile_of_same_list_reorders() {
    let mut store = store_with("char_a.json", None);

    let outcome = store
        .drop_profile(
            DragSource {
                slot: Slot::First,
                kind: SectionKind::Targeting,
                index: 0,
            },
            DropTarget::Profile {
                slot: Slot::First,
                kind: SectionKind::Targeting,
                index: 2,
            },
        )
        .expect("drop should succeed");

    assert_eq!(outcome, DropOutcome::Reordered { from: 0, to: 2 });
    assert_eq!(
        names(&store, Slot::First, SectionKind::Targeting),
        vec!["Beta", "", "Alpha"]
    );
}

#[test]
fn drop_on_empty_list_space_moves_to_end() {
    let mut store = store_with("char_a.json", None);

    let outcome = store
        .drop_profile(
            DragSource {
                slot: Slot::First,
                kind: SectionKind::Equipment,
                index: 0,
            },
            DropTarget::List {
                slot: Slot::First,
                kind: SectionKind::Equipment,
            },
        )
        .expect("drop should succeed");

    assert_eq!(outcome, DropOutcome::Reordered { from: 0, to: 1 });
    assert_eq!(
        names(&store, Slot::First, SectionKind::Equipment),
        vec!["Boss", "Hunt"]
    );
}

#[test]
fn drop_on_itself_is_a_no_op() {
    let mut store = store_with("char_a.json", None);
    let before = store.document(Slot::First).cloned();

    let outcome = store
        .drop_profile(
            DragSource {
                slot: Slot::First,
                kind: SectionKind::Targeting,
                index: 1,
            },
            DropTarget::Profile {
                slot: Slot::First,
                kind: SectionKind::Targeting,
                index: 1,
            },
        )
        .expect("drop should succeed");

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(store.document(Slot::First).cloned(), before);
}

#[test]
fn drop_on_other_document_copies_and_keeps_source() {
    let mut store = store_with("char_a.json", Some("char_b.json"));

    let outcome = store
        .drop_profile(
            DragSource {
                slot: Slot::First,
                kind: SectionKind::Targeting,
                index: 1,
            },
            DropTarget::Profile {
                slot: Slot::Second,
                kind: SectionKind::Targeting,
                index: 0,
            },
        )
        .expect("drop should succeed");

    assert_eq!(
        outcome,
        DropOutcome::Copied {
            slot: Slot::Second,
            final_name: "Beta".to_string(),
        }
    );
    assert_eq!(
        names(&store, Slot::First, SectionKind::Targeting),
        vec!["Alpha", "Beta", ""]
    );
    assert_eq!(
        names(&store, Slot::Second, SectionKind::Targeting),
        vec!["Alpha", "Beta"]
    );
}

#[test]
fn drop_on_other_section_copies_within_dragged_kind() {
    let mut store = store_with("char_a.json", None);

    let outcome = store
        .drop_profile(
            DragSource {
                slot: Slot::First,
                kind: SectionKind::Healing,
                index: 0,
            },
            DropTarget::List {
                slot: Slot::First,
                kind: SectionKind::Equipment,
            },
        )
        .expect("drop should succeed");

    assert_eq!(
        outcome,
        DropOutcome::Copied {
            slot: Slot::First,
            final_name: "Default (1)".to_string(),
        }
    );
    assert_eq!(
        names(&store, Slot::First, SectionKind::Healing),
        vec!["Default", "Default (1)"]
    );
    assert_eq!(
        names(&store, Slot::First, SectionKind::Equipment),
        vec!["Hunt", "Boss"]
    );
}

#[test]
fn replace_section_overwrites_wholesale() {
    let mut store = store_with("char_a.json", Some("char_b.json"));

    store
        .replace_section(Slot::First, Slot::Second, SectionKind::Targeting)
        .expect("replace should succeed");

    assert_eq!(
        section_json(&store, Slot::Second, SectionKind::Targeting),
        section_json(&store, Slot::First, SectionKind::Targeting)
    );
}

#[test]
fn replace_section_requires_source_section() {
    let mut store = store_with("char_b.json", Some("char_a.json"));
    let before = store.document(Slot::Second).cloned();

    let err = store
        .replace_section(Slot::First, Slot::Second, SectionKind::Healing)
        .expect_err("char_b has no healing section");

    assert_eq!(err.code, CoreErrorCode::SectionNotFound);
    assert_eq!(store.document(Slot::Second).cloned(), before);
}

#[test]
fn merge_appends_all_profiles_with_name_resolution() {
    let mut store = store_with("char_a.json", Some("char_b.json"));

    let appended = store
        .merge_section(Slot::First, Slot::Second, SectionKind::Targeting)
        .expect("merge should succeed");

    assert_eq!(appended, 3);
    assert_eq!(
        names(&store, Slot::Second, SectionKind::Targeting),
        vec!["Alpha", "Alpha (1)", "Beta", "Profile 4"]
    );
}

#[test]
fn merge_over_capacity_changes_nothing() {
    let mut store = store_with("char_a.json", Some("char_b.json"));
    let before = store.document(Slot::Second).cloned();

    let err = store
        .merge_section(Slot::First, Slot::Second, SectionKind::Equipment)
        .expect_err("10 + 2 profiles exceed the limit");

    assert_eq!(err.code, CoreErrorCode::CapacityExceeded);
    assert_eq!(store.document(Slot::Second).cloned(), before);
}

#[test]
fn merge_into_missing_section_creates_it() {
    let mut store = store_with("char_a.json", Some("char_b.json"));

    let appended = store
        .merge_section(Slot::First, Slot::Second, SectionKind::MagicShooter)
        .expect("merge should succeed");

    assert_eq!(appended, 1);
    assert_eq!(
        names(&store, Slot::Second, SectionKind::MagicShooter),
        vec!["Waves"]
    );
}

#[test]
fn paste_without_copy_fails_and_leaves_payload() {
    let mut store = store_with("char_a.json", None);
    let before = section_json(&store, Slot::First, SectionKind::Targeting);

    let err = store
        .paste_from_clipboard(Slot::First, SectionKind::Targeting, 0)
        .expect_err("clipboard is empty");

    assert_eq!(err.code, CoreErrorCode::ClipboardEmpty);
    assert_eq!(
        section_json(&store, Slot::First, SectionKind::Targeting),
        before
    );
}

#[test]
fn paste_overwrites_only_payload_and_is_repeatable() {
    let mut store = store_with("char_a.json", Some("char_b.json"));

    store
        .copy_to_clipboard(Slot::Second, SectionKind::Targeting, 0)
        .expect("copy should succeed");
    store
        .paste_from_clipboard(Slot::First, SectionKind::Targeting, 0)
        .expect("first paste should succeed");
    store
        .paste_from_clipboard(Slot::First, SectionKind::Targeting, 2)
        .expect("second paste should succeed");

    let section = section_json(&store, Slot::First, SectionKind::Targeting);
    let cyclops = json!([{ "name": "Cyclops", "priority": 2, "stance": "chase" }]);
    assert_eq!(section["list"][0], cyclops);
    assert_eq!(section["list"][2], cyclops);
    assert_eq!(section["profileKeys"], json!(["F1", "F2", "F3"]));
    assert_eq!(section["profileNames"], json!(["Alpha", "Beta", ""]));
    assert!(store.clipboard().is_some());
}

#[test]
fn paste_into_other_kind_is_rejected() {
    let mut store = store_with("char_a.json", None);

    store
        .copy_to_clipboard(Slot::First, SectionKind::Healing, 0)
        .expect("copy should succeed");
    let err = store
        .paste_from_clipboard(Slot::First, SectionKind::Equipment, 0)
        .expect_err("healing payload cannot go into equipment");
    assert_eq!(err.code, CoreErrorCode::SectionMismatch);

    let err = store
        .paste_from_clipboard(Slot::First, SectionKind::Healing, 3)
        .expect_err("index beyond the section");
    assert_eq!(err.code, CoreErrorCode::IndexOutOfRange);
}

#[test]
fn copy_to_clipboard_validates_index() {
    let mut store = store_with("char_a.json", None);

    let err = store
        .copy_to_clipboard(Slot::First, SectionKind::MagicShooter, 1)
        .expect_err("only one magic shooter profile");
    assert_eq!(err.code, CoreErrorCode::IndexOutOfRange);
    assert!(store.clipboard().is_none());
}

#[test]
fn clipboard_is_independent_of_later_source_edits() {
    let mut store = store_with("char_a.json", None);

    store
        .copy_to_clipboard(Slot::First, SectionKind::Targeting, 1)
        .expect("copy should succeed");
    store
        .sort_profile_targets(Slot::First, 0)
        .expect("sort should succeed");
    store
        .paste_from_clipboard(Slot::First, SectionKind::Targeting, 0)
        .expect("paste should succeed");

    let section = section_json(&store, Slot::First, SectionKind::Targeting);
    assert_eq!(section["list"][0], section["list"][1]);
}

#[test]
fn removing_source_document_clears_clipboard() {
    let mut store = store_with("char_a.json", Some("char_b.json"));

    store
        .copy_to_clipboard(Slot::Second, SectionKind::Targeting, 0)
        .expect("copy should succeed");
    store.remove_document(Slot::First);
    assert!(store.clipboard().is_some());

    store.remove_document(Slot::Second);
    assert!(store.clipboard().is_none());
    assert_eq!(store.loaded_count(), 0);
}

#[test]
fn reset_clears_everything() {
    let mut store = store_with("char_a.json", Some("char_b.json"));
    store
        .copy_to_clipboard(Slot::First, SectionKind::Targeting, 0)
        .expect("copy should succeed");

    store.reset();

    assert_eq!(store.loaded_count(), 0);
    assert!(store.clipboard().is_none());
}

#[test]
fn rename_delete_and_reorder_through_store() {
    let mut store = store_with("char_a.json", None);

    store
        .rename_profile(Slot::First, SectionKind::Targeting, 2, " Gamma ")
        .expect("rename should succeed");
    let err = store
        .rename_profile(Slot::First, SectionKind::Targeting, 0, "Beta")
        .expect_err("Beta is taken");
    assert_eq!(err.code, CoreErrorCode::DuplicateName);

    store
        .reorder_profile(Slot::First, SectionKind::Targeting, 2, 0)
        .expect("reorder should succeed");
    let removed = store
        .delete_profile(Slot::First, SectionKind::Targeting, 1)
        .expect("delete should succeed");

    assert_eq!(removed, "Alpha");
    assert_eq!(
        names(&store, Slot::First, SectionKind::Targeting),
        vec!["Gamma", "Beta"]
    );
    let section = section_json(&store, Slot::First, SectionKind::Targeting);
    assert_eq!(section["profileKeys"], json!(["F3", "F2"]));
    assert_eq!(section["profileModifiers"], json!([0, 1]));
}

#[test]
fn deleting_last_profile_is_rejected() {
    let mut store = store_with("char_a.json", None);
    let before = section_json(&store, Slot::First, SectionKind::Healing);

    let err = store
        .delete_profile(Slot::First, SectionKind::Healing, 0)
        .expect_err("healing has a single profile");

    assert_eq!(err.code, CoreErrorCode::MinimumPopulation);
    assert_eq!(
        section_json(&store, Slot::First, SectionKind::Healing),
        before
    );
}

#[test]
fn sort_profile_targets_is_case_insensitive() {
    let mut store = store_with("char_a.json", None);

    store
        .sort_profile_targets(Slot::First, 0)
        .expect("sort should succeed");

    let section = section_json(&store, Slot::First, SectionKind::Targeting);
    let order: Vec<&str> = section["list"][0]
        .as_array()
        .expect("payload should be an array")
        .iter()
        .map(|entry| entry["name"].as_str().expect("entry name"))
        .collect();
    assert_eq!(order, vec!["Ant", "bear", "Dragon"]);
    assert_eq!(section["profileNames"], json!(["Alpha", "Beta", ""]));
}

#[test]
fn sort_targeting_lists_counts_array_payloads() {
    let mut store = store_with("char_a.json", None);

    let sorted = store
        .sort_targeting_lists(Slot::First)
        .expect("sort should succeed");

    assert_eq!(sorted, 3);
}

#[test]
fn sort_enabled_scripts_orders_by_name() {
    let mut store = store_with("char_a.json", None);

    assert!(
        store
            .sort_enabled_scripts(Slot::First)
            .expect("slot is loaded")
    );
    assert_eq!(
        store.enabled_scripts(Slot::First).expect("slot is loaded"),
        vec!["Alarms.lua", "bank.lua", "refill.lua"]
    );
}

#[test]
fn document_summary_lists_present_sections_in_fixed_order() {
    let store = store_with("char_b.json", None);

    let summary = store
        .document_summary(Slot::First)
        .expect("slot is loaded");

    let kinds: Vec<SectionKind> = summary.sections.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![SectionKind::Targeting, SectionKind::Equipment]);
    assert_eq!(summary.sections[1].count(), 10);
    assert_eq!(summary.sections[0].profiles[0].entries, 1);
    assert!(summary.enabled_scripts.is_empty());
}
