use pretty_assertions::assert_eq;
use projectmerge_merge::{
    classify, merge_fields, merge_keyed, merge_optional_fields, survives, Outcome, Resolution,
};
use projectmerge_model::{resolve, ConflictKind, Map, Plug, Port, Triplet};
use serde_json::{json, Value};

fn object(value: Value) -> Map {
    serde_json::from_value(value).unwrap()
}

fn port(name: &str, port_type: &str) -> Port {
    Port::new(name, json!(port_type), Plug::Input)
}

fn names(ports: &[Port]) -> Vec<&str> {
    ports.iter().map(|p| p.name.as_str()).collect()
}

// ── classify ──

#[test]
fn present_on_both_sides_is_merged() {
    let t = Triplet { base: Some(&1), ours: Some(&2), theirs: Some(&3) };
    assert_eq!(classify(&t), Outcome::Merge { base: Some(&1), ours: &2, theirs: &3 });
}

#[test]
fn added_on_both_sides_is_merged_without_base() {
    let t = Triplet { base: None, ours: Some(&2), theirs: Some(&3) };
    assert_eq!(classify(&t), Outcome::Merge { base: None, ours: &2, theirs: &3 });
}

#[test]
fn unmodified_delete_drops() {
    let t = Triplet { base: Some(&1), ours: Some(&1), theirs: None };
    assert_eq!(classify(&t), Outcome::Drop);
    let t = Triplet { base: Some(&1), ours: None, theirs: Some(&1) };
    assert_eq!(classify(&t), Outcome::Drop);
}

#[test]
fn modify_beats_delete() {
    let t = Triplet { base: Some(&1), ours: None, theirs: Some(&5) };
    assert_eq!(classify(&t), Outcome::Keep(&5));
    let t = Triplet { base: Some(&1), ours: Some(&4), theirs: None };
    assert_eq!(classify(&t), Outcome::Keep(&4));
}

#[test]
fn one_sided_addition_is_kept() {
    let t = Triplet { base: None, ours: None, theirs: Some(&7) };
    assert_eq!(classify(&t), Outcome::Keep(&7));
}

#[test]
fn deleted_on_both_sides_drops() {
    let t = Triplet { base: Some(&1), ours: None, theirs: None };
    assert_eq!(classify(&t), Outcome::Drop);
}

// ── merge_keyed ──

#[test]
fn keyed_merge_unions_additions() {
    let base = vec![port("a", "string")];
    let ours = vec![port("a", "string"), port("x", "number")];
    let theirs = vec![port("a", "string"), port("y", "boolean")];

    let merged = merge_keyed(&resolve(&base, &ours, &theirs), |_, _, ours, _| ours.clone());
    assert_eq!(names(&merged), vec!["a", "x", "y"]);
}

#[test]
fn keyed_merge_calls_back_only_for_shared_keys() {
    let base = vec![port("a", "string"), port("b", "string")];
    let ours = vec![port("a", "number")];
    let theirs = vec![port("a", "string"), port("b", "string"), port("c", "string")];

    let mut seen = Vec::new();
    let merged = merge_keyed(&resolve(&base, &ours, &theirs), |key, _, ours, _| {
        seen.push(key.to_string());
        ours.clone()
    });
    assert_eq!(seen, vec!["a"]);
    assert_eq!(names(&merged), vec!["a", "c"]);
}

#[test]
fn keyed_merge_keeps_modified_entity_the_other_side_deleted() {
    let base = vec![port("a", "string")];
    let ours: Vec<Port> = Vec::new();
    let theirs = vec![port("a", "color")];

    let merged = merge_keyed(&resolve(&base, &ours, &theirs), |_, _, ours, _| ours.clone());
    assert_eq!(merged, vec![port("a", "color")]);
}

// ── flat objects ──

#[test]
fn merge_fields_takes_one_sided_changes() {
    let base = object(json!({ "width": 370, "height": 370, "title": "x" }));
    let ours = object(json!({ "width": 170, "height": 370, "title": "x" }));
    let theirs = object(json!({ "width": 370, "height": 270 }));

    let merged = merge_fields(Some(&base), Some(&ours), Some(&theirs), Resolution::PreferOurs);
    assert_eq!(Value::Object(merged.fields), json!({ "width": 170, "height": 270 }));
    assert!(merged.conflicts.is_empty());
}

#[test]
fn merge_fields_records_conflicts_by_field_name() {
    let base = object(json!({ "height": 370 }));
    let ours = object(json!({ "height": 170 }));
    let theirs = object(json!({ "height": 270 }));

    let merged = merge_fields(Some(&base), Some(&ours), Some(&theirs), Resolution::PreferTheirs);
    assert_eq!(merged.fields["height"], json!(270));
    assert_eq!(merged.conflicts.len(), 1);
    let conflict = &merged.conflicts[0];
    assert_eq!(conflict.kind, ConflictKind::Parameter);
    assert_eq!(conflict.name, "height");
    assert_eq!(conflict.ours, json!(170));
    assert_eq!(conflict.theirs, json!(270));
}

#[test]
fn merge_fields_treats_missing_object_as_empty() {
    let theirs = object(json!({ "a": 1 }));
    let merged = merge_fields(None, None, Some(&theirs), Resolution::PreferOurs);
    assert_eq!(Value::Object(merged.fields), json!({ "a": 1 }));
}

#[test]
fn optional_object_removed_by_one_side_stays_removed() {
    let base = object(json!({ "a": 1 }));
    let (fields, conflicts) =
        merge_optional_fields(Some(&base), None, Some(&base), Resolution::PreferOurs);
    assert_eq!(fields, None);
    assert!(conflicts.is_empty());
}

#[test]
fn optional_object_added_by_one_side_appears() {
    let theirs = object(json!({ "a": 1 }));
    let (fields, _) = merge_optional_fields(None, None, Some(&theirs), Resolution::PreferOurs);
    assert_eq!(fields, Some(theirs));
}

#[test]
fn survives_rules() {
    assert!(!survives::<i32>(None, None, None));
    assert!(!survives(Some(&1), None, Some(&1)));
    assert!(survives(Some(&1), None, Some(&2)));
    assert!(survives(None, Some(&1), None));
    assert!(survives(Some(&1), Some(&1), Some(&1)));
}
