use projectmerge_model::{
    resolve, resolve_map, Component, Connection, EntityKey, Identified, IdentityMap, Map, Node,
    Plug, Port, Side,
};
use serde_json::json;

fn component(id: Option<&str>, name: &str) -> Component {
    Component {
        id: id.map(String::from),
        name: name.into(),
        ..Component::default()
    }
}

fn keys<T>(map: &IdentityMap<'_, T>) -> Vec<String> {
    map.merge_order().iter().map(|(k, _)| k.to_string()).collect()
}

fn nodes(ids: &[&str]) -> Vec<Node> {
    ids.iter().map(|id| Node::new(*id, "Group")).collect()
}

// ── Keys ─────────────────────────────────────────────────────────

#[test]
fn component_prefers_id() {
    assert_eq!(component(Some("c1"), "/App").key(), EntityKey::Id("c1".into()));
    assert_eq!(component(None, "/App").key(), EntityKey::Name("/App".into()));
}

#[test]
fn renamed_component_keeps_key() {
    assert_eq!(component(Some("c1"), "/App").key(), component(Some("c1"), "/Main").key());
}

#[test]
fn port_matches_by_name() {
    let a = Port::new("visible", json!("boolean"), Plug::Input);
    let b = Port::new("visible", json!("string"), Plug::Output);
    assert_eq!(a.key(), b.key());
}

#[test]
fn connection_key_is_endpoint_tuple() {
    let a = Connection::new("n1", "out", "n2", "in");
    let b = Connection::new("n1", "out", "n2", "in");
    let c = Connection::new("n1", "out", "n3", "in");
    assert_eq!(a.key(), b.key());
    assert_ne!(a.key(), c.key());
    assert_eq!(a.key().to_string(), "n1.out->n2.in");
}

// ── Triplets ─────────────────────────────────────────────────────

#[test]
fn resolve_groups_by_key() {
    let base = nodes(&["a", "b"]);
    let ours = nodes(&["a"]);
    let theirs = nodes(&["b", "c"]);
    let map = resolve(&base, &ours, &theirs);

    assert_eq!(map.len(), 3);
    let a = map.get(&EntityKey::Id("a".into())).unwrap();
    assert!(a.base.is_some() && a.ours.is_some() && a.theirs.is_none());
    let c = map.get(&EntityKey::Id("c".into())).unwrap();
    assert!(c.base.is_none() && c.ours.is_none() && c.theirs.is_some());
    assert!(c.get(Side::Theirs).is_some());
}

#[test]
fn duplicate_key_keeps_first() {
    let mut first = Node::new("a", "Group");
    first.type_name = "First".into();
    let mut second = Node::new("a", "Group");
    second.type_name = "Second".into();
    let ours = vec![first, second];

    let map = resolve(&[], &ours, &[]);
    assert_eq!(map.len(), 1);
    let a = map.get(&EntityKey::Id("a".into())).unwrap();
    assert_eq!(a.ours.unwrap().type_name, "First");
    assert_eq!(map.keys_on(Side::Ours).count(), 1);
}

#[test]
fn resolve_map_treats_missing_as_empty() {
    let mut ours = Map::new();
    ours.insert("w".into(), json!(1));
    let map = resolve_map(None, Some(&ours), None);
    assert_eq!(map.len(), 1);
    assert!(map.get(&EntityKey::Name("w".into())).unwrap().base.is_none());
}

// ── Merge order ──────────────────────────────────────────────────

#[test]
fn ours_order_is_primary_when_ours_reordered() {
    let base = nodes(&["a", "b"]);
    let ours = nodes(&["b", "a"]);
    let theirs = nodes(&["a", "b", "c"]);
    assert_eq!(keys(&resolve(&base, &ours, &theirs)), vec!["b", "a", "c"]);
}

#[test]
fn theirs_order_is_primary_when_ours_untouched() {
    let base = nodes(&["a", "b"]);
    let ours = nodes(&["a", "b"]);
    let theirs = nodes(&["c", "b", "a"]);
    assert_eq!(keys(&resolve(&base, &ours, &theirs)), vec!["c", "b", "a"]);
}

#[test]
fn additions_from_other_side_are_appended() {
    let base = nodes(&["a"]);
    let ours = nodes(&["x", "a"]);
    let theirs = nodes(&["a", "y"]);
    assert_eq!(keys(&resolve(&base, &ours, &theirs)), vec!["x", "a", "y"]);
}

#[test]
fn base_only_keys_come_last() {
    let base = nodes(&["gone", "a"]);
    let ours = nodes(&["a"]);
    let theirs = nodes(&["a"]);
    assert_eq!(keys(&resolve(&base, &ours, &theirs)), vec!["a", "gone"]);
}

#[test]
fn keys_on_follow_side_order() {
    let base = nodes(&["a", "b"]);
    let theirs = nodes(&["b", "a"]);
    let map = resolve(&base, &[], &theirs);
    let order: Vec<String> = map.keys_on(Side::Theirs).map(EntityKey::to_string).collect();
    assert_eq!(order, vec!["b", "a"]);
    let order: Vec<String> = map.keys_on(Side::Base).map(EntityKey::to_string).collect();
    assert_eq!(order, vec!["a", "b"]);
}
