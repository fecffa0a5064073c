#![allow(dead_code)]

use projectmerge_model::{Component, Connection, Node, Project};
use serde_json::{json, Value};

pub fn project(components: Vec<Component>) -> Project {
    Project {
        name: "Weather".into(),
        components,
        ..Project::default()
    }
}

pub fn component(id: &str, roots: Vec<Node>, connections: Vec<Connection>) -> Component {
    let mut c = Component {
        id: Some(id.into()),
        name: format!("/{id}"),
        ..Component::default()
    };
    c.graph.roots = roots;
    c.graph.connections = connections;
    c
}

pub fn node(id: &str, type_name: &str) -> Node {
    Node::new(id, type_name)
}

pub fn text(id: &str, value: &str) -> Node {
    Node::new(id, "Text").with_parameter("text", json!(value))
}

pub fn code(id: &str, script: &str) -> Node {
    Node::new(id, "JavaScriptFunction").with_parameter("functionScript", json!(script))
}

pub fn group(id: &str, children: Vec<Node>) -> Node {
    let mut g = Node::new(id, "Group");
    g.children = children;
    g
}

pub fn link(from: &str, to: &str) -> Connection {
    Connection::new(from, "out", to, "in")
}

/// A one-component project whose only root holds `children`.
pub fn app(children: Vec<Node>, connections: Vec<Connection>) -> Project {
    let mut root = node("root", "Group");
    root.children = children;
    project(vec![component("app", vec![root], connections)])
}

pub fn root_of(p: &Project) -> &Node {
    &p.components[0].graph.roots[0]
}

pub fn child<'a>(p: &'a Project, id: &str) -> &'a Node {
    p.components[0]
        .find_node(id)
        .unwrap_or_else(|| panic!("node {id} missing"))
}

pub fn with_settings(mut p: Project, settings: Value) -> Project {
    p.settings = serde_json::from_value(settings).unwrap();
    p
}
