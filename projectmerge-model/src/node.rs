use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Conflict, Map};

/// A typed element in a component's tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    /// Stable across renames and moves.
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Port>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    /// Attached only by the three-way merger.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<Conflict>,
    /// Fields this model does not name (position, label, variant, ...).
    #[serde(flatten)]
    pub extra: Map,
}

impl Node {
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Builder-style parameter assignment.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// Calls `f` on this node and then on every descendant, depth first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Finds this node or a descendant by id.
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Compares the node's own fields, ignoring its children.
    pub fn shallow_eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.type_name == other.type_name
            && self.parameters == other.parameters
            && self.ports == other.ports
            && self.conflicts == other.conflicts
            && self.extra == other.extra
    }

    /// A copy of the node without its children.
    pub fn detached(&self) -> Self {
        Self {
            children: Vec::new(),
            ..self.clone()
        }
    }
}

/// Direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plug {
    #[serde(rename = "input")]
    Input,
    #[serde(rename = "output")]
    Output,
    #[serde(rename = "input/output")]
    InputOutput,
}

/// A named, typed attachment point on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    /// Type descriptor: a plain type name or an object with editor hints.
    #[serde(rename = "type", default)]
    pub port_type: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plug: Option<Plug>,
    #[serde(flatten)]
    pub extra: Map,
}

impl Port {
    pub fn new(name: impl Into<String>, port_type: Value, plug: Plug) -> Self {
        Self {
            name: name.into(),
            port_type,
            plug: Some(plug),
            extra: Map::new(),
        }
    }
}

/// A directed link from a source node's output to a target node's input.
///
/// Connections have no id of their own; the four endpoint fields are their
/// identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from_id: String,
    pub from_property: String,
    pub to_id: String,
    pub to_property: String,
    #[serde(flatten)]
    pub extra: Map,
}

impl Connection {
    pub fn new(
        from_id: impl Into<String>,
        from_property: impl Into<String>,
        to_id: impl Into<String>,
        to_property: impl Into<String>,
    ) -> Self {
        Self {
            from_id: from_id.into(),
            from_property: from_property.into(),
            to_id: to_id.into(),
            to_property: to_property.into(),
            extra: Map::new(),
        }
    }
}
