use projectmerge_model::{Component, Connection, Node};
use serde::Serialize;

use crate::array_diff::diff_keyed_by;
use crate::{diff_keyed, ArrayDiff};

/// Node- and connection-level changes inside one component.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentDiff {
    /// Nodes from anywhere in the tree, without their children.
    pub nodes: ArrayDiff<Node>,
    pub connections: ArrayDiff<Connection>,
}

impl ComponentDiff {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }
}

fn flatten(component: &Component) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(component.node_count());
    component.visit_nodes(&mut |node| nodes.push(node.detached()));
    nodes
}

/// Compares two versions of one component.
///
/// The tree is flattened by node id and each node is compared on its own
/// fields, so editing a child reports that child alone and moving a node
/// under another parent does not report it at all.
pub fn diff_component(from: &Component, to: &Component) -> ComponentDiff {
    ComponentDiff {
        nodes: diff_keyed_by(&flatten(from), &flatten(to), Node::shallow_eq),
        connections: diff_keyed(&from.graph.connections, &to.graph.connections),
    }
}
