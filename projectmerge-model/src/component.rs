use serde::{Deserialize, Serialize};

use crate::{Connection, Map, Node};

/// A named, id-stable subtree of the project.
///
/// Older documents may lack an `id`; such components are matched across
/// versions by display name instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Component {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub graph: Graph,
    #[serde(flatten)]
    pub extra: Map,
}

/// The node tree and connection list of one component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub roots: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Graph-level fields this model does not name (comments, ...).
    #[serde(flatten)]
    pub extra: Map,
}

impl Component {
    /// Calls `f` for every node in the tree, parents before children.
    pub fn visit_nodes<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        for root in &self.graph.roots {
            root.visit(f);
        }
    }

    /// Finds a node anywhere in the tree.
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.graph.roots.iter().find_map(|root| root.find(id))
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit_nodes(&mut |_| count += 1);
        count
    }
}
