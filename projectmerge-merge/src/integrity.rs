//! Post-merge removal of dangling connections.
//!
//! One side may delete a node while the other keeps (or adds) a connection
//! to it. After the tree is merged, every connection must point at nodes
//! that still exist in the same component.

use projectmerge_model::{Component, Project};
use std::collections::HashSet;
use tracing::warn;

/// Drops connections whose endpoints are missing from the component's tree.
/// Returns how many were removed.
pub fn prune_dangling_connections(component: &mut Component) -> usize {
    let mut ids = HashSet::new();
    component.visit_nodes(&mut |node| {
        ids.insert(node.id.clone());
    });

    let before = component.graph.connections.len();
    component.graph.connections.retain(|c| {
        let keep = ids.contains(&c.from_id) && ids.contains(&c.to_id);
        if !keep {
            warn!(
                "Dropping dangling connection {}.{} -> {}.{} in component {}",
                c.from_id, c.from_property, c.to_id, c.to_property, component.name
            );
        }
        keep
    });
    before - component.graph.connections.len()
}

/// Runs [`prune_dangling_connections`] over every component.
pub fn prune_project(project: &mut Project) -> usize {
    project
        .components
        .iter_mut()
        .map(prune_dangling_connections)
        .sum()
}
