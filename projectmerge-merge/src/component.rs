//! Per-component merge: display name, node tree, connections.

use projectmerge_model::{resolve, Component, Conflict, ConflictKind, Connection, EntityKey, Graph};
use serde_json::Value;

use crate::node::GraphMerger;
use crate::{merge_fields, merge_keyed, merge_scalar, Resolution};

impl GraphMerger<'_> {
    pub(crate) fn merge_component(
        &mut self,
        key: &EntityKey,
        base: Option<&Component>,
        ours: &Component,
        theirs: &Component,
    ) -> Component {
        let resolution = self.policy.component;
        let base_graph = base.map(|b| &b.graph);

        let name = merge_scalar(
            base.map(|b| b.name.as_str()),
            ours.name.as_str(),
            theirs.name.as_str(),
            resolution,
        );
        if name.conflict {
            self.record_component(
                key,
                "",
                vec![Conflict::new(
                    ConflictKind::Parameter,
                    "name",
                    Value::String(ours.name.clone()),
                    Value::String(theirs.name.clone()),
                )],
            );
        }
        let name = name.value.to_string();

        let roots = self.merge_roots(
            base_graph.map_or(&[][..], |g| g.roots.as_slice()),
            &ours.graph.roots,
            &theirs.graph.roots,
        );

        let (connections, conflicts) = merge_connections(
            base_graph.map_or(&[][..], |g| g.connections.as_slice()),
            &ours.graph.connections,
            &theirs.graph.connections,
            self.policy.connection,
        );
        self.record_component(key, "connections", conflicts);

        let graph_extra = merge_fields(
            base_graph.map(|g| &g.extra),
            Some(&ours.graph.extra),
            Some(&theirs.graph.extra),
            resolution,
        );
        self.record_component(key, "graph", graph_extra.conflicts);

        let extra = merge_fields(
            base.map(|b| &b.extra),
            Some(&ours.extra),
            Some(&theirs.extra),
            resolution,
        );
        self.record_component(key, "", extra.conflicts);

        Component {
            id: ours.id.clone().or_else(|| theirs.id.clone()),
            name,
            graph: Graph {
                roots,
                connections,
                extra: graph_extra.fields,
            },
            extra: extra.fields,
        }
    }

    /// Files conflicts under `<component>.<path>.<field>`.
    fn record_component(&mut self, key: &EntityKey, path: &str, conflicts: Vec<Conflict>) {
        let prefix = if path.is_empty() {
            key.to_string()
        } else {
            format!("{key}.{path}")
        };
        self.component_conflicts
            .extend(conflicts.into_iter().map(|mut conflict| {
                conflict.name = format!("{prefix}.{}", conflict.name);
                conflict
            }));
    }
}

/// Merges connections as a set keyed on their endpoints.
///
/// A connection survives when either side has it and the other side did not
/// remove it relative to base. Only a connection's extra fields can
/// conflict; those records are named `<from.prop->to.prop>.<field>`.
pub fn merge_connections(
    base: &[Connection],
    ours: &[Connection],
    theirs: &[Connection],
    resolution: Resolution,
) -> (Vec<Connection>, Vec<Conflict>) {
    let mut conflicts = Vec::new();
    let connections = merge_keyed(&resolve(base, ours, theirs), |key, base, ours, theirs| {
        let extra = merge_fields(
            base.map(|b| &b.extra),
            Some(&ours.extra),
            Some(&theirs.extra),
            resolution,
        );
        conflicts.extend(extra.conflicts.into_iter().map(|mut conflict| {
            conflict.name = format!("{key}.{}", conflict.name);
            conflict
        }));
        Connection {
            extra: extra.fields,
            ..ours.clone()
        }
    });
    (connections, conflicts)
}
