//! Per-node merge: type name, parameters, ports, children.

use projectmerge_model::{
    resolve, resolve_map, Conflict, ConflictKind, Map, Node, ParameterKind, Plug, Port,
    TypeCatalog,
};
use serde_json::Value;
use tracing::debug;

use crate::keyed::{classify, Outcome};
use crate::layout::Layout;
use crate::text::merge_source_code;
use crate::{merge_fields, merge_keyed, merge_keyed_map, merge_scalar, MergePolicy, Resolution};

/// Walks component trees, counting the conflicts it attaches.
pub(crate) struct GraphMerger<'c> {
    pub(crate) policy: &'c MergePolicy,
    pub(crate) catalog: &'c dyn TypeCatalog,
    pub(crate) conflicts: usize,
    /// Component and graph level conflicts, named `<component>.<path>`.
    pub(crate) component_conflicts: Vec<Conflict>,
}

impl<'c> GraphMerger<'c> {
    pub(crate) fn new(policy: &'c MergePolicy, catalog: &'c dyn TypeCatalog) -> Self {
        Self {
            policy,
            catalog,
            conflicts: 0,
            component_conflicts: Vec::new(),
        }
    }

    /// Merges a component's node forest.
    ///
    /// Every node id ends up in at most one place, even when the sides moved
    /// it under different parents.
    pub(crate) fn merge_roots<'a>(
        &mut self,
        base: &'a [Node],
        ours: &'a [Node],
        theirs: &'a [Node],
    ) -> Vec<Node> {
        let layout = Layout::new(base, ours, theirs, self.policy.node);
        self.merge_level(&layout, None, false)
    }

    /// Merges the nodes placed under `parent`.
    ///
    /// With `kept` set the level belongs to a subtree one side deleted and
    /// the other modified; the deleting side's absence does not drop nodes
    /// the surviving side still has.
    fn merge_level<'a>(
        &mut self,
        layout: &Layout<'a>,
        parent: Option<&'a str>,
        kept: bool,
    ) -> Vec<Node> {
        let identities = layout.level(parent);
        let mut merged = Vec::new();
        for (key, triplet) in identities.merge_order() {
            let outcome = if kept {
                match (triplet.ours, triplet.theirs) {
                    (Some(ours), Some(theirs)) => Outcome::Merge {
                        base: triplet.base,
                        ours,
                        theirs,
                    },
                    (Some(node), None) | (None, Some(node)) => Outcome::Keep(node),
                    (None, None) => Outcome::Drop,
                }
            } else {
                classify(&triplet)
            };
            match outcome {
                Outcome::Merge { base, ours, theirs } => {
                    merged.push(self.merge_node(layout, base, ours, theirs))
                }
                Outcome::Keep(node) => {
                    debug!("Keeping node {} from one side", key);
                    merged.push(self.keep_node(layout, node));
                }
                Outcome::Drop => debug!("Dropping node {}", key),
            }
        }
        merged
    }

    fn keep_node<'a>(&mut self, layout: &Layout<'a>, node: &'a Node) -> Node {
        Node {
            children: self.merge_level(layout, Some(node.id.as_str()), true),
            ..node.detached()
        }
    }

    fn merge_node<'a>(
        &mut self,
        layout: &Layout<'a>,
        base: Option<&'a Node>,
        ours: &'a Node,
        theirs: &'a Node,
    ) -> Node {
        let mut conflicts = Vec::new();

        let type_name = merge_scalar(
            base.map(|b| b.type_name.as_str()),
            ours.type_name.as_str(),
            theirs.type_name.as_str(),
            self.policy.type_name,
        );
        if type_name.conflict {
            conflicts.push(Conflict::new(
                ConflictKind::Typename,
                "type",
                Value::String(ours.type_name.clone()),
                Value::String(theirs.type_name.clone()),
            ));
        }
        let type_name = type_name.value.to_string();

        if let Some(moved) = layout.conflicting_move(&ours.id) {
            let parent = |id: Option<&str>| id.map_or(Value::Null, |id| Value::String(id.into()));
            conflicts.push(Conflict::new(
                ConflictKind::Parameter,
                "parent",
                parent(moved.ours),
                parent(moved.theirs),
            ));
        }

        let parameters = self.merge_parameters(&type_name, base, ours, theirs, &mut conflicts);

        let ports = merge_keyed(
            &resolve(
                base.map_or(&[][..], |b| b.ports.as_slice()),
                &ours.ports,
                &theirs.ports,
            ),
            |_, base, ours, theirs| self.merge_port(base, ours, theirs, &mut conflicts),
        );

        let children = self.merge_level(layout, Some(ours.id.as_str()), false);

        let extra = merge_fields(
            base.map(|b| &b.extra),
            Some(&ours.extra),
            Some(&theirs.extra),
            self.policy.node,
        );
        conflicts.extend(extra.conflicts);

        if !conflicts.is_empty() {
            debug!("Node {} has {} new conflict(s)", ours.id, conflicts.len());
            self.conflicts += conflicts.len();
        }

        Node {
            id: ours.id.clone(),
            type_name,
            parameters,
            ports,
            children,
            conflicts: carry_conflicts(base, ours, theirs, conflicts),
            extra: extra.fields,
        }
    }

    fn merge_parameters(
        &self,
        node_type: &str,
        base: Option<&Node>,
        ours: &Node,
        theirs: &Node,
        conflicts: &mut Vec<Conflict>,
    ) -> Map {
        let identities = resolve_map(
            base.map(|b| &b.parameters),
            Some(&ours.parameters),
            Some(&theirs.parameters),
        );
        merge_keyed_map(&identities, |name, base, ours, theirs| {
            match self.catalog.parameter_kind(node_type, name) {
                ParameterKind::SourceCode => {
                    let (value, conflict) =
                        merge_source_code(name, base, ours, theirs, self.policy.parameter);
                    conflicts.extend(conflict);
                    value
                }
                ParameterKind::Scalar => {
                    let merged = merge_scalar(base, ours, theirs, self.policy.parameter);
                    if merged.conflict {
                        conflicts.push(Conflict::new(
                            ConflictKind::Parameter,
                            name,
                            ours.clone(),
                            theirs.clone(),
                        ));
                    }
                    merged.value.clone()
                }
            }
        })
    }

    /// Port conflicts are attached to the node as `port.<name>.<field>`.
    fn merge_port(
        &self,
        base: Option<&Port>,
        ours: &Port,
        theirs: &Port,
        conflicts: &mut Vec<Conflict>,
    ) -> Port {
        let resolution = self.policy.port;
        let path = |field: &str| format!("port.{}.{}", ours.name, field);

        let port_type = merge_scalar(
            base.map(|b| &b.port_type),
            &ours.port_type,
            &theirs.port_type,
            resolution,
        );
        if port_type.conflict {
            conflicts.push(Conflict::new(
                ConflictKind::Parameter,
                path("type"),
                ours.port_type.clone(),
                theirs.port_type.clone(),
            ));
        }

        let plug = merge_scalar(base.map(|b| &b.plug), &ours.plug, &theirs.plug, resolution);
        if plug.conflict {
            let wire = |plug: Option<Plug>| serde_json::to_value(plug).unwrap_or(Value::Null);
            conflicts.push(Conflict::new(
                ConflictKind::Parameter,
                path("plug"),
                wire(ours.plug),
                wire(theirs.plug),
            ));
        }

        let extra = merge_fields(
            base.map(|b| &b.extra),
            Some(&ours.extra),
            Some(&theirs.extra),
            resolution,
        );
        conflicts.extend(extra.conflicts.into_iter().map(|mut c| {
            c.name = path(&c.name);
            c
        }));

        Port {
            name: ours.name.clone(),
            port_type: port_type.value.clone(),
            plug: *plug.value,
            extra: extra.fields,
        }
    }
}

/// Conflicts left unresolved by an earlier merge follow the scalar rule
/// (ours on disagreement); a new record replaces an inherited one for the
/// same field.
fn carry_conflicts(
    base: Option<&Node>,
    ours: &Node,
    theirs: &Node,
    fresh: Vec<Conflict>,
) -> Vec<Conflict> {
    let mut carried = merge_scalar(
        base.map(|b| &b.conflicts),
        &ours.conflicts,
        &theirs.conflicts,
        Resolution::PreferOurs,
    )
    .value
    .clone();
    for conflict in fresh {
        carried.retain(|existing| !existing.same_field(&conflict));
        carried.push(conflict);
    }
    carried
}
