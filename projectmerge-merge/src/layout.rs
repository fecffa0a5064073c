//! Component-wide node placement.
//!
//! Node ids are unique within a component, not within one child list, so a
//! node may sit under different parents in base, ours and theirs. Each id
//! is given exactly one merged parent up front: the scalar rule over the
//! three parent ids, with the node policy deciding when both sides moved
//! it to different places. Every level of the tree is then merged from the
//! ids placed there, using each side's version of the node wherever that
//! side keeps it.

use projectmerge_model::{Identified, IdentityMap, Node, Side};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::{merge_scalar, Resolution};

/// Parent id of a node; `None` for a root.
type Parent<'a> = Option<&'a str>;

/// One side's tree, indexed by node id.
struct SideTree<'a> {
    roots: &'a [Node],
    nodes: HashMap<&'a str, (&'a Node, Parent<'a>)>,
}

impl<'a> SideTree<'a> {
    fn new(roots: &'a [Node]) -> Self {
        let mut tree = Self {
            roots,
            nodes: HashMap::new(),
        };
        for root in roots {
            tree.index(root, None);
        }
        tree
    }

    fn index(&mut self, node: &'a Node, parent: Parent<'a>) {
        if self.nodes.contains_key(node.id.as_str()) {
            warn!("Duplicate node id {} in one tree, keeping first", node.id);
            return;
        }
        self.nodes.insert(node.id.as_str(), (node, parent));
        for child in &node.children {
            self.index(child, Some(node.id.as_str()));
        }
    }

    fn children(&self, parent: Parent<'_>) -> &'a [Node] {
        match parent {
            None => self.roots,
            Some(id) => self.nodes.get(id).map_or(&[][..], |(node, _)| node.children.as_slice()),
        }
    }

    fn parent_of(&self, id: &str) -> Option<Parent<'a>> {
        self.nodes.get(id).map(|&(_, parent)| parent)
    }
}

/// A move both sides made to different parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConflictingMove<'a> {
    pub(crate) ours: Parent<'a>,
    pub(crate) theirs: Parent<'a>,
}

/// Merged parent of every node id across the three versions of a component.
pub(crate) struct Layout<'a> {
    base: SideTree<'a>,
    ours: SideTree<'a>,
    theirs: SideTree<'a>,
    placement: HashMap<&'a str, Parent<'a>>,
    /// Ids placed under each parent, in discovery order.
    placed_under: HashMap<Parent<'a>, Vec<&'a str>>,
    moves: HashMap<&'a str, ConflictingMove<'a>>,
}

impl<'a> Layout<'a> {
    pub(crate) fn new(
        base: &'a [Node],
        ours: &'a [Node],
        theirs: &'a [Node],
        resolution: Resolution,
    ) -> Self {
        let mut layout = Self {
            base: SideTree::new(base),
            ours: SideTree::new(ours),
            theirs: SideTree::new(theirs),
            placement: HashMap::new(),
            placed_under: HashMap::new(),
            moves: HashMap::new(),
        };

        let mut ids: Vec<&'a str> = Vec::new();
        for tree in [&layout.ours, &layout.theirs, &layout.base] {
            collect_ids(tree.roots, &mut ids);
        }
        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(*id));

        for &id in &ids {
            let parent = layout.decide(id, resolution);
            layout.placement.insert(id, parent);
        }
        layout.break_cycles(&ids);

        for &id in &ids {
            let parent = layout.placement.get(id).copied().flatten();
            layout.placed_under.entry(parent).or_default().push(id);
        }
        layout
    }

    fn decide(&mut self, id: &'a str, resolution: Resolution) -> Parent<'a> {
        let base = self.base.parent_of(id);
        match (self.ours.parent_of(id), self.theirs.parent_of(id)) {
            (Some(ours), Some(theirs)) => {
                let merged = merge_scalar(base.as_ref(), &ours, &theirs, resolution);
                if merged.conflict {
                    debug!("Node {} moved to different parents on both sides", id);
                    self.moves.insert(id, ConflictingMove { ours, theirs });
                }
                *merged.value
            }
            (Some(parent), None) | (None, Some(parent)) => parent,
            (None, None) => base.flatten(),
        }
    }

    /// Two moves can each be valid alone and together form a cycle (a under
    /// b on one side, b under a on the other). Such ids go back to their base
    /// parent, which is acyclic.
    fn break_cycles(&mut self, ids: &[&'a str]) {
        for &start in ids {
            let mut current = self.placement.get(start).copied().flatten();
            let mut steps = 0;
            while let Some(parent) = current {
                if steps > ids.len() {
                    break;
                }
                if parent == start {
                    let fallback = self.base.parent_of(start).flatten();
                    warn!("Node {} would become its own ancestor, keeping base parent", start);
                    self.placement.insert(start, fallback);
                    self.moves.remove(start);
                    break;
                }
                current = self.placement.get(parent).copied().flatten();
                steps += 1;
            }
        }
    }

    /// The conflicting move recorded for `id`, if both sides moved it apart.
    pub(crate) fn conflicting_move(&self, id: &str) -> Option<ConflictingMove<'a>> {
        self.moves.get(id).copied()
    }

    /// The candidates for one level of the merged tree.
    ///
    /// Each side contributes its own children of `parent` that are placed
    /// there, in its order, followed by its versions of nodes moved here by
    /// the other side.
    pub(crate) fn level(&self, parent: Parent<'a>) -> IdentityMap<'a, Node> {
        let mut map = IdentityMap::new();
        let sides = [
            (Side::Ours, &self.ours),
            (Side::Theirs, &self.theirs),
            (Side::Base, &self.base),
        ];

        for (side, tree) in sides {
            for node in tree.children(parent) {
                if self.placement.get(node.id.as_str()).copied().flatten() == parent {
                    map.insert(side, node.key(), node);
                }
            }
        }
        for &id in self.placed_under.get(&parent).into_iter().flatten() {
            for (side, tree) in sides {
                if let Some(&(node, located)) = tree.nodes.get(id) {
                    if located != parent {
                        map.insert(side, node.key(), node);
                    }
                }
            }
        }
        map
    }
}

fn collect_ids<'a>(nodes: &'a [Node], ids: &mut Vec<&'a str>) {
    for node in nodes {
        ids.push(node.id.as_str());
        collect_ids(&node.children, ids);
    }
}
