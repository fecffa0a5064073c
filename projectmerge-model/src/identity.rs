//! Entity identity across document versions.
//!
//! Entities are matched by an explicit id when they carry one and by a
//! natural key (name, or the endpoint tuple for connections) otherwise.
//! [`IdentityMap`] groups the base/ours/theirs candidates for each key so the
//! merger and differ work on index triplets instead of object identity.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::{Component, Connection, Map, Node, Port};

/// Key used to match one entity across versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKey {
    Id(String),
    Name(String),
    Link {
        from_id: String,
        from_property: String,
        to_id: String,
        to_property: String,
    },
}

/// The id or name; links render as `from.prop->to.prop`.
impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Id(id) => write!(f, "{id}"),
            EntityKey::Name(name) => write!(f, "{name}"),
            EntityKey::Link {
                from_id,
                from_property,
                to_id,
                to_property,
            } => write!(f, "{from_id}.{from_property}->{to_id}.{to_property}"),
        }
    }
}

/// Entities that can be matched across document versions.
pub trait Identified {
    fn key(&self) -> EntityKey;
}

impl Identified for Component {
    /// Id when present so renames are not seen as delete + create.
    fn key(&self) -> EntityKey {
        match &self.id {
            Some(id) => EntityKey::Id(id.clone()),
            None => EntityKey::Name(self.name.clone()),
        }
    }
}

impl Identified for Node {
    fn key(&self) -> EntityKey {
        EntityKey::Id(self.id.clone())
    }
}

impl Identified for Port {
    fn key(&self) -> EntityKey {
        EntityKey::Name(self.name.clone())
    }
}

impl Identified for Connection {
    fn key(&self) -> EntityKey {
        EntityKey::Link {
            from_id: self.from_id.clone(),
            from_property: self.from_property.clone(),
            to_id: self.to_id.clone(),
            to_property: self.to_property.clone(),
        }
    }
}

/// Which input a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Base,
    Ours,
    Theirs,
}

/// The candidates sharing one key.
#[derive(Debug)]
pub struct Triplet<'a, T> {
    pub base: Option<&'a T>,
    pub ours: Option<&'a T>,
    pub theirs: Option<&'a T>,
}

impl<T> Clone for Triplet<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Triplet<'_, T> {}

impl<T> Default for Triplet<'_, T> {
    fn default() -> Self {
        Self {
            base: None,
            ours: None,
            theirs: None,
        }
    }
}

impl<'a, T> Triplet<'a, T> {
    pub fn get(&self, side: Side) -> Option<&'a T> {
        match side {
            Side::Base => self.base,
            Side::Ours => self.ours,
            Side::Theirs => self.theirs,
        }
    }

    fn slot(&mut self, side: Side) -> &mut Option<&'a T> {
        match side {
            Side::Base => &mut self.base,
            Side::Ours => &mut self.ours,
            Side::Theirs => &mut self.theirs,
        }
    }
}

/// Key → triplet mapping over up to three versions of one collection.
#[derive(Debug)]
pub struct IdentityMap<'a, T> {
    slots: IndexMap<EntityKey, Triplet<'a, T>>,
    base_order: Vec<usize>,
    ours_order: Vec<usize>,
    theirs_order: Vec<usize>,
}

impl<T> Default for IdentityMap<'_, T> {
    fn default() -> Self {
        Self {
            slots: IndexMap::new(),
            base_order: Vec::new(),
            ours_order: Vec::new(),
            theirs_order: Vec::new(),
        }
    }
}

impl<'a, T> IdentityMap<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entity` under `key` for `side`.
    ///
    /// A key repeated within one side keeps its first entity.
    pub fn insert(&mut self, side: Side, key: EntityKey, entity: &'a T) {
        let entry = self.slots.entry(key);
        let index = entry.index();
        let slot = entry.or_default().slot(side);
        if slot.is_some() {
            if let Some((key, _)) = self.slots.get_index(index) {
                warn!("Duplicate key {} on {:?} side, keeping first", key, side);
            }
            return;
        }
        *slot = Some(entity);
        self.order_mut(side).push(index);
    }

    fn order(&self, side: Side) -> &[usize] {
        match side {
            Side::Base => &self.base_order,
            Side::Ours => &self.ours_order,
            Side::Theirs => &self.theirs_order,
        }
    }

    fn order_mut(&mut self, side: Side) -> &mut Vec<usize> {
        match side {
            Side::Base => &mut self.base_order,
            Side::Ours => &mut self.ours_order,
            Side::Theirs => &mut self.theirs_order,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, key: &EntityKey) -> Option<&Triplet<'a, T>> {
        self.slots.get(key)
    }

    /// Keys present on `side`, in that side's order.
    pub fn keys_on(&self, side: Side) -> impl Iterator<Item = &EntityKey> + '_ {
        self.order(side)
            .iter()
            .filter_map(|&i| self.slots.get_index(i).map(|(k, _)| k))
    }

    /// Every key with its triplet, in merge order.
    ///
    /// Ours' order is primary unless ours kept base's order untouched, in
    /// which case theirs' order is. Keys the primary side lacks follow in the
    /// secondary side's order, then base-only keys.
    pub fn merge_order(&self) -> Vec<(&EntityKey, Triplet<'a, T>)> {
        let (primary, secondary) = if self.ours_order == self.base_order {
            (&self.theirs_order, &self.ours_order)
        } else {
            (&self.ours_order, &self.theirs_order)
        };

        let mut seen = vec![false; self.slots.len()];
        let mut ordered = Vec::with_capacity(self.slots.len());
        for &index in primary.iter().chain(secondary).chain(&self.base_order) {
            if std::mem::replace(&mut seen[index], true) {
                continue;
            }
            if let Some((key, triplet)) = self.slots.get_index(index) {
                ordered.push((key, *triplet));
            }
        }
        ordered
    }

    /// Every key with its triplet, in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityKey, &Triplet<'a, T>)> + '_ {
        self.slots.iter()
    }
}

/// Groups three versions of an identity-bearing collection by key.
pub fn resolve<'a, T: Identified>(
    base: &'a [T],
    ours: &'a [T],
    theirs: &'a [T],
) -> IdentityMap<'a, T> {
    let mut map = IdentityMap::new();
    for (side, items) in [(Side::Ours, ours), (Side::Theirs, theirs), (Side::Base, base)] {
        for item in items {
            map.insert(side, item.key(), item);
        }
    }
    map
}

/// Groups three versions of a JSON object by property name.
///
/// A missing object is treated as empty.
pub fn resolve_map<'a>(
    base: Option<&'a Map>,
    ours: Option<&'a Map>,
    theirs: Option<&'a Map>,
) -> IdentityMap<'a, Value> {
    let mut map = IdentityMap::new();
    for (side, object) in [(Side::Ours, ours), (Side::Theirs, theirs), (Side::Base, base)] {
        for (name, value) in object.into_iter().flatten() {
            map.insert(side, EntityKey::Name(name.clone()), value);
        }
    }
    map
}
