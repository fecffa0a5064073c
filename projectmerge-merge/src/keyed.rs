//! diff3 over collections of identity-bearing entities.
//!
//! Every key in the union of the three versions is classified by where it
//! is present:
//! - in all three, or added on both sides: merged by the entity callback
//! - deleted on one side: dropped, unless the other side modified it
//!   relative to base, in which case the modification is kept
//! - added on one side: kept
//!
//! The result follows [`IdentityMap::merge_order`].

use projectmerge_model::{
    resolve_map, Conflict, ConflictKind, EntityKey, IdentityMap, Map, Triplet,
};
use serde_json::Value;
use tracing::debug;

use crate::{merge_scalar, Resolution};

/// What happens to one key.
#[derive(Debug, PartialEq)]
pub enum Outcome<'a, T> {
    /// Present on both sides; `base` is `None` when both sides added it.
    Merge {
        base: Option<&'a T>,
        ours: &'a T,
        theirs: &'a T,
    },
    /// Survives from exactly one side.
    Keep(&'a T),
    Drop,
}

/// Classifies one key's presence. Modify beats delete.
pub fn classify<'a, T: PartialEq>(triplet: &Triplet<'a, T>) -> Outcome<'a, T> {
    match (triplet.base, triplet.ours, triplet.theirs) {
        (base, Some(ours), Some(theirs)) => Outcome::Merge { base, ours, theirs },
        (Some(base), Some(survivor), None) | (Some(base), None, Some(survivor)) => {
            if survivor != base {
                Outcome::Keep(survivor)
            } else {
                Outcome::Drop
            }
        }
        (None, Some(added), None) | (None, None, Some(added)) => Outcome::Keep(added),
        (_, None, None) => Outcome::Drop,
    }
}

fn log_outcome<T>(key: &EntityKey, triplet: &Triplet<'_, T>, outcome: &Outcome<'_, T>) {
    match (outcome, triplet.base) {
        (Outcome::Keep(_), Some(_)) => {
            debug!("Kept {}: modified on one side, deleted on the other", key)
        }
        (Outcome::Keep(_), None) => debug!("Created {}", key),
        (Outcome::Drop, Some(_)) => debug!("Deleted {}", key),
        _ => {}
    }
}

/// Merges an ordered collection; `merge` reconciles keys present on both sides.
pub fn merge_keyed<'a, T, F>(map: &IdentityMap<'a, T>, mut merge: F) -> Vec<T>
where
    T: Clone + PartialEq,
    F: FnMut(&EntityKey, Option<&'a T>, &'a T, &'a T) -> T,
{
    map.merge_order()
        .into_iter()
        .filter_map(|(key, triplet)| {
            let outcome = classify(&triplet);
            log_outcome(key, &triplet, &outcome);
            match outcome {
                Outcome::Merge { base, ours, theirs } => Some(merge(key, base, ours, theirs)),
                Outcome::Keep(entity) => Some(entity.clone()),
                Outcome::Drop => None,
            }
        })
        .collect()
}

/// Merges a JSON object keyed by property name.
pub fn merge_keyed_map<'a, F>(map: &IdentityMap<'a, Value>, mut merge: F) -> Map
where
    F: FnMut(&str, Option<&'a Value>, &'a Value, &'a Value) -> Value,
{
    let mut merged = Map::new();
    for (key, triplet) in map.merge_order() {
        let name = match key {
            EntityKey::Name(name) | EntityKey::Id(name) => name.as_str(),
            EntityKey::Link { .. } => continue,
        };
        let outcome = classify(&triplet);
        log_outcome(key, &triplet, &outcome);
        let value = match outcome {
            Outcome::Merge { base, ours, theirs } => merge(name, base, ours, theirs),
            Outcome::Keep(value) => value.clone(),
            Outcome::Drop => continue,
        };
        merged.insert(name.to_string(), value);
    }
    merged
}

/// Result of merging a flat JSON object field by field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMerge {
    pub fields: Map,
    /// One `parameter` record per field both sides changed differently,
    /// named by the field.
    pub conflicts: Vec<Conflict>,
}

/// Merges a flat object with the scalar rule per field.
///
/// A missing object is treated as empty.
pub fn merge_fields(
    base: Option<&Map>,
    ours: Option<&Map>,
    theirs: Option<&Map>,
    resolution: Resolution,
) -> FieldMerge {
    let mut conflicts = Vec::new();
    let fields = merge_keyed_map(&resolve_map(base, ours, theirs), |name, base, ours, theirs| {
        let merged = merge_scalar(base, ours, theirs, resolution);
        if merged.conflict {
            conflicts.push(Conflict::new(
                ConflictKind::Parameter,
                name,
                ours.clone(),
                theirs.clone(),
            ));
        }
        merged.value.clone()
    });
    FieldMerge { fields, conflicts }
}

/// Like [`merge_fields`], for objects that may be absent altogether.
///
/// The object stays absent when one side removed it and the other left it
/// as it was in base, or when neither side has it.
pub fn merge_optional_fields(
    base: Option<&Map>,
    ours: Option<&Map>,
    theirs: Option<&Map>,
    resolution: Resolution,
) -> (Option<Map>, Vec<Conflict>) {
    if !survives(base, ours, theirs) {
        return (None, Vec::new());
    }
    let merged = merge_fields(base, ours, theirs, resolution);
    (Some(merged.fields), merged.conflicts)
}

/// Whether an optional value is present after the merge.
///
/// Absent when neither side has it, or when one side removed it and the
/// other left it as it was in base.
pub fn survives<T: PartialEq + ?Sized>(
    base: Option<&T>,
    ours: Option<&T>,
    theirs: Option<&T>,
) -> bool {
    match (ours, theirs) {
        (None, None) => false,
        (None, Some(other)) | (Some(other), None) => base != Some(other),
        (Some(_), Some(_)) => true,
    }
}
