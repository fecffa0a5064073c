use projectmerge_model::{
    resolve, resolve_map, EntityKey, Identified, IdentityMap, Map, Side, Triplet,
};
use serde::Serialize;
use serde_json::Value;

/// Before and after values of one changed entry.
///
/// `before` is what a "reset to previous value" action restores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change<T> {
    pub before: T,
    pub after: T,
}

/// Changes to one keyed collection between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayDiff<T> {
    /// Absent in `from`, in `to` order.
    pub created: Vec<T>,
    /// Present in both but not deep-equal, in `to` order.
    pub changed: Vec<Change<T>>,
    /// Absent in `to`, in `from` order.
    pub deleted: Vec<T>,
}

impl<T> Default for ArrayDiff<T> {
    fn default() -> Self {
        Self {
            created: Vec::new(),
            changed: Vec::new(),
            deleted: Vec::new(),
        }
    }
}

impl<T> ArrayDiff<T> {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.changed.is_empty() && self.deleted.is_empty()
    }

    /// Total number of entries across the three lists.
    pub fn len(&self) -> usize {
        self.created.len() + self.changed.len() + self.deleted.len()
    }
}

/// A map-shaped collection entry (settings, styles, cloud-service fields).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub key: String,
    pub value: Value,
}

/// Walks a two-sided identity map, with `from` registered as base and `to`
/// as theirs, so deletions keep `from` order.
fn categorize<'a, V, T>(
    identities: &IdentityMap<'a, V>,
    same: impl Fn(&V, &V) -> bool,
    make: impl Fn(&EntityKey, &'a V) -> T,
) -> ArrayDiff<T> {
    let mut diff = ArrayDiff::default();

    for key in identities.keys_on(Side::Theirs) {
        let Some(triplet) = identities.get(key) else {
            continue;
        };
        match (triplet.base, triplet.theirs) {
            (None, Some(after)) => diff.created.push(make(key, after)),
            (Some(before), Some(after)) if !same(before, after) => diff.changed.push(Change {
                before: make(key, before),
                after: make(key, after),
            }),
            _ => {}
        }
    }
    for key in identities.keys_on(Side::Base) {
        if let Some(&Triplet {
            base: Some(before),
            theirs: None,
            ..
        }) = identities.get(key)
        {
            diff.deleted.push(make(key, before));
        }
    }
    diff
}

/// Categorizes an identity-bearing collection, comparing matched entries
/// with `same`.
pub(crate) fn diff_keyed_by<T>(
    from: &[T],
    to: &[T],
    same: impl Fn(&T, &T) -> bool,
) -> ArrayDiff<T>
where
    T: Identified + Clone,
{
    categorize(&resolve(from, &[], to), same, |_, entity| entity.clone())
}

/// Categorizes an identity-bearing collection by deep equality.
pub fn diff_keyed<T>(from: &[T], to: &[T]) -> ArrayDiff<T>
where
    T: Identified + Clone + PartialEq,
{
    diff_keyed_by(from, to, |a, b| a == b)
}

/// Categorizes a JSON object entry by entry. A missing object is empty.
pub fn diff_map(from: Option<&Map>, to: Option<&Map>) -> ArrayDiff<Entry> {
    categorize(
        &resolve_map(from, None, to),
        |a, b| a == b,
        |key, value| Entry {
            key: key.to_string(),
            value: value.clone(),
        },
    )
}
