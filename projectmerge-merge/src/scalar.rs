//! The atomic diff3 decision for one field.

use crate::Resolution;

/// Outcome of merging one field.
#[derive(Debug, PartialEq, Eq)]
pub struct ScalarMerge<'a, T: ?Sized> {
    pub value: &'a T,
    /// Both sides changed the field to different values.
    pub conflict: bool,
}

/// Merges one field given its ancestor and both sides.
///
/// A missing `base` (the field was added on both sides) never equals either
/// side, so differing additions are conflicts.
pub fn merge_scalar<'a, T: PartialEq + ?Sized>(
    base: Option<&T>,
    ours: &'a T,
    theirs: &'a T,
    resolution: Resolution,
) -> ScalarMerge<'a, T> {
    if ours == theirs {
        return ScalarMerge { value: ours, conflict: false };
    }
    match base {
        Some(base) if base == ours => ScalarMerge { value: theirs, conflict: false },
        Some(base) if base == theirs => ScalarMerge { value: ours, conflict: false },
        _ => ScalarMerge {
            value: resolution.pick(ours, theirs),
            conflict: true,
        },
    }
}
