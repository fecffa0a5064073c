//! Line-based three-way merge for source-code fields.
//!
//! Each side is aligned against the ancestor with a Myers line diff. Runs of
//! base lines kept by both sides are stable; the regions between them are
//! taken from whichever side changed them, or wrapped in conflict markers
//! when both did.

use projectmerge_model::{Conflict, ConflictKind};
use serde_json::Value;
use similar::{capture_diff_slices, Algorithm, DiffOp};
use tracing::warn;

use crate::{merge_scalar, Resolution};

pub const MARKER_OURS: &str = "<<<<<<< Ours";
pub const MARKER_ORIGINAL: &str = "||||||| Original";
pub const MARKER_SEPARATOR: &str = "=======";
pub const MARKER_THEIRS: &str = ">>>>>>> Theirs";

/// Result of a line merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMerge {
    pub text: String,
    /// At least one region carries conflict markers.
    pub conflicted: bool,
}

/// For every base line, the index of the equal line in `side`, if kept.
fn align(base: &[&str], side: &[&str]) -> Vec<Option<usize>> {
    let mut matched = vec![None; base.len()];
    for op in capture_diff_slices(Algorithm::Myers, base, side) {
        if let DiffOp::Equal {
            old_index,
            new_index,
            len,
        } = op
        {
            for offset in 0..len {
                matched[old_index + offset] = Some(new_index + offset);
            }
        }
    }
    matched
}

/// Merges `ours` and `theirs` against their common ancestor `base`.
pub fn merge_text(base: &str, ours: &str, theirs: &str) -> TextMerge {
    if ours == theirs || base == theirs {
        return TextMerge { text: ours.to_string(), conflicted: false };
    }
    if base == ours {
        return TextMerge { text: theirs.to_string(), conflicted: false };
    }

    let base_lines: Vec<&str> = base.split('\n').collect();
    let ours_lines: Vec<&str> = ours.split('\n').collect();
    let theirs_lines: Vec<&str> = theirs.split('\n').collect();
    let in_ours = align(&base_lines, &ours_lines);
    let in_theirs = align(&base_lines, &theirs_lines);

    let mut out: Vec<&str> = Vec::new();
    let mut conflicted = false;
    let (mut b, mut o, mut t) = (0, 0, 0);

    loop {
        // Stable run: the next base line is kept at the cursor on both sides.
        while b < base_lines.len() && in_ours[b] == Some(o) && in_theirs[b] == Some(t) {
            out.push(base_lines[b]);
            b += 1;
            o += 1;
            t += 1;
        }
        if b == base_lines.len() && o == ours_lines.len() && t == theirs_lines.len() {
            break;
        }

        // Next base line both sides kept bounds the unstable region.
        let anchor = (b..base_lines.len()).find_map(|k| match (in_ours[k], in_theirs[k]) {
            (Some(ko), Some(kt)) => Some((k, ko, kt)),
            _ => None,
        });
        let (next_b, next_o, next_t) =
            anchor.unwrap_or((base_lines.len(), ours_lines.len(), theirs_lines.len()));

        let base_chunk = &base_lines[b..next_b];
        let ours_chunk = &ours_lines[o..next_o];
        let theirs_chunk = &theirs_lines[t..next_t];

        if ours_chunk == base_chunk {
            out.extend_from_slice(theirs_chunk);
        } else if theirs_chunk == base_chunk || ours_chunk == theirs_chunk {
            out.extend_from_slice(ours_chunk);
        } else {
            conflicted = true;
            out.push(MARKER_OURS);
            out.extend_from_slice(ours_chunk);
            out.push(MARKER_ORIGINAL);
            out.extend_from_slice(base_chunk);
            out.push(MARKER_SEPARATOR);
            out.extend_from_slice(theirs_chunk);
            out.push(MARKER_THEIRS);
        }

        b = next_b;
        o = next_o;
        t = next_t;
    }

    TextMerge {
        text: out.join("\n"),
        conflicted,
    }
}

/// Merges a source-code parameter.
///
/// Unchanged or one-sided edits resolve like the scalar rule. When both
/// sides edited the text the result carries inline markers and a
/// `sourceCode` conflict keeps the marked-up text as `ours` and the other
/// side's raw value as `theirs`. Without an ancestor, ours is kept. Values
/// that are not strings fall back to the scalar rule with `fallback`.
pub fn merge_source_code(
    name: &str,
    base: Option<&Value>,
    ours: &Value,
    theirs: &Value,
    fallback: Resolution,
) -> (Value, Option<Conflict>) {
    if ours == theirs {
        return (ours.clone(), None);
    }
    let Some(base) = base.filter(|b| !b.is_null()) else {
        warn!("No ancestor for source field {}, keeping ours", name);
        return (ours.clone(), None);
    };

    match (base.as_str(), ours.as_str(), theirs.as_str()) {
        (Some(base), Some(ours), Some(theirs_text)) => {
            let merged = merge_text(base, ours, theirs_text);
            let text = Value::String(merged.text);
            if merged.conflicted {
                let conflict =
                    Conflict::new(ConflictKind::SourceCode, name, text.clone(), theirs.clone());
                (text, Some(conflict))
            } else {
                (text, None)
            }
        }
        _ => {
            let merged = merge_scalar(Some(base), ours, theirs, fallback);
            let conflict = merged.conflict.then(|| {
                Conflict::new(ConflictKind::Parameter, name, ours.clone(), theirs.clone())
            });
            (merged.value.clone(), conflict)
        }
    }
}
