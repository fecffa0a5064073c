use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What kind of field a conflict record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    /// A simple parameter both sides changed to different values.
    Parameter,
    /// The node's type name.
    Typename,
    /// A source-code parameter; the merged value carries inline markers.
    SourceCode,
}

/// A field where both sides changed incompatibly.
///
/// Produced only by the three-way merger. `ours` and `theirs` are kept for
/// display; for [`ConflictKind::SourceCode`] `ours` is the marked-up merge
/// and `theirs` is the other side's raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub name: String,
    pub ours: Value,
    pub theirs: Value,
}

impl Conflict {
    pub fn new(kind: ConflictKind, name: impl Into<String>, ours: Value, theirs: Value) -> Self {
        Self {
            kind,
            name: name.into(),
            ours,
            theirs,
        }
    }

    /// True when `other` describes the same field.
    pub fn same_field(&self, other: &Self) -> bool {
        self.kind == other.kind && self.name == other.name
    }
}

/// A conflict together with where it lives in the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictLocation {
    pub component: String,
    pub node_id: String,
    pub conflict: Conflict,
}
