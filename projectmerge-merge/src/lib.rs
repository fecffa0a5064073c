//! Three-way structural merge for project documents.
//!
//! Reconciles two concurrently edited copies of a project against their
//! common ancestor:
//!
//! - [`merge_scalar`]: the diff3 decision for one field, with a per-call-site
//!   [`Resolution`] for genuine conflicts
//! - [`merge_keyed`]: diff3 over identity-bearing collections (components,
//!   nodes, ports, connections); modify beats delete, additions are unioned
//! - [`merge_text`]: line-based merge for source-code parameters, leaving
//!   inline conflict markers
//! - [`Merger`]: orchestrates the above over a whole [`Project`], then drops
//!   connections left dangling by a deleted node
//!
//! The engine is synchronous and pure: inputs are borrowed, the merged
//! document is a new value, and conflicts are data ([`Conflict`] records on
//! nodes, [`MergeReport`] for project and component fields), never errors.
//!
//! [`Project`]: projectmerge_model::Project
//! [`Conflict`]: projectmerge_model::Conflict

mod component;
mod error;
mod integrity;
mod keyed;
mod layout;
mod node;
mod policy;
mod project;
mod report;
mod scalar;
mod text;

pub use component::merge_connections;
pub use error::{MergeError, MergeResult};
pub use integrity::{prune_dangling_connections, prune_project};
pub use keyed::{
    classify, merge_fields, merge_keyed, merge_keyed_map, merge_optional_fields, survives,
    FieldMerge, Outcome,
};
pub use policy::{MergePolicy, Resolution};
pub use project::{merge_project, merge_project_json, MergeOutput, Merger};
pub use report::MergeReport;
pub use scalar::{merge_scalar, ScalarMerge};
pub use text::{
    merge_source_code, merge_text, TextMerge, MARKER_ORIGINAL, MARKER_OURS, MARKER_SEPARATOR,
    MARKER_THEIRS,
};
