//! Two-way structural diff for change review.
//!
//! Given two snapshots of a project (no ancestor), every keyed collection is
//! split into entries that were created, changed or deleted. Entries that are
//! deep-equal on both sides are left out. Unlike the three-way merger this
//! never produces conflicts; it only categorizes.

mod array_diff;
mod component;
mod project;

pub use array_diff::{diff_keyed, diff_map, ArrayDiff, Change, Entry};
pub use component::{diff_component, ComponentDiff};
pub use project::{diff_project, ProjectDiff};
