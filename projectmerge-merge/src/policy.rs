//! Per-call-site conflict resolution policy.
//!
//! When both sides change a field to different values the merge records a
//! conflict and still has to produce a value. Which side supplies it is not
//! one global rule: project-wide settings keep ours, node-level fields take
//! theirs. [`MergePolicy`] is that table, loadable from JSON.

use serde::{Deserialize, Serialize};

/// Which side wins a genuine both-changed conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    PreferOurs,
    PreferTheirs,
}

impl Resolution {
    /// Picks the winning value.
    pub fn pick<'a, T: ?Sized>(self, ours: &'a T, theirs: &'a T) -> &'a T {
        match self {
            Resolution::PreferOurs => ours,
            Resolution::PreferTheirs => theirs,
        }
    }
}

/// Conflict winners, one entry per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    /// Project name and unknown top-level fields.
    pub project: Resolution,
    /// Settings entries.
    pub settings: Resolution,
    /// Style dictionaries, cloud-service fields and other metadata.
    pub metadata: Resolution,
    /// Component display name and unknown component/graph fields.
    pub component: Resolution,
    /// Node type name.
    pub type_name: Resolution,
    /// Simple (non source-code) parameters.
    pub parameter: Resolution,
    /// Unknown node fields such as position and label, and the parent of a
    /// node both sides moved to different places.
    pub node: Resolution,
    pub port: Resolution,
    /// Unknown connection fields.
    pub connection: Resolution,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            project: Resolution::PreferOurs,
            settings: Resolution::PreferOurs,
            metadata: Resolution::PreferOurs,
            component: Resolution::PreferTheirs,
            type_name: Resolution::PreferTheirs,
            parameter: Resolution::PreferTheirs,
            node: Resolution::PreferTheirs,
            port: Resolution::PreferTheirs,
            connection: Resolution::PreferTheirs,
        }
    }
}

impl MergePolicy {
    /// Every call site resolves to `resolution`.
    pub fn uniform(resolution: Resolution) -> Self {
        Self {
            project: resolution,
            settings: resolution,
            metadata: resolution,
            component: resolution,
            type_name: resolution,
            parameter: resolution,
            node: resolution,
            port: resolution,
            connection: resolution,
        }
    }
}
