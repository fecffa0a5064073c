use projectmerge_model::Conflict;
use serde::Serialize;

/// What a merge left for a human to look at.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    /// Conflicts on fields with no node to live on. Names are dotted paths
    /// such as `settings.height` or `components.<key>.name`.
    pub project_conflicts: Vec<Conflict>,
    /// Conflict records newly attached to nodes.
    pub node_conflicts: usize,
    /// Connections removed because an endpoint no longer exists.
    pub pruned_connections: usize,
}

impl MergeReport {
    /// True if the merge produced no new conflicts.
    pub fn is_clean(&self) -> bool {
        self.project_conflicts.is_empty() && self.node_conflicts == 0
    }

    pub fn conflict_count(&self) -> usize {
        self.project_conflicts.len() + self.node_conflicts
    }

    pub(crate) fn record(&mut self, path: &str, conflicts: Vec<Conflict>) {
        for mut conflict in conflicts {
            if !path.is_empty() {
                conflict.name = format!("{path}.{}", conflict.name);
            }
            self.project_conflicts.push(conflict);
        }
    }
}
