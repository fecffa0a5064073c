use projectmerge_model::{Component, Project};
use serde::Serialize;
use tracing::debug;

use crate::{diff_keyed, diff_map, ArrayDiff, Entry};

/// Categorized changes between two project snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectDiff {
    pub components: ArrayDiff<Component>,
    pub settings: ArrayDiff<Entry>,
    pub colors: ArrayDiff<Entry>,
    pub text_styles: ArrayDiff<Entry>,
    pub cloudservices: ArrayDiff<Entry>,
}

impl ProjectDiff {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
            && self.settings.is_empty()
            && self.colors.is_empty()
            && self.text_styles.is_empty()
            && self.cloudservices.is_empty()
    }
}

/// Compares two snapshots of the same project.
///
/// Components are matched by id (name when absent) and compared deeply, so a
/// change anywhere in a component's tree lists that component as changed.
pub fn diff_project(from: &Project, to: &Project) -> ProjectDiff {
    let diff = ProjectDiff {
        components: diff_keyed(&from.components, &to.components),
        settings: diff_map(from.settings.as_ref(), to.settings.as_ref()),
        colors: diff_map(from.color_styles(), to.color_styles()),
        text_styles: diff_map(from.text_styles(), to.text_styles()),
        cloudservices: diff_map(from.cloudservices(), to.cloudservices()),
    };
    debug!(
        "Diffed {}: {} created, {} changed, {} deleted component(s)",
        to.name,
        diff.components.created.len(),
        diff.components.changed.len(),
        diff.components.deleted.len()
    );
    diff
}
