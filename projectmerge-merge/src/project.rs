//! Project-level orchestration: scalars first, then components, then the
//! integrity pass over the merged tree.

use projectmerge_model::{
    resolve, Conflict, ConflictKind, Metadata, Project, StaticTypeCatalog, Styles, TypeCatalog,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::integrity::prune_project;
use crate::keyed::survives;
use crate::node::GraphMerger;
use crate::{
    merge_fields, merge_keyed, merge_optional_fields, merge_scalar, MergeError, MergePolicy,
    MergeReport, MergeResult,
};

/// A merged document and what it left unresolved.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutput {
    pub project: Project,
    pub report: MergeReport,
}

/// Three-way merger for project documents.
///
/// Holds the per-call-site [`MergePolicy`] and the [`TypeCatalog`] that
/// decides which parameters are merged as source code. A `Merger` has no
/// mutable state; independent merges may run concurrently on one instance.
pub struct Merger {
    policy: MergePolicy,
    catalog: Box<dyn TypeCatalog>,
}

impl Default for Merger {
    fn default() -> Self {
        Self::new(MergePolicy::default(), StaticTypeCatalog::builtin())
    }
}

impl Merger {
    pub fn new(policy: MergePolicy, catalog: impl TypeCatalog + 'static) -> Self {
        Self {
            policy,
            catalog: Box::new(catalog),
        }
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    /// Merges `ours` and `theirs` against their common ancestor `base`.
    ///
    /// Never fails: conflicts are attached to nodes or listed in the report.
    pub fn merge(&self, base: &Project, ours: &Project, theirs: &Project) -> MergeOutput {
        let policy = &self.policy;
        let mut report = MergeReport::default();

        let name = merge_scalar(
            Some(base.name.as_str()),
            ours.name.as_str(),
            theirs.name.as_str(),
            policy.project,
        );
        if name.conflict {
            report.project_conflicts.push(Conflict::new(
                ConflictKind::Parameter,
                "name",
                Value::String(ours.name.clone()),
                Value::String(theirs.name.clone()),
            ));
        }
        let name = name.value.to_string();

        let (settings, conflicts) = merge_optional_fields(
            base.settings.as_ref(),
            ours.settings.as_ref(),
            theirs.settings.as_ref(),
            policy.settings,
        );
        report.record("settings", conflicts);

        let metadata = self.merge_metadata(
            base.metadata.as_ref(),
            ours.metadata.as_ref(),
            theirs.metadata.as_ref(),
            &mut report,
        );

        let extra = merge_fields(
            Some(&base.extra),
            Some(&ours.extra),
            Some(&theirs.extra),
            policy.project,
        );
        report.record("", extra.conflicts);

        let mut graphs = GraphMerger::new(policy, self.catalog.as_ref());
        let components = merge_keyed(
            &resolve(&base.components, &ours.components, &theirs.components),
            |key, base, ours, theirs| {
                debug!("Merging component {}", key);
                graphs.merge_component(key, base, ours, theirs)
            },
        );
        report.node_conflicts = graphs.conflicts;
        report.record("components", graphs.component_conflicts);

        let mut project = Project {
            name,
            settings,
            metadata,
            components,
            extra: extra.fields,
        };
        report.pruned_connections = prune_project(&mut project);

        info!(
            "Merged {} component(s): {} node conflict(s), {} project conflict(s), {} dangling connection(s) pruned",
            project.components.len(),
            report.node_conflicts,
            report.project_conflicts.len(),
            report.pruned_connections
        );

        MergeOutput { project, report }
    }

    /// Validates all three snapshots, then merges them.
    ///
    /// Fails before any merging if a snapshot is malformed, so there is never
    /// a partial result.
    pub fn merge_checked(
        &self,
        base: &Project,
        ours: &Project,
        theirs: &Project,
    ) -> MergeResult<MergeOutput> {
        for (side, project) in [("base", base), ("ours", ours), ("theirs", theirs)] {
            project
                .validate()
                .map_err(|source| MergeError::Snapshot { side, source })?;
        }
        Ok(self.merge(base, ours, theirs))
    }

    fn merge_metadata(
        &self,
        base: Option<&Metadata>,
        ours: Option<&Metadata>,
        theirs: Option<&Metadata>,
        report: &mut MergeReport,
    ) -> Option<Metadata> {
        if !survives(base, ours, theirs) {
            return None;
        }
        let resolution = self.policy.metadata;

        let styles = self.merge_styles(
            base.and_then(|m| m.styles.as_ref()),
            ours.and_then(|m| m.styles.as_ref()),
            theirs.and_then(|m| m.styles.as_ref()),
            report,
        );

        let (cloudservices, conflicts) = merge_optional_fields(
            base.and_then(|m| m.cloudservices.as_ref()),
            ours.and_then(|m| m.cloudservices.as_ref()),
            theirs.and_then(|m| m.cloudservices.as_ref()),
            resolution,
        );
        report.record("metadata.cloudservices", conflicts);

        let extra = merge_fields(
            base.map(|m| &m.extra),
            ours.map(|m| &m.extra),
            theirs.map(|m| &m.extra),
            resolution,
        );
        report.record("metadata", extra.conflicts);

        Some(Metadata {
            styles,
            cloudservices,
            extra: extra.fields,
        })
    }

    fn merge_styles(
        &self,
        base: Option<&Styles>,
        ours: Option<&Styles>,
        theirs: Option<&Styles>,
        report: &mut MergeReport,
    ) -> Option<Styles> {
        if !survives(base, ours, theirs) {
            return None;
        }
        let resolution = self.policy.metadata;

        let (colors, conflicts) = merge_optional_fields(
            base.and_then(|s| s.colors.as_ref()),
            ours.and_then(|s| s.colors.as_ref()),
            theirs.and_then(|s| s.colors.as_ref()),
            resolution,
        );
        report.record("metadata.styles.colors", conflicts);

        let (text, conflicts) = merge_optional_fields(
            base.and_then(|s| s.text.as_ref()),
            ours.and_then(|s| s.text.as_ref()),
            theirs.and_then(|s| s.text.as_ref()),
            resolution,
        );
        report.record("metadata.styles.text", conflicts);

        let extra = merge_fields(
            base.map(|s| &s.extra),
            ours.map(|s| &s.extra),
            theirs.map(|s| &s.extra),
            resolution,
        );
        report.record("metadata.styles", extra.conflicts);

        Some(Styles {
            colors,
            text,
            extra: extra.fields,
        })
    }
}

/// Merges with the default policy and the builtin type catalog.
pub fn merge_project(base: &Project, ours: &Project, theirs: &Project) -> Project {
    Merger::default().merge(base, ours, theirs).project
}

/// Merges three persisted documents and returns the merged JSON.
///
/// Fails atomically if any input cannot be decoded or is malformed.
pub fn merge_project_json(base: &str, ours: &str, theirs: &str) -> MergeResult<String> {
    let load = |side: &'static str, json: &str| {
        Project::from_json(json).map_err(|source| MergeError::Snapshot { side, source })
    };
    let (base, ours, theirs) = (load("base", base)?, load("ours", ours)?, load("theirs", theirs)?);
    let output = Merger::default().merge_checked(&base, &ours, &theirs)?;
    Ok(serde_json::to_string_pretty(&output.project)?)
}
