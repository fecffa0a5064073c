//! Library side of the `projectmerge` binary.
//!
//! Kept separate from `main.rs` so the file-level flows can be tested
//! without spawning a process.

use anyhow::{Context, Result};
use projectmerge_diff::{diff_component, diff_project};
use projectmerge_merge::{MergePolicy, MergeReport, Merger};
use projectmerge_model::{Project, SourceCodeParameter, StaticTypeCatalog};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Optional configuration file for `projectmerge merge`.
///
/// ```json
/// {
///   "policy": { "settings": "prefer_theirs" },
///   "source_code": [{ "node_type": "MyScript", "parameter": "body" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub policy: MergePolicy,
    /// Extra source-code parameters on top of the builtin catalog.
    pub source_code: Vec<SourceCodeParameter>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Builds a merger from this configuration.
    pub fn merger(&self) -> Merger {
        let mut catalog = StaticTypeCatalog::builtin();
        catalog.extend(&StaticTypeCatalog::from(self.source_code.clone()));
        Merger::new(self.policy, catalog)
    }
}

/// Reads and validates a project snapshot.
pub fn load_project(path: &Path) -> Result<Project> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading project {}", path.display()))?;
    let project = Project::from_json(&raw)
        .with_context(|| format!("parsing project {}", path.display()))?;
    project
        .validate()
        .with_context(|| format!("validating project {}", path.display()))?;
    debug!("Loaded {} with {} component(s)", path.display(), project.components.len());
    Ok(project)
}

/// What `run_merge` wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeSummary {
    pub report: MergeReport,
    /// The written document carries conflict records (new or inherited).
    pub has_conflicts: bool,
}

/// Merges three snapshot files and writes the result to `output`.
///
/// Used as a git merge driver, `output` is the `ours` path.
pub fn run_merge(
    base: &Path,
    ours: &Path,
    theirs: &Path,
    output: &Path,
    config: &Config,
) -> Result<MergeSummary> {
    let (base, ours, theirs) = (load_project(base)?, load_project(ours)?, load_project(theirs)?);
    let merged = config.merger().merge(&base, &ours, &theirs);

    let json = merged.project.to_json_pretty()?;
    fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
    info!(
        "Wrote {} ({} conflict(s))",
        output.display(),
        merged.report.conflict_count()
    );

    Ok(MergeSummary {
        has_conflicts: merged.project.has_conflicts() || !merged.report.project_conflicts.is_empty(),
        report: merged.report,
    })
}

/// Diffs two snapshot files and returns the pretty JSON rendering.
///
/// With `component`, only that component's node-level diff is produced.
pub fn run_diff(from: &Path, to: &Path, component: Option<&str>) -> Result<String> {
    let (from, to) = (load_project(from)?, load_project(to)?);
    let json = match component {
        Some(name) => {
            let before = from
                .component(name)
                .with_context(|| format!("component {name} not found in the old snapshot"))?;
            let after = to
                .component(name)
                .with_context(|| format!("component {name} not found in the new snapshot"))?;
            serde_json::to_string_pretty(&diff_component(before, after))?
        }
        None => serde_json::to_string_pretty(&diff_project(&from, &to))?,
    };
    Ok(json)
}
