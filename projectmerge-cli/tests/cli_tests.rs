use pretty_assertions::assert_eq;
use projectmerge_cli::{load_project, run_diff, run_merge, Config};
use projectmerge_merge::Resolution;
use projectmerge_model::{Component, Node, Project, SourceCodeParameter};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn snapshot(text: &str) -> Project {
    let mut component = Component {
        id: Some("app".into()),
        name: "/App".into(),
        ..Component::default()
    };
    component.graph.roots = vec![
        Node::new("root", "Group")
            .with_child(Node::new("label", "Text").with_parameter("text", json!(text))),
    ];
    Project {
        name: "Weather".into(),
        components: vec![component],
        ..Project::default()
    }
}

fn write(dir: &TempDir, name: &str, project: &Project) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, project.to_json_pretty().unwrap()).unwrap();
    path
}

fn label(path: &Path) -> Value {
    let merged = load_project(path).unwrap();
    merged.components[0]
        .find_node("label")
        .and_then(|n| n.parameter("text"))
        .cloned()
        .unwrap()
}

// ── merge ──

#[test]
fn clean_merge_writes_output() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.json", &snapshot("a"));
    let ours = write(&dir, "ours.json", &snapshot("a"));
    let theirs = write(&dir, "theirs.json", &snapshot("b"));
    let output = dir.path().join("merged.json");

    let summary = run_merge(&base, &ours, &theirs, &output, &Config::default()).unwrap();
    assert!(!summary.has_conflicts);
    assert!(summary.report.is_clean());
    assert_eq!(label(&output), json!("b"));
}

#[test]
fn merge_driver_overwrites_ours_and_flags_conflicts() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.json", &snapshot("a"));
    let ours = write(&dir, "ours.json", &snapshot("b"));
    let theirs = write(&dir, "theirs.json", &snapshot("c"));

    let summary = run_merge(&base, &ours, &theirs, &ours, &Config::default()).unwrap();
    assert!(summary.has_conflicts);
    assert_eq!(summary.report.node_conflicts, 1);

    let merged = load_project(&ours).unwrap();
    assert!(merged.has_conflicts());
    assert_eq!(label(&ours), json!("c"));
}

#[test]
fn component_renamed_on_both_sides_flags_conflicts() {
    let renamed = |name: &str| {
        let mut project = snapshot("a");
        project.components[0].name = name.into();
        project
    };
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.json", &snapshot("a"));
    let ours = write(&dir, "ours.json", &renamed("/Ours"));
    let theirs = write(&dir, "theirs.json", &renamed("/Theirs"));
    let output = dir.path().join("merged.json");

    let summary = run_merge(&base, &ours, &theirs, &output, &Config::default()).unwrap();
    assert!(summary.has_conflicts);
    assert!(!summary.report.is_clean());
    assert_eq!(summary.report.project_conflicts[0].name, "components.app.name");
    assert_eq!(load_project(&output).unwrap().components[0].name, "/Theirs");
}

#[test]
fn config_policy_changes_the_winner() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.json", &snapshot("a"));
    let ours = write(&dir, "ours.json", &snapshot("b"));
    let theirs = write(&dir, "theirs.json", &snapshot("c"));
    let output = dir.path().join("merged.json");

    let mut config = Config::default();
    config.policy.parameter = Resolution::PreferOurs;
    run_merge(&base, &ours, &theirs, &output, &config).unwrap();
    assert_eq!(label(&output), json!("b"));
}

#[test]
fn config_adds_source_code_parameters() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.json", &snapshot("x\ny\nz"));
    let ours = write(&dir, "ours.json", &snapshot("X\ny\nz"));
    let theirs = write(&dir, "theirs.json", &snapshot("x\ny\nZ"));
    let output = dir.path().join("merged.json");

    let config = Config {
        source_code: vec![SourceCodeParameter {
            node_type: "Text".into(),
            parameter: "text".into(),
        }],
        ..Config::default()
    };
    let summary = run_merge(&base, &ours, &theirs, &output, &config).unwrap();
    assert!(!summary.has_conflicts);
    assert_eq!(label(&output), json!("X\ny\nZ"));
}

#[test]
fn invalid_snapshot_fails_without_writing() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.json", &snapshot("a"));
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ nope").unwrap();
    let output = dir.path().join("merged.json");

    let err = run_merge(&base, &broken, &base, &output, &Config::default()).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
    assert!(!output.exists());
}

// ── config ──

#[test]
fn config_loads_partial_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("projectmerge.json");
    fs::write(
        &path,
        r#"{ "policy": { "settings": "prefer_theirs" },
             "source_code": [{ "node_type": "MyScript", "parameter": "body" }] }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.policy.settings, Resolution::PreferTheirs);
    assert_eq!(config.policy.project, Resolution::PreferOurs);
    assert_eq!(config.source_code.len(), 1);
}

#[test]
fn missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(Config::load(&dir.path().join("absent.json")).is_err());
}

// ── diff ──

#[test]
fn project_diff_lists_changed_component() {
    let dir = TempDir::new().unwrap();
    let from = write(&dir, "from.json", &snapshot("a"));
    let to = write(&dir, "to.json", &snapshot("b"));

    let out: Value = serde_json::from_str(&run_diff(&from, &to, None).unwrap()).unwrap();
    assert_eq!(out["components"]["changed"].as_array().map(Vec::len), Some(1));
    assert_eq!(out["components"]["created"], json!([]));
}

#[test]
fn component_diff_lists_changed_node() {
    let dir = TempDir::new().unwrap();
    let from = write(&dir, "from.json", &snapshot("a"));
    let to = write(&dir, "to.json", &snapshot("b"));

    let out: Value = serde_json::from_str(&run_diff(&from, &to, Some("/App")).unwrap()).unwrap();
    let changed = &out["nodes"]["changed"];
    assert_eq!(changed[0]["before"]["id"], json!("label"));
    assert_eq!(changed[0]["after"]["parameters"]["text"], json!("b"));
}

#[test]
fn unknown_component_is_an_error() {
    let dir = TempDir::new().unwrap();
    let from = write(&dir, "from.json", &snapshot("a"));

    let err = run_diff(&from, &from, Some("missing")).unwrap_err();
    assert!(err.to_string().contains("missing"));
}
