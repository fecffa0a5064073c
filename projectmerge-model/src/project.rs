use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{Component, ConflictLocation, Error, Map, Result};

/// A serialized visual-programming project.
///
/// Snapshots are immutable inputs to the merge and diff engines; both
/// produce new values and never modify the documents they are given.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Flat map of project-wide scalar settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub components: Vec<Component>,
    /// Top-level fields this model does not name (root node id, version, ...).
    #[serde(flatten)]
    pub extra: Map,
}

/// Project metadata: style dictionaries and cloud-service binding.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudservices: Option<Map>,
    #[serde(flatten)]
    pub extra: Map,
}

/// Named style dictionaries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Styles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Map>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Map>,
    #[serde(flatten)]
    pub extra: Map,
}

impl Project {
    /// Parses a project from its persisted JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a project from an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Looks up a component by id, falling back to its display name.
    pub fn component(&self, id_or_name: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.id.as_deref() == Some(id_or_name))
            .or_else(|| self.components.iter().find(|c| c.name == id_or_name))
    }

    /// Returns a settings entry.
    pub fn setting(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.as_ref().and_then(|s| s.get(key))
    }

    /// Colour style dictionary, if present.
    pub fn color_styles(&self) -> Option<&Map> {
        self.styles().and_then(|s| s.colors.as_ref())
    }

    /// Text style dictionary, if present.
    pub fn text_styles(&self) -> Option<&Map> {
        self.styles().and_then(|s| s.text.as_ref())
    }

    /// Cloud-service fields, if present.
    pub fn cloudservices(&self) -> Option<&Map> {
        self.metadata.as_ref().and_then(|m| m.cloudservices.as_ref())
    }

    fn styles(&self) -> Option<&Styles> {
        self.metadata.as_ref().and_then(|m| m.styles.as_ref())
    }

    /// Checks the invariants identity resolution relies on.
    ///
    /// Every node needs a non-empty id, unique within its component, and
    /// component keys must be unique within the project.
    pub fn validate(&self) -> Result<()> {
        let mut component_keys = HashSet::new();
        for component in &self.components {
            let key = component.id.as_deref().unwrap_or(&component.name);
            if !component_keys.insert(key) {
                return Err(Error::MalformedSnapshot(format!(
                    "duplicate component `{key}`"
                )));
            }

            let mut node_ids = HashSet::new();
            let mut failure = None;
            component.visit_nodes(&mut |node| {
                if failure.is_some() {
                    return;
                }
                if node.id.is_empty() {
                    failure = Some(format!("node without id in component `{}`", component.name));
                } else if !node_ids.insert(node.id.as_str()) {
                    failure = Some(format!(
                        "duplicate node id `{}` in component `{}`",
                        node.id, component.name
                    ));
                }
            });
            if let Some(reason) = failure {
                return Err(Error::MalformedSnapshot(reason));
            }
        }
        Ok(())
    }

    /// Walks every conflict record attached to a node, depth first.
    pub fn conflicts(&self) -> Vec<ConflictLocation> {
        let mut found = Vec::new();
        for component in &self.components {
            component.visit_nodes(&mut |node| {
                for conflict in &node.conflicts {
                    found.push(ConflictLocation {
                        component: component.name.clone(),
                        node_id: node.id.clone(),
                        conflict: conflict.clone(),
                    });
                }
            });
        }
        found
    }

    pub fn has_conflicts(&self) -> bool {
        self.components.iter().any(|c| {
            let mut any = false;
            c.visit_nodes(&mut |node| any |= !node.conflicts.is_empty());
            any
        })
    }
}
