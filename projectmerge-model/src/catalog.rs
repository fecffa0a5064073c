use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How a parameter's value is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Compared and resolved as a whole value.
    Scalar,
    /// Free-form source text, merged line by line.
    SourceCode,
}

/// Type-description lookup used to route parameters to the right merger.
///
/// This is metadata only. Implementors that know nothing about a node type
/// can rely on the default, which treats every parameter as a scalar.
pub trait TypeCatalog: Send + Sync {
    fn parameter_kind(&self, node_type: &str, parameter: &str) -> ParameterKind {
        let _ = (node_type, parameter);
        ParameterKind::Scalar
    }
}

/// One `(node type, parameter)` pair edited in a code editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceCodeParameter {
    pub node_type: String,
    pub parameter: String,
}

/// A fixed table of source-code parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SourceCodeParameter>", into = "Vec<SourceCodeParameter>")]
pub struct StaticTypeCatalog {
    source_code: HashMap<String, HashSet<String>>,
}

impl StaticTypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The code-editor parameters of the standard node library.
    pub fn builtin() -> Self {
        Self::new()
            .with_source_code("JavaScriptFunction", "functionScript")
            .with_source_code("Javascript2", "code")
            .with_source_code("Expression", "expression")
    }

    #[must_use]
    pub fn with_source_code(mut self, node_type: &str, parameter: &str) -> Self {
        self.insert(node_type, parameter);
        self
    }

    pub fn insert(&mut self, node_type: &str, parameter: &str) {
        self.source_code
            .entry(node_type.to_string())
            .or_default()
            .insert(parameter.to_string());
    }

    /// Adds every entry of `other`.
    pub fn extend(&mut self, other: &Self) {
        for (node_type, parameters) in &other.source_code {
            self.source_code
                .entry(node_type.clone())
                .or_default()
                .extend(parameters.iter().cloned());
        }
    }

    pub fn len(&self) -> usize {
        self.source_code.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeCatalog for StaticTypeCatalog {
    fn parameter_kind(&self, node_type: &str, parameter: &str) -> ParameterKind {
        match self.source_code.get(node_type) {
            Some(parameters) if parameters.contains(parameter) => ParameterKind::SourceCode,
            _ => ParameterKind::Scalar,
        }
    }
}

impl From<Vec<SourceCodeParameter>> for StaticTypeCatalog {
    fn from(entries: Vec<SourceCodeParameter>) -> Self {
        let mut catalog = Self::new();
        for entry in &entries {
            catalog.insert(&entry.node_type, &entry.parameter);
        }
        catalog
    }
}

impl From<StaticTypeCatalog> for Vec<SourceCodeParameter> {
    fn from(catalog: StaticTypeCatalog) -> Self {
        let mut entries: Vec<SourceCodeParameter> = catalog
            .source_code
            .into_iter()
            .flat_map(|(node_type, parameters)| {
                parameters.into_iter().map(move |parameter| SourceCodeParameter {
                    node_type: node_type.clone(),
                    parameter,
                })
            })
            .collect();
        entries.sort_by(|a, b| (&a.node_type, &a.parameter).cmp(&(&b.node_type, &b.parameter)));
        entries
    }
}
