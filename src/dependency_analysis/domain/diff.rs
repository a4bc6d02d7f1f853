use super::dependency::DetectionMethod;
use serde::{Deserialize, Serialize};

/// One side of a declared-vs-detected comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry<T> {
    pub name: String,
    pub details: T,
}

/// Detail payload attached to resource, scenario and workflow diff entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Files the dependency was detected in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<DetectionMethod>,
}

/// Result of reconciling declared against detected dependencies.
///
/// `missing` holds names that are used but not declared, `extra` holds names
/// that are declared but never seen in the source tree. Both are sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyDiff<T> {
    pub missing: Vec<DiffEntry<T>>,
    pub extra: Vec<DiffEntry<T>>,
}

impl<T> DependencyDiff<T> {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }

    pub fn missing_names(&self) -> Vec<&str> {
        self.missing.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn extra_names(&self) -> Vec<&str> {
        self.extra.iter().map(|e| e.name.as_str()).collect()
    }
}

impl<T> Default for DependencyDiff<T> {
    fn default() -> Self {
        Self {
            missing: Vec::new(),
            extra: Vec::new(),
        }
    }
}
