use super::dependency::DependencyType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input edge for cycle detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleEdge {
    pub source: String,
    pub target: String,
    pub edge_type: DependencyType,
    pub required: bool,
}

impl CycleEdge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: DependencyType,
        required: bool,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
            required,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleType {
    Scenario,
    Resource,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleSeverity {
    None,
    Warning,
    /// At least one cycle made only of required edges: nothing on it can start first
    Critical,
}

impl fmt::Display for CycleSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleSeverity::None => "none",
            CycleSeverity::Warning => "warning",
            CycleSeverity::Critical => "critical",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyCycle {
    /// Closed path: the first node is repeated at the end
    pub path: Vec<String>,
    /// Number of distinct nodes on the cycle
    pub length: usize,
    pub cycle_type: CycleType,
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub has_cycles: bool,
    pub total_cycles: usize,
    pub severity: CycleSeverity,
    pub affected_nodes: Vec<String>,
    pub cycles: Vec<DependencyCycle>,
}
