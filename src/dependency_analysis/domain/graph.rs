use super::dependency::DependencyType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which slice of the stored edges a graph covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GraphType {
    Resource,
    Scenario,
    SharedWorkflow,
    #[default]
    Combined,
}

impl GraphType {
    pub fn includes(&self, dependency_type: DependencyType) -> bool {
        match self {
            GraphType::Combined => true,
            GraphType::Resource => dependency_type == DependencyType::Resource,
            GraphType::Scenario => dependency_type == DependencyType::Scenario,
            GraphType::SharedWorkflow => dependency_type == DependencyType::SharedWorkflow,
        }
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphType::Resource => "resource",
            GraphType::Scenario => "scenario",
            GraphType::SharedWorkflow => "shared_workflow",
            GraphType::Combined => "combined",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for GraphType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "resource" | "resources" => Ok(GraphType::Resource),
            "scenario" | "scenarios" => Ok(GraphType::Scenario),
            "shared_workflow" | "shared_workflows" | "workflow" => Ok(GraphType::SharedWorkflow),
            "combined" | "all" => Ok(GraphType::Combined),
            _ => Err(format!(
                "Invalid graph type: {}. Expected 'resource', 'scenario', 'shared_workflow' or 'combined'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// `<type>:<name>`
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: DependencyType,
    pub group: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl GraphNode {
    pub fn node_id(node_type: DependencyType, name: &str) -> String {
        format!("{}:{}", node_type, name)
    }

    pub fn new(node_type: DependencyType, name: &str) -> Self {
        let group = match node_type {
            DependencyType::Scenario => "scenarios",
            DependencyType::Resource => "resources",
            DependencyType::SharedWorkflow => "shared_workflows",
        };
        Self {
            id: Self::node_id(node_type, name),
            label: name.to_string(),
            node_type,
            group: group.to_string(),
            metadata: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: DependencyType,
    pub required: bool,
    pub weight: f64,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub complexity_score: f64,
    /// Scenario edges dropped because their target is not a known scenario
    pub stale_edges_dropped: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub id: Uuid,
    pub graph_type: GraphType,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: GraphMetadata,
}

impl DependencyGraph {
    /// Edges per node, scaled into [0, 1]
    pub fn complexity(node_count: usize, edge_count: usize) -> f64 {
        if node_count == 0 {
            return 0.0;
        }
        (edge_count as f64 / node_count as f64 / 5.0).min(1.0)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
