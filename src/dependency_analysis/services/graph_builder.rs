use crate::dependency_analysis::domain::{
    DependencyGraph, DependencyType, GraphEdge, GraphMetadata, GraphNode, GraphType,
    ScenarioDependency,
};
use crate::dependency_analysis::services::detector::CatalogLookup;
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// GraphBuilder service assembling the cross-scenario dependency graph
///
/// Pure function of the stored edges and the known-scenario catalog; safe to
/// recompute on every request.
pub struct GraphBuilder;

impl GraphBuilder {
    /// Builds a graph of the requested type from stored edges.
    ///
    /// Scenario-typed edges pointing at a scenario the catalog does not know
    /// are stale references and are dropped.
    pub fn generate_graph(
        edges: &[ScenarioDependency],
        graph_type: GraphType,
        catalog: &dyn CatalogLookup,
    ) -> DependencyGraph {
        let mut nodes: BTreeMap<String, GraphNode> = BTreeMap::new();
        let mut graph_edges = Vec::new();
        let mut stale = 0;

        for edge in edges.iter().filter(|e| graph_type.includes(e.dependency_type)) {
            if Self::is_stale(edge, catalog) {
                debug!(
                    scenario = %edge.scenario_name,
                    target = %edge.dependency_name,
                    "dropping stale scenario edge"
                );
                stale += 1;
                continue;
            }

            let source = GraphNode::new(DependencyType::Scenario, &edge.scenario_name);
            let target = GraphNode::new(edge.dependency_type, &edge.dependency_name);
            let (source_id, target_id) = (source.id.clone(), target.id.clone());

            bump(nodes.entry(source_id.clone()).or_insert(source), "dependencies");
            bump(nodes.entry(target_id.clone()).or_insert(target), "dependents");

            let mut metadata = serde_json::Map::new();
            if !edge.access_method.is_empty() {
                metadata.insert(
                    "access_method".to_string(),
                    Value::from(edge.access_method.as_str()),
                );
            }
            if !edge.purpose.is_empty() {
                metadata.insert("purpose".to_string(), Value::from(edge.purpose.as_str()));
            }

            graph_edges.push(GraphEdge {
                source: source_id,
                target: target_id,
                edge_type: edge.dependency_type,
                required: edge.required,
                weight: edge.weight(),
                metadata,
            });
        }

        graph_edges.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
        let nodes: Vec<GraphNode> = nodes.into_values().collect();

        DependencyGraph {
            id: Uuid::new_v4(),
            graph_type,
            metadata: GraphMetadata {
                total_nodes: nodes.len(),
                total_edges: graph_edges.len(),
                complexity_score: DependencyGraph::complexity(nodes.len(), graph_edges.len()),
                stale_edges_dropped: stale,
                generated_at: Utc::now(),
            },
            nodes,
            edges: graph_edges,
        }
    }

    /// A scenario edge whose target the catalog no longer knows
    pub fn is_stale(edge: &ScenarioDependency, catalog: &dyn CatalogLookup) -> bool {
        edge.dependency_type == DependencyType::Scenario
            && !catalog.known_scenario(&edge.dependency_name)
    }
}

fn bump(node: &mut GraphNode, counter: &str) {
    let count = node
        .metadata
        .get(counter)
        .and_then(Value::as_u64)
        .unwrap_or(0);
    node.metadata
        .insert(counter.to_string(), Value::from(count + 1));
}
