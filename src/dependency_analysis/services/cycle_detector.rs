use crate::dependency_analysis::domain::{
    CycleEdge, CycleReport, CycleSeverity, CycleType, DependencyCycle, DependencyType,
    ScenarioDependency,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

const PATH_SEPARATOR: &str = " → ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Merged view of all parallel edges between one ordered pair of nodes
#[derive(Debug, Default)]
struct EdgeInfo {
    types: BTreeSet<DependencyType>,
    required: bool,
}

type Adjacency = BTreeMap<String, BTreeMap<String, EdgeInfo>>;

/// CycleDetector service enumerating circular dependencies
///
/// White/gray/black depth-first search. Nodes and neighbors are visited in
/// sorted order, so the reported cycles do not depend on edge order.
pub struct CycleDetector;

impl CycleDetector {
    /// Cycle edges from stored dependency rows: `scenario → dependency`
    pub fn edges_from(dependencies: &[ScenarioDependency]) -> Vec<CycleEdge> {
        dependencies
            .iter()
            .map(|d| {
                CycleEdge::new(
                    &d.scenario_name,
                    &d.dependency_name,
                    d.dependency_type,
                    d.required,
                )
            })
            .collect()
    }

    pub fn detect(edges: &[CycleEdge]) -> CycleReport {
        let adjacency = Self::build_adjacency(edges);

        let mut colors: HashMap<&str, Color> = adjacency
            .keys()
            .map(|node| (node.as_str(), Color::White))
            .collect();
        let mut path: Vec<&str> = Vec::new();
        let mut signatures = HashSet::new();
        let mut cycles = Vec::new();

        for node in adjacency.keys() {
            if colors.get(node.as_str()) == Some(&Color::White) {
                Self::visit(
                    node,
                    &adjacency,
                    &mut colors,
                    &mut path,
                    &mut signatures,
                    &mut cycles,
                );
            }
        }

        cycles.sort_by(|a: &DependencyCycle, b| a.path.cmp(&b.path));
        Self::report(cycles)
    }

    fn build_adjacency(edges: &[CycleEdge]) -> Adjacency {
        let mut adjacency: Adjacency = BTreeMap::new();
        for edge in edges {
            let info = adjacency
                .entry(edge.source.clone())
                .or_default()
                .entry(edge.target.clone())
                .or_default();
            info.types.insert(edge.edge_type);
            info.required |= edge.required;
            adjacency.entry(edge.target.clone()).or_default();
        }
        adjacency
    }

    fn visit<'a>(
        node: &'a str,
        adjacency: &'a Adjacency,
        colors: &mut HashMap<&'a str, Color>,
        path: &mut Vec<&'a str>,
        signatures: &mut HashSet<String>,
        cycles: &mut Vec<DependencyCycle>,
    ) {
        colors.insert(node, Color::Gray);
        path.push(node);

        if let Some(neighbors) = adjacency.get(node) {
            for neighbor in neighbors.keys() {
                match colors.get(neighbor.as_str()).copied().unwrap_or(Color::White) {
                    Color::Gray => {
                        if let Some(start) = path.iter().position(|n| *n == neighbor.as_str()) {
                            let members = &path[start..];
                            let rotated = canonical_rotation(members);
                            if signatures.insert(rotated.join(PATH_SEPARATOR)) {
                                cycles.push(Self::describe(rotated, adjacency));
                            }
                        }
                    }
                    Color::White => {
                        Self::visit(neighbor, adjacency, colors, path, signatures, cycles);
                    }
                    Color::Black => {}
                }
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
    }

    /// Builds the cycle record for rotated members `[a, b, c]` (closing edge `c → a` implied)
    fn describe(members: Vec<String>, adjacency: &Adjacency) -> DependencyCycle {
        let mut types = BTreeSet::new();
        let mut required = true;

        for (i, source) in members.iter().enumerate() {
            let target = &members[(i + 1) % members.len()];
            match adjacency.get(source).and_then(|n| n.get(target)) {
                Some(info) => {
                    types.extend(info.types.iter().copied());
                    required &= info.required;
                }
                None => required = false,
            }
        }

        let cycle_type = if types.len() == 1 && types.contains(&DependencyType::Scenario) {
            CycleType::Scenario
        } else if types.len() == 1 && types.contains(&DependencyType::Resource) {
            CycleType::Resource
        } else {
            CycleType::Mixed
        };

        let length = members.len();
        let mut path = members;
        if let Some(first) = path.first().cloned() {
            path.push(first);
        }
        let description = path.join(PATH_SEPARATOR);

        DependencyCycle {
            path,
            length,
            cycle_type,
            required,
            description,
        }
    }

    fn report(cycles: Vec<DependencyCycle>) -> CycleReport {
        let severity = if cycles.is_empty() {
            CycleSeverity::None
        } else if cycles.iter().any(|c| c.required) {
            CycleSeverity::Critical
        } else {
            CycleSeverity::Warning
        };

        let affected_nodes: BTreeSet<String> = cycles
            .iter()
            .flat_map(|c| c.path.iter().cloned())
            .collect();

        CycleReport {
            has_cycles: !cycles.is_empty(),
            total_cycles: cycles.len(),
            severity,
            affected_nodes: affected_nodes.into_iter().collect(),
            cycles,
        }
    }
}

/// Rotates cycle members to start at the lexicographically smallest one
fn canonical_rotation(members: &[&str]) -> Vec<String> {
    let start = members
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0);
    members[start..]
        .iter()
        .chain(members[..start].iter())
        .map(|m| m.to_string())
        .collect()
}
