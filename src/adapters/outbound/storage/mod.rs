/// Dependency store adapters
mod in_memory_store;
mod json_file_store;

pub use in_memory_store::InMemoryDependencyStore;
pub use json_file_store::JsonFileDependencyStore;

use crate::dependency_analysis::domain::ScenarioDependency;
use std::collections::BTreeMap;

/// One row per `(type, name)` for `scenario`, later duplicates winning
fn normalize_rows(scenario: &str, dependencies: &[ScenarioDependency]) -> Vec<ScenarioDependency> {
    let mut rows = BTreeMap::new();
    for dependency in dependencies {
        let mut row = dependency.clone();
        row.scenario_name = scenario.to_string();
        rows.insert(row.key(), row);
    }
    rows.into_values().collect()
}

fn sort_rows(rows: &mut [ScenarioDependency]) {
    rows.sort_by(|a, b| {
        (&a.scenario_name, a.dependency_type, &a.dependency_name).cmp(&(
            &b.scenario_name,
            b.dependency_type,
            &b.dependency_name,
        ))
    });
}
