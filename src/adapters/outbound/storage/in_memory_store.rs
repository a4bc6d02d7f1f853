use super::{normalize_rows, sort_rows};
use crate::dependency_analysis::domain::ScenarioDependency;
use crate::ports::outbound::DependencyStore;
use crate::shared::Result;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// InMemoryDependencyStore adapter holding edges for the life of the process
///
/// Each scenario's edge set is swapped under a single write lock, so
/// readers never see a half-replaced set.
#[derive(Default)]
pub struct InMemoryDependencyStore {
    rows: RwLock<BTreeMap<String, Vec<ScenarioDependency>>>,
}

impl InMemoryDependencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, e.g. from a fixture
    pub fn with_dependencies(dependencies: Vec<ScenarioDependency>) -> Self {
        let mut rows: BTreeMap<String, Vec<ScenarioDependency>> = BTreeMap::new();
        for dependency in dependencies {
            rows.entry(dependency.scenario_name.clone())
                .or_default()
                .push(dependency);
        }
        let rows = rows
            .into_iter()
            .map(|(scenario, deps)| {
                let normalized = normalize_rows(&scenario, &deps);
                (scenario, normalized)
            })
            .collect();
        Self {
            rows: RwLock::new(rows),
        }
    }
}

impl DependencyStore for InMemoryDependencyStore {
    fn replace_scenario_dependencies(
        &self,
        scenario: &str,
        dependencies: &[ScenarioDependency],
    ) -> Result<()> {
        let rows = normalize_rows(scenario, dependencies);
        let mut guard = self.rows.write().unwrap_or_else(|e| e.into_inner());
        if rows.is_empty() {
            guard.remove(scenario);
        } else {
            guard.insert(scenario.to_string(), rows);
        }
        Ok(())
    }

    fn scenario_dependencies(&self, scenario: &str) -> Result<Vec<ScenarioDependency>> {
        let guard = self.rows.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.get(scenario).cloned().unwrap_or_default())
    }

    fn all_dependencies(&self) -> Result<Vec<ScenarioDependency>> {
        let guard = self.rows.read().unwrap_or_else(|e| e.into_inner());
        let mut rows: Vec<ScenarioDependency> = guard.values().flatten().cloned().collect();
        sort_rows(&mut rows);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_analysis::domain::DependencyType;

    fn edge(scenario: &str, dependency_type: DependencyType, name: &str) -> ScenarioDependency {
        ScenarioDependency::new(scenario, dependency_type, name, true)
    }

    #[test]
    fn test_replace_swaps_whole_edge_set() {
        let store = InMemoryDependencyStore::new();
        store
            .replace_scenario_dependencies(
                "notes",
                &[
                    edge("notes", DependencyType::Resource, "postgres"),
                    edge("notes", DependencyType::Resource, "redis"),
                ],
            )
            .unwrap();
        store
            .replace_scenario_dependencies("notes", &[edge("notes", DependencyType::Resource, "qdrant")])
            .unwrap();

        let names: Vec<_> = store
            .scenario_dependencies("notes")
            .unwrap()
            .into_iter()
            .map(|d| d.dependency_name)
            .collect();
        assert_eq!(names, vec!["qdrant"]);
    }

    #[test]
    fn test_duplicate_keys_collapse_to_one_row() {
        let store = InMemoryDependencyStore::new();
        store
            .replace_scenario_dependencies(
                "notes",
                &[
                    edge("notes", DependencyType::Resource, "redis"),
                    edge("notes", DependencyType::Resource, "redis").with_purpose("cache"),
                ],
            )
            .unwrap();

        let rows = store.scenario_dependencies("notes").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].purpose, "cache");
    }

    #[test]
    fn test_dependents_of_filters_by_type() {
        let store = InMemoryDependencyStore::with_dependencies(vec![
            edge("planner", DependencyType::Scenario, "notes"),
            edge("portal", DependencyType::Resource, "notes"),
            edge("portal", DependencyType::Resource, "redis"),
        ]);

        let all = store.dependents_of("notes", None).unwrap();
        let scenarios = store
            .dependents_of("notes", Some(DependencyType::Scenario))
            .unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].scenario_name, "planner");
    }

    #[test]
    fn test_all_dependencies_sorted() {
        let store = InMemoryDependencyStore::with_dependencies(vec![
            edge("zeta", DependencyType::Resource, "redis"),
            edge("alpha", DependencyType::Scenario, "zeta"),
            edge("alpha", DependencyType::Resource, "postgres"),
        ]);

        let keys: Vec<_> = store
            .all_dependencies()
            .unwrap()
            .into_iter()
            .map(|d| format!("{}/{}", d.scenario_name, d.dependency_name))
            .collect();
        assert_eq!(keys, vec!["alpha/postgres", "alpha/zeta", "zeta/redis"]);
    }
}
