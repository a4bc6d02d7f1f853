use crate::dependency_analysis::domain::{DependencyType, ScenarioDependency};
use crate::shared::Result;

/// DependencyStore port for durable dependency edges
///
/// Rows are keyed by `(scenario_name, dependency_type, dependency_name)`.
/// Implementations must make [`DependencyStore::replace_scenario_dependencies`]
/// atomic: a reader sees either the old edge set or the new one, never a mix.
pub trait DependencyStore {
    /// Replaces every stored edge of `scenario` with `dependencies`
    ///
    /// # Errors
    /// Returns `AnalyzerError::StoreError` if the store cannot be written
    fn replace_scenario_dependencies(
        &self,
        scenario: &str,
        dependencies: &[ScenarioDependency],
    ) -> Result<()>;

    /// Stored edges of one scenario
    fn scenario_dependencies(&self, scenario: &str) -> Result<Vec<ScenarioDependency>>;

    /// Every stored edge, ordered by scenario then dependency
    fn all_dependencies(&self) -> Result<Vec<ScenarioDependency>>;

    /// Edges pointing at `dependency_name`, optionally restricted to one type
    fn dependents_of(
        &self,
        dependency_name: &str,
        dependency_type: Option<DependencyType>,
    ) -> Result<Vec<ScenarioDependency>> {
        Ok(self
            .all_dependencies()?
            .into_iter()
            .filter(|d| d.dependency_name == dependency_name)
            .filter(|d| dependency_type.map_or(true, |t| d.dependency_type == t))
            .collect())
    }
}

impl<T: DependencyStore + ?Sized> DependencyStore for std::sync::Arc<T> {
    fn replace_scenario_dependencies(
        &self,
        scenario: &str,
        dependencies: &[ScenarioDependency],
    ) -> Result<()> {
        (**self).replace_scenario_dependencies(scenario, dependencies)
    }

    fn scenario_dependencies(&self, scenario: &str) -> Result<Vec<ScenarioDependency>> {
        (**self).scenario_dependencies(scenario)
    }

    fn all_dependencies(&self) -> Result<Vec<ScenarioDependency>> {
        (**self).all_dependencies()
    }
}
