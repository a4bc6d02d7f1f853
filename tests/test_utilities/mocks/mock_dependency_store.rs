use scenario_deps::prelude::*;
use std::sync::Mutex;

/// Mock DependencyStore with an optional write failure
#[derive(Default)]
pub struct MockDependencyStore {
    dependencies: Mutex<Vec<ScenarioDependency>>,
    fail_writes: bool,
}

impl MockDependencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dependencies(dependencies: Vec<ScenarioDependency>) -> Self {
        Self {
            dependencies: Mutex::new(dependencies),
            fail_writes: false,
        }
    }

    /// Store whose writes always fail, as a locked or read-only file would
    pub fn failing() -> Self {
        Self {
            dependencies: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }
}

impl DependencyStore for MockDependencyStore {
    fn replace_scenario_dependencies(
        &self,
        scenario: &str,
        dependencies: &[ScenarioDependency],
    ) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("Mock store error\nstore is read-only");
        }
        let mut stored = self.dependencies.lock().unwrap();
        stored.retain(|d| d.scenario_name != scenario);
        stored.extend_from_slice(dependencies);
        Ok(())
    }

    fn scenario_dependencies(&self, scenario: &str) -> Result<Vec<ScenarioDependency>> {
        Ok(self
            .dependencies
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.scenario_name == scenario)
            .cloned()
            .collect())
    }

    fn all_dependencies(&self) -> Result<Vec<ScenarioDependency>> {
        Ok(self.dependencies.lock().unwrap().clone())
    }
}
