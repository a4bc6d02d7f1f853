use super::{normalize_rows, sort_rows};
use crate::adapters::outbound::filesystem::write_atomic;
use crate::dependency_analysis::domain::ScenarioDependency;
use crate::ports::outbound::DependencyStore;
use crate::shared::error::AnalyzerError;
use crate::shared::security::read_document;
use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

const STORE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    dependencies: Vec<ScenarioDependency>,
}

/// JsonFileDependencyStore adapter keeping every edge in one JSON document
///
/// Writes rewrite the whole document through a temp file and rename while
/// holding a mutex, so a replacement is all-or-nothing for readers in this
/// process and in others. A missing file is an empty store.
pub struct JsonFileDependencyStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileDependencyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn store_error(operation: &str, details: impl ToString) -> anyhow::Error {
        AnalyzerError::StoreError {
            operation: operation.to_string(),
            details: details.to_string(),
        }
        .into()
    }

    fn read_rows(&self, operation: &str) -> Result<Vec<ScenarioDependency>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "dependency store not created yet");
            return Ok(Vec::new());
        }

        let content = read_document(&self.path, "dependency store")
            .map_err(|e| Self::store_error(operation, e))?;
        let document: StoreDocument = serde_json::from_str(&content)
            .map_err(|e| Self::store_error(operation, format!("{}: {}", self.path.display(), e)))?;
        if document.version != STORE_FORMAT_VERSION {
            return Err(Self::store_error(
                operation,
                format!(
                    "unsupported store version {} (expected {})",
                    document.version, STORE_FORMAT_VERSION
                ),
            ));
        }
        Ok(document.dependencies)
    }
}

impl DependencyStore for JsonFileDependencyStore {
    fn replace_scenario_dependencies(
        &self,
        scenario: &str,
        dependencies: &[ScenarioDependency],
    ) -> Result<()> {
        const OPERATION: &str = "replace_scenario_dependencies";
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut rows = self.read_rows(OPERATION)?;
        rows.retain(|row| row.scenario_name != scenario);
        rows.extend(normalize_rows(scenario, dependencies));
        sort_rows(&mut rows);

        let document = StoreDocument {
            version: STORE_FORMAT_VERSION,
            dependencies: rows,
        };
        let mut content =
            serde_json::to_string_pretty(&document).map_err(|e| Self::store_error(OPERATION, e))?;
        content.push('\n');
        write_atomic(&self.path, &content).map_err(|e| Self::store_error(OPERATION, e))?;

        debug!(scenario, edges = dependencies.len(), "dependency edges replaced");
        Ok(())
    }

    fn scenario_dependencies(&self, scenario: &str) -> Result<Vec<ScenarioDependency>> {
        Ok(self
            .read_rows("scenario_dependencies")?
            .into_iter()
            .filter(|row| row.scenario_name == scenario)
            .collect())
    }

    fn all_dependencies(&self) -> Result<Vec<ScenarioDependency>> {
        let mut rows = self.read_rows("all_dependencies")?;
        sort_rows(&mut rows);
        Ok(rows)
    }
}
