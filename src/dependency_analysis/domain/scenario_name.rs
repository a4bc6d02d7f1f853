use crate::shared::error::AnalyzerError;
use crate::shared::Result;

/// Maximum length for scenario names (security limit)
const MAX_SCENARIO_NAME_LENGTH: usize = 128;

/// NewType wrapper for a scenario name.
///
/// Scenario names become directory names, so anything that could escape the
/// scenarios root (separators, `..`, leading dots) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScenarioName(String);

impl ScenarioName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(AnalyzerError::Validation {
                message: "Scenario name cannot be empty".to_string(),
            }
            .into());
        }

        if name.len() > MAX_SCENARIO_NAME_LENGTH {
            return Err(AnalyzerError::Validation {
                message: format!(
                    "Scenario name is too long ({} bytes). Maximum allowed: {} bytes",
                    name.len(),
                    MAX_SCENARIO_NAME_LENGTH
                ),
            }
            .into());
        }

        if name.starts_with('.')
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(AnalyzerError::Validation {
                message: format!(
                    "Scenario name '{}' contains invalid characters. Only ASCII letters, digits, hyphens, underscores and inner dots are allowed.",
                    name
                ),
            }
            .into());
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ScenarioName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
