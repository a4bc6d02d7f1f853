//! Configuration file support for scenario-deps.
//!
//! Provides YAML-based configuration through `scenario-deps.config.yml`
//! files, including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::dependency_analysis::policies::{ImpactThresholds, TierPolicy};
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "scenario-deps.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub scenarios_root: Option<PathBuf>,
    pub resources_root: Option<PathBuf>,
    pub shared_workflows_root: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub format: Option<String>,
    /// Tiers analyzed for scenarios that declare none
    pub tiers: Option<Vec<String>>,
    pub blocking_threshold: Option<f64>,
    pub impact_thresholds: Option<ImpactThresholds>,
    /// Resource names known in addition to the built-in list
    pub extra_resources: Option<Vec<String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Tier policy with configured overrides applied to the defaults
    pub fn tier_policy(&self) -> TierPolicy {
        let mut policy = TierPolicy::default();
        if let Some(threshold) = self.blocking_threshold {
            policy.blocking_threshold = threshold;
        }
        if let Some(tiers) = &self.tiers {
            policy.default_tiers = tiers.clone();
        }
        policy
    }

    pub fn impact_thresholds(&self) -> ImpactThresholds {
        self.impact_thresholds.clone().unwrap_or_default()
    }

    /// Resolves relative paths against the directory holding the config file
    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.scenarios_root,
            &mut self.resources_root,
            &mut self.shared_workflows_root,
            &mut self.store_path,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let mut config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(threshold) = config.blocking_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            bail!(
                "Invalid config: blocking_threshold must be between 0.0 and 1.0, got {}.\n\n\
                 💡 Hint: Fitness scores range from 0.0 (unusable) to 1.0 (fully supported).",
                threshold
            );
        }
    }

    if let Some(tiers) = &config.tiers {
        if tiers.is_empty() {
            bail!(
                "Invalid config: tiers must not be empty.\n\n\
                 💡 Hint: Remove the 'tiers' field to analyze the default tiers."
            );
        }
        if let Some(i) = tiers.iter().position(|t| t.trim().is_empty()) {
            bail!(
                "Invalid config: tiers[{}] must not be empty.\n\n\
                 💡 Hint: Use tier names such as \"desktop\" or \"server\".",
                i
            );
        }
    }

    if let Some(resources) = &config.extra_resources {
        if let Some(i) = resources.iter().position(|r| r.trim().is_empty()) {
            bail!(
                "Invalid config: extra_resources[{}] must not be empty.\n\n\
                 💡 Hint: List resource names such as \"questdb\".",
                i
            );
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        warn!(field = %key, "unknown config field will be ignored");
    }
}
