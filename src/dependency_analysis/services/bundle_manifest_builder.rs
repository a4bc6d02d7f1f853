use crate::dependency_analysis::domain::{
    BundleDependency, BundleFile, BundleManifest, BundleSkeleton, BundleSwap, DependencyKey,
    DependencyType, DeploymentDependencyNode, HealthCheck, SkeletonService, TierSupport,
    TierSupportSummary,
};
use crate::dependency_analysis::policies::TierPolicy;
use crate::shared::error::AnalyzerError;
use crate::shared::Result;
use anyhow::Context;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Published schema every bundle skeleton must satisfy
pub const BUNDLE_SCHEMA: &str = include_str!("bundle.schema.json");

pub const BUNDLE_SCHEMA_VERSION: &str = "1.0";

/// Packaging artifacts looked for in a scenario, `{scenario}` expanded
const CANDIDATE_FILES: &[(&str, &str)] = &[
    (".vrooli/service.json", "manifest"),
    ("api/main.go", "api_source"),
    ("api/{scenario}-api", "api_binary"),
    ("ui/dist/index.html", "ui_bundle"),
    ("ui/index.html", "ui_entry"),
    ("cli/{scenario}", "cli_binary"),
];

/// BundleManifestBuilder service producing packaging descriptions
pub struct BundleManifestBuilder;

impl BundleManifestBuilder {
    pub fn build_manifest(
        scenario_root: &Path,
        scenario: &str,
        nodes: &[DeploymentDependencyNode],
    ) -> BundleManifest {
        let dependencies = Self::flatten(nodes);
        let swaps = Self::swaps(&dependencies);
        BundleManifest {
            files: Self::candidate_files(scenario_root, scenario),
            dependencies,
            swaps,
        }
    }

    pub fn candidate_files(scenario_root: &Path, scenario: &str) -> Vec<BundleFile> {
        CANDIDATE_FILES
            .iter()
            .map(|(template, kind)| {
                let path = template.replace("{scenario}", scenario);
                let exists = scenario_root.join(&path).is_file();
                BundleFile {
                    path,
                    kind: kind.to_string(),
                    exists,
                }
            })
            .collect()
    }

    /// Depth-first flattening, one entry per `(type, name)`. Alternatives
    /// from every occurrence are merged without duplicates; cycle leaves are
    /// skipped.
    pub fn flatten(nodes: &[DeploymentDependencyNode]) -> Vec<BundleDependency> {
        fn walk(
            nodes: &[DeploymentDependencyNode],
            index: &mut HashMap<DependencyKey, usize>,
            out: &mut Vec<BundleDependency>,
        ) {
            for node in nodes {
                if node.cycle_detected {
                    continue;
                }
                let key = DependencyKey::new(node.dependency_type, &node.name);
                let position = *index.entry(key).or_insert_with(|| {
                    out.push(BundleDependency {
                        name: node.name.clone(),
                        dependency_type: node.dependency_type,
                        resource_type: node.resource_type.clone(),
                        tier_support: Default::default(),
                        alternatives: Vec::new(),
                    });
                    out.len() - 1
                });

                let entry = &mut out[position];
                for (tier, support) in &node.tier_support {
                    entry
                        .tier_support
                        .entry(tier.clone())
                        .or_insert_with(|| summary(support));
                }
                let candidates = node
                    .tier_support
                    .values()
                    .flat_map(|s| s.alternatives.iter())
                    .chain(node.swappable_with.iter());
                for alternative in candidates {
                    if !entry.alternatives.contains(alternative) {
                        entry.alternatives.push(alternative.clone());
                    }
                }

                walk(&node.children, index, out);
            }
        }

        let mut index = HashMap::new();
        let mut out = Vec::new();
        walk(nodes, &mut index, &mut out);
        out
    }

    /// One swap per dependency that has alternatives, using the first one
    pub fn swaps(dependencies: &[BundleDependency]) -> Vec<BundleSwap> {
        dependencies
            .iter()
            .filter_map(|dependency| {
                dependency.alternatives.first().map(|alternative| BundleSwap {
                    from: dependency.name.clone(),
                    to: alternative.clone(),
                    reason: format!("{} is the first declared alternative", alternative),
                })
            })
            .collect()
    }

    /// Builds and validates the deployable skeleton for one tier.
    ///
    /// # Errors
    /// Returns `AnalyzerError::ManifestValidation` if the skeleton does not
    /// satisfy [`BUNDLE_SCHEMA`].
    pub fn skeleton(
        scenario: &str,
        tier: &str,
        manifest: &BundleManifest,
        policy: &TierPolicy,
    ) -> Result<BundleSkeleton> {
        let base_id = scenario.to_lowercase();
        let mut services = Vec::new();
        let mut swaps = Vec::new();
        let mut resource_ids = Vec::new();

        for dependency in manifest
            .dependencies
            .iter()
            .filter(|d| d.dependency_type == DependencyType::Resource)
        {
            let blocked = dependency
                .tier_support
                .get(tier)
                .is_some_and(|s| policy.is_blocking(&TierSupport::new(s.supported, s.fitness_score)));
            let shipped = match dependency.alternatives.first() {
                Some(alternative) if blocked => {
                    swaps.push(BundleSwap {
                        from: dependency.name.clone(),
                        to: alternative.clone(),
                        reason: format!("{} blocks the {} tier", dependency.name, tier),
                    });
                    alternative.clone()
                }
                _ => dependency.name.clone(),
            };

            let id = shipped.to_lowercase();
            if resource_ids.contains(&id) {
                continue;
            }
            resource_ids.push(id.clone());
            services.push(SkeletonService {
                id,
                kind: "resource".to_string(),
                entry: None,
                health: HealthCheck {
                    check_type: "command".to_string(),
                    path: None,
                    port_env: None,
                    command: Some(format!("resource-{} status", shipped)),
                    interval_secs: 60,
                },
                depends_on: Vec::new(),
            });
        }

        let existing = |kinds: &[&str]| {
            kinds.iter().find_map(|kind| {
                manifest
                    .files
                    .iter()
                    .find(|f| f.exists && f.kind == *kind)
                    .map(|f| f.path.clone())
            })
        };

        let api_id = format!("{}-api", base_id);
        let api_entry = existing(&["api_binary", "api_source"]);
        let has_api = api_entry.is_some();
        if let Some(entry) = api_entry {
            services.push(SkeletonService {
                id: api_id.clone(),
                kind: "api".to_string(),
                entry: Some(entry),
                health: HealthCheck {
                    check_type: "http".to_string(),
                    path: Some("/health".to_string()),
                    port_env: Some("API_PORT".to_string()),
                    command: None,
                    interval_secs: 30,
                },
                depends_on: resource_ids.clone(),
            });
        }

        let api_dependency = if has_api { vec![api_id] } else { Vec::new() };

        if let Some(entry) = existing(&["ui_bundle", "ui_entry"]) {
            services.push(SkeletonService {
                id: format!("{}-ui", base_id),
                kind: "ui".to_string(),
                entry: Some(entry),
                health: HealthCheck {
                    check_type: "http".to_string(),
                    path: Some("/".to_string()),
                    port_env: Some("UI_PORT".to_string()),
                    command: None,
                    interval_secs: 30,
                },
                depends_on: api_dependency.clone(),
            });
        }

        if let Some(entry) = existing(&["cli_binary"]) {
            services.push(SkeletonService {
                id: format!("{}-cli", base_id),
                kind: "cli".to_string(),
                entry: Some(entry),
                health: HealthCheck {
                    check_type: "command".to_string(),
                    path: None,
                    port_env: None,
                    command: Some(format!("{} version", scenario)),
                    interval_secs: 300,
                },
                depends_on: api_dependency,
            });
        }

        let skeleton = BundleSkeleton {
            schema_version: BUNDLE_SCHEMA_VERSION.to_string(),
            scenario: scenario.to_string(),
            target_tier: tier.to_string(),
            services,
            swaps,
        };
        Self::validate(&skeleton)?;
        Ok(skeleton)
    }

    /// Checks a skeleton against the published bundle schema
    pub fn validate(skeleton: &BundleSkeleton) -> Result<()> {
        let schema_value: Value =
            serde_json::from_str(BUNDLE_SCHEMA).context("Failed to parse bundle schema")?;
        let schema = JSONSchema::compile(&schema_value)
            .map_err(|e| anyhow::anyhow!("Failed to compile bundle schema: {}", e))?;

        let instance = serde_json::to_value(skeleton).context("Failed to serialize bundle skeleton")?;
        let result = schema.validate(&instance);
        if let Err(errors) = result {
            let details: Vec<String> = errors
                .map(|e| format!("{} (at '{}')", e, e.instance_path))
                .collect();
            return Err(AnalyzerError::ManifestValidation {
                scenario: skeleton.scenario.clone(),
                details: details.join("; "),
            }
            .into());
        }
        Ok(())
    }
}

fn summary(support: &TierSupport) -> TierSupportSummary {
    TierSupportSummary {
        supported: support.supported,
        fitness_score: support.fitness_score,
    }
}
