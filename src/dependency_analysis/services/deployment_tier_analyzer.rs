use crate::dependency_analysis::domain::{
    DependencyDeploymentMetadata, DependencyKey, DependencyType, DeploymentAnalysisReport,
    DeploymentDependencyNode, DeploymentTierAggregate, ResourceRequirements, SecretRequirement,
    ServiceManifest, SwapSuggestion, TierSupport,
};
use crate::dependency_analysis::policies::{ResourceKnowledge, TierPolicy};
use crate::dependency_analysis::services::BundleManifestBuilder;
use crate::ports::outbound::ScenarioRepository;
use crate::shared::Result;
use chrono::Utc;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

/// DeploymentTierAnalyzer service for per-tier fitness of a dependency tree
///
/// Builds the tree of a scenario's declared dependencies, recursing into
/// scenario dependencies, then rolls the tree up per deployment tier.
pub struct DeploymentTierAnalyzer<'a> {
    repository: &'a dyn ScenarioRepository,
    policy: &'a TierPolicy,
}

impl<'a> DeploymentTierAnalyzer<'a> {
    pub fn new(repository: &'a dyn ScenarioRepository, policy: &'a TierPolicy) -> Self {
        Self { repository, policy }
    }

    /// Builds the full deployment report for `scenario`
    ///
    /// # Errors
    /// Returns an error if the scenario itself cannot be loaded. Missing
    /// manifests further down the tree only produce leaves.
    pub fn analyze(&self, scenario: &str) -> Result<DeploymentAnalysisReport> {
        let manifest = self.repository.load_manifest(scenario)?;
        let scenario_root = self.repository.scenario_path(scenario)?;

        let tiers = self.policy.tiers_for(&manifest.tier_names());
        let mut sources = TreeSources::default();
        let dependencies = self.build_tree_tracking(scenario, &manifest, &tiers, &mut sources);
        let aggregates = self.aggregate(&dependencies, &tiers);
        let secrets = Self::secrets(&dependencies);
        let swaps = self.swaps(&dependencies, &tiers);
        let bundle_manifest =
            BundleManifestBuilder::build_manifest(&scenario_root, scenario, &dependencies);

        debug!(
            scenario,
            tiers = tiers.len(),
            dependencies = dependencies.len(),
            "built deployment report"
        );

        Ok(DeploymentAnalysisReport {
            scenario: scenario.to_string(),
            generated_at: Utc::now(),
            tiers,
            dependencies,
            aggregates,
            secrets,
            swaps,
            bundle_manifest,
            blocking_threshold: self.policy.blocking_threshold,
            source_scenarios: std::iter::once(scenario.to_string())
                .chain(sources.loaded)
                .collect(),
            missing_scenarios: sources.missing.into_iter().collect(),
        })
    }

    /// Dependency tree of `scenario`, whose manifest is already loaded
    pub fn build_tree(
        &self,
        scenario: &str,
        manifest: &ServiceManifest,
        tiers: &[String],
    ) -> Vec<DeploymentDependencyNode> {
        self.build_tree_tracking(scenario, manifest, tiers, &mut TreeSources::default())
    }

    fn build_tree_tracking(
        &self,
        scenario: &str,
        manifest: &ServiceManifest,
        tiers: &[String],
        sources: &mut TreeSources,
    ) -> Vec<DeploymentDependencyNode> {
        let mut visiting = HashSet::new();
        visiting.insert(scenario.to_string());
        self.build_children(manifest, tiers, &mut visiting, sources)
    }

    fn build_children(
        &self,
        manifest: &ServiceManifest,
        tiers: &[String],
        visiting: &mut HashSet<String>,
        sources: &mut TreeSources,
    ) -> Vec<DeploymentDependencyNode> {
        let mut children = Vec::new();

        for (name, declaration) in manifest.enabled_resources() {
            let canonical = ResourceKnowledge::canonical_name(name);
            let metadata = manifest
                .resource_metadata(name)
                .or_else(|| manifest.resource_metadata(&canonical));

            let mut node = DeploymentDependencyNode::new(&canonical, DependencyType::Resource);
            node.resource_type = metadata
                .and_then(|m| m.resource_type.clone())
                .or_else(|| declaration.resource_type.clone());
            node.requirements = ResourceKnowledge::default_footprint(&canonical);
            Self::apply_metadata(&mut node, metadata, tiers);
            children.push(node);
        }

        for name in manifest.scenarios.keys() {
            let metadata = manifest.scenario_metadata(name);
            let mut node = DeploymentDependencyNode::new(name, DependencyType::Scenario);
            Self::apply_metadata(&mut node, metadata, tiers);

            if visiting.contains(name) {
                debug!(scenario = %name, "cycle detected while building deployment tree");
                node.cycle_detected = true;
                if node.tier_support.is_empty() {
                    node.tier_support = Self::support_from_tiers(manifest, tiers);
                }
                children.push(node);
                continue;
            }

            match self.repository.load_manifest(name) {
                Ok(child) => {
                    sources.loaded.insert(name.clone());
                    if node.tier_support.is_empty() {
                        node.tier_support = Self::support_from_tiers(&child, tiers);
                    }
                    visiting.insert(name.clone());
                    node.children = self.build_children(&child, tiers, visiting, sources);
                    visiting.remove(name);
                }
                Err(e) => {
                    warn!(scenario = %name, error = %e, "dependency manifest unavailable; treating as leaf");
                    sources.missing.insert(name.clone());
                }
            }
            children.push(node);
        }

        children
    }

    fn apply_metadata(
        node: &mut DeploymentDependencyNode,
        metadata: Option<&DependencyDeploymentMetadata>,
        tiers: &[String],
    ) {
        let Some(metadata) = metadata else {
            return;
        };
        node.requirement_override = metadata.footprint.filter(|f| !f.is_zero());
        node.swappable_with = metadata.swappable_with.clone();

        for (tier, platform) in &metadata.platform_support {
            if !tiers.contains(tier) {
                continue;
            }
            let supported = platform.supported.unwrap_or(true);
            let default_score = if supported { 1.0 } else { 0.0 };
            let mut support =
                TierSupport::new(supported, platform.fitness_score.unwrap_or(default_score));
            support.reason = platform.reason.clone();
            support.alternatives = platform.alternatives.clone();
            node.tier_support.insert(tier.clone(), support);
        }
    }

    /// Tier support taken from a manifest's own `deployment.tiers` declarations
    fn support_from_tiers(manifest: &ServiceManifest, tiers: &[String]) -> IndexMap<String, TierSupport> {
        manifest
            .deployment
            .tiers
            .iter()
            .filter(|(tier, _)| tiers.contains(tier))
            .map(|(tier, declaration)| {
                let supported = declaration.is_supported();
                let default_score = if supported { 1.0 } else { 0.0 };
                let mut support = TierSupport::new(
                    supported,
                    declaration.fitness_score.unwrap_or(default_score),
                );
                support.reason = declaration.status.clone();
                (tier.clone(), support)
            })
            .collect()
    }

    /// Per-tier rollup. Each `(type, name)` counts once no matter how many
    /// paths reach it.
    pub fn aggregate(
        &self,
        nodes: &[DeploymentDependencyNode],
        tiers: &[String],
    ) -> BTreeMap<String, DeploymentTierAggregate> {
        let unique = unique_nodes(nodes);

        tiers
            .iter()
            .map(|tier| {
                let mut requirements = ResourceRequirements::default();
                let mut blocking = BTreeSet::new();
                let mut unknown = BTreeSet::new();
                let mut score_sum = 0.0;
                let mut scored = 0usize;

                for node in &unique {
                    requirements += node.effective_requirements();
                    match node.tier_support.get(tier) {
                        Some(support) => {
                            score_sum += support.fitness_score;
                            scored += 1;
                            if self.policy.is_blocking(support) {
                                blocking.insert(node.name.clone());
                            }
                        }
                        None => {
                            unknown.insert(node.name.clone());
                        }
                    }
                }

                let fitness_score = if unique.is_empty() {
                    1.0
                } else if scored == 0 {
                    0.0
                } else {
                    score_sum / scored as f64
                };

                (
                    tier.clone(),
                    DeploymentTierAggregate {
                        dependency_count: unique.len(),
                        estimated_requirements: requirements,
                        fitness_score,
                        blocking_dependencies: blocking.into_iter().collect(),
                        unknown_support: unknown.into_iter().collect(),
                    },
                )
            })
            .collect()
    }

    /// Credentials every resource in the tree needs, deduplicated
    pub fn secrets(nodes: &[DeploymentDependencyNode]) -> Vec<SecretRequirement> {
        let mut secrets: Vec<SecretRequirement> = unique_nodes(nodes)
            .into_iter()
            .filter(|n| n.dependency_type == DependencyType::Resource)
            .flat_map(|node| {
                ResourceKnowledge::secrets(&node.name)
                    .into_iter()
                    .map(|(name, description)| SecretRequirement {
                        dependency: node.name.clone(),
                        name,
                        description,
                    })
            })
            .collect();
        secrets.sort_by(|a, b| (&a.dependency, &a.name).cmp(&(&b.dependency, &b.name)));
        secrets
    }

    /// Replacement candidates for every dependency blocking a tier
    pub fn swaps(&self, nodes: &[DeploymentDependencyNode], tiers: &[String]) -> Vec<SwapSuggestion> {
        let unique = unique_nodes(nodes);
        let mut swaps = Vec::new();

        for tier in tiers {
            for node in &unique {
                let Some(support) = node.tier_support.get(tier) else {
                    continue;
                };
                if !self.policy.is_blocking(support) {
                    continue;
                }

                let alternatives = if !support.alternatives.is_empty() {
                    support.alternatives.clone()
                } else {
                    let known = ResourceKnowledge::tier_swaps(&node.name, tier);
                    if known.is_empty() {
                        node.swappable_with.clone()
                    } else {
                        known
                    }
                };
                if alternatives.is_empty() {
                    continue;
                }

                let reason = support.reason.clone().unwrap_or_else(|| {
                    if support.supported {
                        format!(
                            "fitness {:.2} is below the blocking threshold {:.2}",
                            support.fitness_score, self.policy.blocking_threshold
                        )
                    } else {
                        format!("not supported on {}", tier)
                    }
                });

                swaps.push(SwapSuggestion {
                    dependency: node.name.clone(),
                    tier: tier.clone(),
                    alternatives,
                    reason,
                });
            }
        }

        swaps
    }
}

/// Scenario manifests read while building a tree
#[derive(Default)]
struct TreeSources {
    loaded: BTreeSet<String>,
    missing: BTreeSet<String>,
}

/// Depth-first, first occurrence of each `(type, name)` wins. Cycle leaves
/// repeat an ancestor or the root and are skipped.
pub(crate) fn unique_nodes(nodes: &[DeploymentDependencyNode]) -> Vec<&DeploymentDependencyNode> {
    fn walk<'n>(
        nodes: &'n [DeploymentDependencyNode],
        seen: &mut HashSet<DependencyKey>,
        out: &mut Vec<&'n DeploymentDependencyNode>,
    ) {
        for node in nodes {
            if node.cycle_detected {
                continue;
            }
            if seen.insert(DependencyKey::new(node.dependency_type, &node.name)) {
                out.push(node);
            }
            walk(&node.children, seen, out);
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    walk(nodes, &mut seen, &mut out);
    out
}
