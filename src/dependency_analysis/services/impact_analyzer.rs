use crate::dependency_analysis::domain::{
    DependencyType, DirectDependent, ImpactReport, ImpactSeverity, ImpactTarget,
    IndirectDependent, ScenarioDependency,
};
use crate::dependency_analysis::policies::{ImpactThresholds, ResourceKnowledge};
use crate::dependency_analysis::services::detector::CatalogLookup;
use crate::ports::outbound::DependencyStore;
use crate::shared::Result;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// ImpactAnalyzer service computing the blast radius of removing a dependency
///
/// Looks one hop past the direct dependents: scenarios that depend on a
/// direct dependent as a scenario dependency are reported as indirect.
pub struct ImpactAnalyzer<'a> {
    store: &'a dyn DependencyStore,
    catalog: &'a dyn CatalogLookup,
    thresholds: &'a ImpactThresholds,
}

impl<'a> ImpactAnalyzer<'a> {
    pub fn new(
        store: &'a dyn DependencyStore,
        catalog: &'a dyn CatalogLookup,
        thresholds: &'a ImpactThresholds,
    ) -> Self {
        Self {
            store,
            catalog,
            thresholds,
        }
    }

    /// Analyzes the impact of removing `dependency_name`.
    ///
    /// # Errors
    /// Returns an error if the direct dependents cannot be read from the store.
    /// A failed indirect lookup is logged and skipped.
    pub fn analyze(&self, dependency_name: &str) -> Result<ImpactReport> {
        let candidates = self.store.dependents_of(dependency_name, None)?;
        let dependency_type = self.infer_type(dependency_name, &candidates);
        let alternatives = ResourceKnowledge::alternatives(dependency_name);

        let direct = Self::direct_dependents(&candidates, dependency_type, &alternatives);
        let indirect = self.indirect_dependents(dependency_name, &direct);

        let required_dependents = direct.iter().filter(|d| d.required).count();
        let total_affected = direct.len() + indirect.len();
        let severity = self.thresholds.classify(required_dependents, total_affected);

        let recommendations = Self::recommendations(
            dependency_name,
            severity,
            required_dependents,
            &direct,
            &indirect,
            &alternatives,
        );

        Ok(ImpactReport {
            dependency_name: dependency_name.to_string(),
            dependency_type,
            direct_dependents: direct,
            indirect_dependents: indirect,
            required_dependents,
            total_affected,
            severity,
            alternatives,
            recommendations,
            analyzed_at: Utc::now(),
        })
    }

    /// Known scenarios first, then what dependents recorded, then the static
    /// resource list
    fn infer_type(&self, name: &str, dependents: &[ScenarioDependency]) -> ImpactTarget {
        if self.catalog.known_scenario(name) {
            return ImpactTarget::Scenario;
        }
        if let Some(recorded) = dependents.first() {
            return match recorded.dependency_type {
                DependencyType::Scenario => ImpactTarget::Scenario,
                DependencyType::Resource => ImpactTarget::Resource,
                DependencyType::SharedWorkflow => ImpactTarget::SharedWorkflow,
            };
        }
        if ResourceKnowledge::is_known_resource(name) {
            return ImpactTarget::Resource;
        }
        ImpactTarget::Unknown
    }

    fn direct_dependents(
        candidates: &[ScenarioDependency],
        target: ImpactTarget,
        alternatives: &[String],
    ) -> Vec<DirectDependent> {
        let wanted = match target {
            ImpactTarget::Scenario => Some(DependencyType::Scenario),
            ImpactTarget::Resource => Some(DependencyType::Resource),
            ImpactTarget::SharedWorkflow => Some(DependencyType::SharedWorkflow),
            ImpactTarget::Unknown => None,
        };

        let mut by_scenario: BTreeMap<&str, DirectDependent> = BTreeMap::new();
        for edge in candidates
            .iter()
            .filter(|e| wanted.map_or(true, |t| e.dependency_type == t))
        {
            let entry = by_scenario
                .entry(edge.scenario_name.as_str())
                .or_insert_with(|| DirectDependent {
                    scenario: edge.scenario_name.clone(),
                    required: false,
                    purpose: edge.purpose.clone(),
                    access_method: edge.access_method.clone(),
                    alternatives: alternatives.to_vec(),
                });
            entry.required |= edge.required;
        }
        by_scenario.into_values().collect()
    }

    fn indirect_dependents(
        &self,
        dependency_name: &str,
        direct: &[DirectDependent],
    ) -> Vec<IndirectDependent> {
        let mut counted: HashSet<&str> = direct.iter().map(|d| d.scenario.as_str()).collect();
        counted.insert(dependency_name);

        let mut indirect: Vec<IndirectDependent> = Vec::new();
        for dependent in direct {
            let upstream = match self
                .store
                .dependents_of(&dependent.scenario, Some(DependencyType::Scenario))
            {
                Ok(upstream) => upstream,
                Err(e) => {
                    warn!(scenario = %dependent.scenario, error = %e, "skipping indirect dependents");
                    continue;
                }
            };

            for edge in upstream {
                if counted.contains(edge.scenario_name.as_str())
                    || indirect.iter().any(|i| i.scenario == edge.scenario_name)
                {
                    continue;
                }
                indirect.push(IndirectDependent {
                    scenario: edge.scenario_name,
                    via: dependent.scenario.clone(),
                    required: edge.required,
                });
            }
        }

        indirect.sort_by(|a, b| a.scenario.cmp(&b.scenario));
        indirect
    }

    fn recommendations(
        name: &str,
        severity: ImpactSeverity,
        required: usize,
        direct: &[DirectDependent],
        indirect: &[IndirectDependent],
        alternatives: &[String],
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        match severity {
            ImpactSeverity::None if direct.is_empty() => {
                recommendations.push(format!(
                    "No scenarios depend on '{}'; it is safe to remove.",
                    name
                ));
                return recommendations;
            }
            ImpactSeverity::None => recommendations.push(format!(
                "Only optional dependents use '{}'; removal has minimal impact.",
                name
            )),
            ImpactSeverity::Low => recommendations.push(
                "Low impact: notify the owners of the dependent scenarios before removal."
                    .to_string(),
            ),
            ImpactSeverity::Medium => recommendations.push(format!(
                "Review the {} dependent scenario(s) and plan a staged removal of '{}'.",
                direct.len(),
                name
            )),
            ImpactSeverity::High => recommendations.push(format!(
                "High impact: coordinate the removal of '{}' with all dependent scenarios and test each one.",
                name
            )),
            ImpactSeverity::Critical => recommendations.push(format!(
                "Do not remove '{}' without a migration plan: {} scenario(s) require it.",
                name, required
            )),
        }

        if alternatives.is_empty() {
            if required > 0 {
                recommendations.push(format!(
                    "No known drop-in alternative exists; {} scenario(s) would need the functionality reimplemented.",
                    required
                ));
            }
        } else {
            recommendations.push(format!(
                "Consider migrating dependents to an alternative: {}.",
                alternatives.join(", ")
            ));
        }

        if !indirect.is_empty() {
            recommendations.push(format!(
                "{} more scenario(s) are affected indirectly through their scenario dependencies.",
                indirect.len()
            ));
        }

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_analysis::services::detector::NameCatalog;
    use std::sync::Mutex;

    #[derive(Default)]
    struct VecStore {
        rows: Mutex<Vec<ScenarioDependency>>,
    }

    impl DependencyStore for VecStore {
        fn replace_scenario_dependencies(
            &self,
            scenario: &str,
            dependencies: &[ScenarioDependency],
        ) -> Result<()> {
            let mut rows = self.rows.lock().unwrap();
            rows.retain(|r| r.scenario_name != scenario);
            rows.extend_from_slice(dependencies);
            Ok(())
        }
        fn scenario_dependencies(&self, scenario: &str) -> Result<Vec<ScenarioDependency>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.scenario_name == scenario)
                .cloned()
                .collect())
        }
        fn all_dependencies(&self) -> Result<Vec<ScenarioDependency>> {
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    fn store_with(rows: Vec<ScenarioDependency>) -> VecStore {
        VecStore {
            rows: Mutex::new(rows),
        }
    }

    fn analyze(store: &VecStore, catalog: &NameCatalog, name: &str) -> ImpactReport {
        let thresholds = ImpactThresholds::default();
        ImpactAnalyzer::new(store, catalog, &thresholds)
            .analyze(name)
            .unwrap()
    }

    #[test]
    fn test_no_dependents_is_safe_to_remove() {
        let store = VecStore::default();
        let catalog = NameCatalog::default();
        let report = analyze(&store, &catalog, "questdb");

        assert_eq!(report.severity, ImpactSeverity::None);
        assert_eq!(report.total_affected, 0);
        assert_eq!(report.dependency_type, ImpactTarget::Resource);
        assert!(report.recommendations[0].contains("safe to remove"));
    }

    #[test]
    fn test_five_required_dependents_is_critical() {
        let rows = (1..=5)
            .map(|i| {
                ScenarioDependency::new(format!("app-{}", i), DependencyType::Resource, "postgres", true)
            })
            .collect();
        let store = store_with(rows);
        let report = analyze(&store, &NameCatalog::default(), "postgres");

        assert_eq!(report.severity, ImpactSeverity::Critical);
        assert_eq!(report.required_dependents, 5);
        assert_eq!(report.alternatives, vec!["sqlite", "mysql"]);
        assert_eq!(report.direct_dependents[0].alternatives, vec!["sqlite", "mysql"]);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("sqlite, mysql")));
    }

    #[test]
    fn test_indirect_dependents_are_one_hop_and_not_double_counted() {
        let store = store_with(vec![
            ScenarioDependency::new("notes", DependencyType::Resource, "redis", false),
            ScenarioDependency::new("dashboard", DependencyType::Resource, "redis", false),
            ScenarioDependency::new("planner", DependencyType::Scenario, "notes", true),
            ScenarioDependency::new("dashboard", DependencyType::Scenario, "notes", false),
            ScenarioDependency::new("portal", DependencyType::Scenario, "planner", true),
        ]);
        let catalog = NameCatalog::new(
            ["notes", "dashboard", "planner", "portal"],
            ["redis"],
            Vec::<String>::new(),
        );
        let report = analyze(&store, &catalog, "redis");

        let direct: Vec<_> = report.direct_dependents.iter().map(|d| d.scenario.as_str()).collect();
        assert_eq!(direct, vec!["dashboard", "notes"]);
        assert_eq!(report.indirect_dependents.len(), 1);
        assert_eq!(report.indirect_dependents[0].scenario, "planner");
        assert_eq!(report.indirect_dependents[0].via, "notes");
        assert_eq!(report.total_affected, 3);
        assert_eq!(report.severity, ImpactSeverity::Low);
    }

    #[test]
    fn test_type_inference_prefers_known_scenarios() {
        let store = store_with(vec![ScenarioDependency::new(
            "portal",
            DependencyType::Scenario,
            "notes",
            true,
        )]);
        let catalog = NameCatalog::new(["notes", "portal"], Vec::<String>::new(), Vec::<String>::new());
        let report = analyze(&store, &catalog, "notes");
        assert_eq!(report.dependency_type, ImpactTarget::Scenario);
        assert_eq!(report.severity, ImpactSeverity::Medium);

        let report = analyze(&VecStore::default(), &NameCatalog::default(), "mystery");
        assert_eq!(report.dependency_type, ImpactTarget::Unknown);
    }
}
