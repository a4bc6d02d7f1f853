use crate::dependency_analysis::domain::{
    DependencyDiff, DependencyKey, DependencyType, DetectedDependency, DiffDetail, DiffEntry,
    ScenarioDependency, ServiceManifest,
};
use crate::dependency_analysis::policies::ResourceKnowledge;
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;

/// Which side of the comparison an entry came from, handed to detail extractors
pub enum DiffSide<'a, D, E> {
    /// Detected but not declared
    Missing(&'a E),
    /// Declared but not detected
    Extra(&'a D),
}

/// Compares declared against detected entries by name.
///
/// `missing` collects names only in `detected`, `extra` names only in
/// `declared`; both come out sorted by name because the maps are ordered.
pub fn diff<D, E, T, F>(
    declared: &BTreeMap<String, D>,
    detected: &BTreeMap<String, E>,
    detail: F,
) -> DependencyDiff<T>
where
    F: Fn(DiffSide<'_, D, E>) -> T,
{
    let missing = detected
        .iter()
        .filter(|(name, _)| !declared.contains_key(*name))
        .map(|(name, entry)| DiffEntry {
            name: name.clone(),
            details: detail(DiffSide::Missing(entry)),
        })
        .collect();

    let extra = declared
        .iter()
        .filter(|(name, _)| !detected.contains_key(*name))
        .map(|(name, entry)| DiffEntry {
            name: name.clone(),
            details: detail(DiffSide::Extra(entry)),
        })
        .collect();

    DependencyDiff { missing, extra }
}

/// Declared dependencies of a scenario as edge records, sorted by type then name.
/// Explicitly disabled resources are left out.
pub fn extract_declared(scenario: &str, manifest: &ServiceManifest) -> Vec<ScenarioDependency> {
    let mut declared: BTreeMap<DependencyKey, ScenarioDependency> = BTreeMap::new();

    for (name, resource) in manifest.enabled_resources() {
        let canonical = ResourceKnowledge::canonical_name(name);
        let mut dependency = ScenarioDependency::new(
            scenario,
            DependencyType::Resource,
            &canonical,
            resource.required,
        )
        .with_purpose(resource.purpose.clone().unwrap_or_default())
        .with_access_method("declared");
        if let Some(resource_type) = &resource.resource_type {
            dependency
                .configuration
                .insert("resource_type".to_string(), Value::from(resource_type.as_str()));
        }
        declared.insert(dependency.key(), dependency);
    }

    for (name, scenario_decl) in &manifest.scenarios {
        let mut dependency =
            ScenarioDependency::new(scenario, DependencyType::Scenario, name, scenario_decl.required)
                .with_purpose(scenario_decl.description.clone().unwrap_or_default())
                .with_access_method("declared");
        if let Some(range) = scenario_decl
            .version_range
            .as_ref()
            .or(scenario_decl.version.as_ref())
        {
            dependency
                .configuration
                .insert("version".to_string(), Value::from(range.as_str()));
        }
        declared.insert(dependency.key(), dependency);
    }

    for (name, required) in manifest.shared_workflows() {
        let dependency =
            ScenarioDependency::new(scenario, DependencyType::SharedWorkflow, &name, required)
                .with_access_method("initialization");
        declared.insert(dependency.key(), dependency);
    }

    declared.into_values().collect()
}

/// Declared vs detected for one dependency type
pub fn diff_by_type(
    declared: &[ScenarioDependency],
    detected: &[DetectedDependency],
    dependency_type: DependencyType,
) -> DependencyDiff<DiffDetail> {
    let declared: BTreeMap<String, &ScenarioDependency> = declared
        .iter()
        .filter(|d| d.dependency_type == dependency_type)
        .map(|d| (d.dependency_name.clone(), d))
        .collect();
    let detected: BTreeMap<String, &DetectedDependency> = detected
        .iter()
        .filter(|d| d.dependency_type == dependency_type)
        .map(|d| (d.name.clone(), d))
        .collect();

    diff(&declared, &detected, |side| match side {
        DiffSide::Missing(found) => detected_detail(found),
        DiffSide::Extra(declaration) => DiffDetail {
            resource_type: declaration
                .configuration
                .get("resource_type")
                .and_then(Value::as_str)
                .map(str::to_string),
            required: Some(declaration.required),
            purpose: (!declaration.purpose.is_empty()).then(|| declaration.purpose.clone()),
            ..DiffDetail::default()
        },
    })
}

fn detected_detail(found: &DetectedDependency) -> DiffDetail {
    let mut methods = Vec::new();
    for evidence in &found.evidence {
        if !methods.contains(&evidence.method) {
            methods.push(evidence.method);
        }
    }
    DiffDetail {
        resource_type: found.resource_type.clone(),
        files: found.files().into_iter().map(str::to_string).collect(),
        methods,
        ..DiffDetail::default()
    }
}

/// Edge set persisted after a scan.
///
/// Declared entries keep their metadata; those also detected are stamped
/// verified with the files they were seen in. Detected-only entries are added
/// as optional, with the detection method as access method.
pub fn merge(
    scenario: &str,
    declared: Vec<ScenarioDependency>,
    detected: &[DetectedDependency],
) -> Vec<ScenarioDependency> {
    let now = Utc::now();
    let mut merged: BTreeMap<DependencyKey, ScenarioDependency> =
        declared.into_iter().map(|d| (d.key(), d)).collect();

    for found in detected {
        let key = DependencyKey::new(found.dependency_type, &found.name);
        let files = Value::from(
            found
                .files()
                .into_iter()
                .map(Value::from)
                .collect::<Vec<_>>(),
        );

        match merged.get_mut(&key) {
            Some(existing) => {
                existing.last_verified = now;
                existing
                    .configuration
                    .insert("verified".to_string(), Value::Bool(true));
                existing.configuration.insert("detected_in".to_string(), files);
            }
            None => {
                let access_method = found
                    .primary_method()
                    .map(|m| m.as_str())
                    .unwrap_or("detected");
                let mut dependency =
                    ScenarioDependency::new(scenario, found.dependency_type, &found.name, false)
                        .with_purpose("Detected in source")
                        .with_access_method(access_method);
                dependency.configuration.insert("detected_in".to_string(), files);
                if let Some(resource_type) = &found.resource_type {
                    dependency
                        .configuration
                        .insert("resource_type".to_string(), Value::from(resource_type.as_str()));
                }
                merged.insert(key, dependency);
            }
        }
    }

    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_analysis::domain::{DetectionEvidence, DetectionMethod};

    const MANIFEST: &str = r#"{
        "resources": {
            "postgres": {"type": "postgres", "required": true, "purpose": "notes"},
            "redis": {"type": "redis", "required": false},
            "qdrant": {"type": "qdrant", "enabled": false}
        },
        "scenarios": {
            "notes": {"required": true, "versionRange": ">=1.0"}
        }
    }"#;

    fn detected(name: &str, dependency_type: DependencyType, file: &str) -> DetectedDependency {
        let mut found = DetectedDependency::new(name, dependency_type);
        found.add_evidence(DetectionEvidence {
            file: file.to_string(),
            method: DetectionMethod::Signature,
            pattern: "test".to_string(),
        });
        found
    }

    #[test]
    fn test_identical_sets_have_empty_diff() {
        let declared: BTreeMap<String, u32> =
            [("a".to_string(), 1), ("b".to_string(), 2)].into_iter().collect();
        let result = diff(&declared, &declared, |_| ());
        assert!(result.is_empty());
    }

    #[test]
    fn test_diff_is_sorted_and_uses_extractor() {
        let declared: BTreeMap<String, &str> =
            [("zeta".to_string(), "d"), ("alpha".to_string(), "d")].into_iter().collect();
        let detected: BTreeMap<String, &str> =
            [("omega".to_string(), "x"), ("beta".to_string(), "x")].into_iter().collect();

        let result = diff(&declared, &detected, |side| match side {
            DiffSide::Missing(v) => format!("missing:{}", v),
            DiffSide::Extra(v) => format!("extra:{}", v),
        });

        assert_eq!(result.missing_names(), vec!["beta", "omega"]);
        assert_eq!(result.extra_names(), vec!["alpha", "zeta"]);
        assert_eq!(result.missing[0].details, "missing:x");
        assert_eq!(result.extra[0].details, "extra:d");
    }

    #[test]
    fn test_extract_declared_skips_disabled_resources() {
        let manifest = ServiceManifest::from_json(MANIFEST).unwrap();
        let declared = extract_declared("research", &manifest);

        let names: Vec<_> = declared.iter().map(|d| d.dependency_name.as_str()).collect();
        assert_eq!(names, vec!["postgres", "redis", "notes"]);
        assert!(declared[0].required);
        assert_eq!(declared[0].purpose, "notes");
        assert_eq!(declared[2].configuration["version"], ">=1.0");
    }

    #[test]
    fn test_diff_by_type() {
        let manifest = ServiceManifest::from_json(MANIFEST).unwrap();
        let declared = extract_declared("research", &manifest);
        let found = vec![
            detected("postgres", DependencyType::Resource, "api/db.go"),
            detected("ollama", DependencyType::Resource, "api/llm.go"),
        ];

        let resources = diff_by_type(&declared, &found, DependencyType::Resource);
        assert_eq!(resources.missing_names(), vec!["ollama"]);
        assert_eq!(resources.missing[0].details.files, vec!["api/llm.go"]);
        assert_eq!(resources.extra_names(), vec!["redis"]);
        assert_eq!(resources.extra[0].details.required, Some(false));

        let scenarios = diff_by_type(&declared, &found, DependencyType::Scenario);
        assert_eq!(scenarios.extra_names(), vec!["notes"]);
        assert!(scenarios.missing.is_empty());
    }

    #[test]
    fn test_merge_stamps_declared_and_adds_detected_as_optional() {
        let manifest = ServiceManifest::from_json(MANIFEST).unwrap();
        let declared = extract_declared("research", &manifest);
        let found = vec![
            detected("postgres", DependencyType::Resource, "api/db.go"),
            detected("ollama", DependencyType::Resource, "api/llm.go"),
        ];

        let merged = merge("research", declared, &found);
        let by_name: BTreeMap<_, _> = merged
            .iter()
            .map(|d| (d.dependency_name.as_str(), d))
            .collect();

        assert_eq!(merged.len(), 4);
        assert_eq!(by_name["postgres"].configuration["verified"], true);
        assert!(by_name["postgres"].required);
        assert!(!by_name["ollama"].required);
        assert_eq!(by_name["ollama"].access_method, "signature");
        assert_eq!(by_name["ollama"].configuration["detected_in"][0], "api/llm.go");
        assert!(!by_name["redis"].configuration.contains_key("verified"));
    }
}
