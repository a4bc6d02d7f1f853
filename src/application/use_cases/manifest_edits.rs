use crate::dependency_analysis::domain::{
    DependencyType, ManifestDocument, ResourceDeclaration, ScenarioDeclaration,
};
use crate::shared::Result;

const DETECTED_PURPOSE: &str = "Detected in source";

/// Appends an optional declaration for a detected dependency.
///
/// Returns false when nothing was inserted: the name is already declared,
/// or the type has no manifest section (shared workflows are declared
/// through resource initialization files).
pub(super) fn declare_detected(
    document: &mut ManifestDocument,
    dependency_type: DependencyType,
    name: &str,
    resource_type: Option<&str>,
) -> Result<bool> {
    match dependency_type {
        DependencyType::Resource => document.insert_resource(
            name,
            &ResourceDeclaration {
                resource_type: resource_type.map(str::to_string),
                purpose: Some(DETECTED_PURPOSE.to_string()),
                ..ResourceDeclaration::default()
            },
        ),
        DependencyType::Scenario => document.insert_scenario(
            name,
            &ScenarioDeclaration {
                description: Some(DETECTED_PURPOSE.to_string()),
                ..ScenarioDeclaration::default()
            },
        ),
        DependencyType::SharedWorkflow => Ok(false),
    }
}
