pub mod bundle;
pub mod cycle;
pub mod dependency;
pub mod deployment;
pub mod diff;
pub mod graph;
pub mod impact;
pub mod manifest;
pub mod manifest_document;
pub mod scenario_name;

pub use bundle::{
    BundleDependency, BundleFile, BundleManifest, BundleSkeleton, BundleSwap, HealthCheck,
    SkeletonService, TierSupportSummary,
};
pub use cycle::{CycleEdge, CycleReport, CycleSeverity, CycleType, DependencyCycle};
pub use dependency::{
    DependencyKey, DependencyType, DetectedDependency, DetectionEvidence, DetectionMethod,
    ScenarioDependency,
};
pub use deployment::{
    DeploymentAnalysisReport, DeploymentDependencyNode, DeploymentTierAggregate,
    ResourceRequirements, SecretRequirement, SwapSuggestion, TierSupport,
};
pub use diff::{DependencyDiff, DiffDetail, DiffEntry};
pub use graph::{DependencyGraph, GraphEdge, GraphMetadata, GraphNode, GraphType};
pub use impact::{DirectDependent, ImpactReport, ImpactSeverity, ImpactTarget, IndirectDependent};
pub use manifest::{
    DependencyDeploymentMetadata, DeploymentConfig, InitializationStep, PlatformSupport,
    ResourceDeclaration, ScenarioDeclaration, ServiceManifest, TierDeclaration,
};
pub use manifest_document::ManifestDocument;
pub use scenario_name::ScenarioName;
