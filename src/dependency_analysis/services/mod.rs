mod bundle_manifest_builder;
mod cycle_detector;
pub mod dependency_diff;
mod deployment_tier_analyzer;
pub mod detector;
mod graph_builder;
mod impact_analyzer;

pub use bundle_manifest_builder::{BundleManifestBuilder, BUNDLE_SCHEMA, BUNDLE_SCHEMA_VERSION};
pub use cycle_detector::CycleDetector;
pub use dependency_diff::{diff, diff_by_type, extract_declared, merge, DiffSide};
pub use deployment_tier_analyzer::DeploymentTierAnalyzer;
pub use detector::{CatalogLookup, DependencyDetector, NameCatalog, ScanOutcome, SignatureCatalog};
pub use graph_builder::GraphBuilder;
pub use impact_analyzer::ImpactAnalyzer;
