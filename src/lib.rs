//! scenario-deps - dependency analysis for multi-scenario platforms
//!
//! Scans a scenario's source tree for the resources, scenarios and shared
//! workflows it actually uses, reconciles them with the declared manifest,
//! persists the edges, and builds graph, cycle, impact and deployment-tier
//! views on top of them. Follows hexagonal architecture and Domain-Driven
//! Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`dependency_analysis`): models, policies and pure services
//! - **Application Layer** (`application`): Use cases, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use scenario_deps::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let workspace = Arc::new(FileSystemScenarioWorkspace::new(WorkspaceLayout::new("scenarios"))?);
//! let detector = DependencyDetector::new(Arc::clone(&workspace))?;
//!
//! let use_case = AnalyzeScenarioUseCase::new(
//!     Arc::clone(&workspace),
//!     detector,
//!     InMemoryDependencyStore::new(),
//!     StderrProgressReporter::new(),
//! );
//!
//! let request = AnalyzeRequest::new(ScenarioName::new("notes")?, false);
//! let response = use_case.execute(request)?;
//!
//! let output = JsonFormatter::new().format(&AnalysisOutput::Analysis(response))?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod dependency_analysis;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        CachingScenarioWorkspace, FileSystemReportStore, FileSystemScenarioWorkspace,
        FileSystemWriter, StdoutPresenter, WorkspaceLayout,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
    pub use crate::adapters::outbound::storage::{InMemoryDependencyStore, JsonFileDependencyStore};
    pub use crate::application::dto::{
        AnalysisOutput, AnalysisResponse, AnalyzeRequest, BundleRequest, DeploymentRequest,
        OptimizeRequest, OutputFormat,
    };
    pub use crate::application::use_cases::{
        AnalyzeScenarioUseCase, DependencyGraphUseCase, DeploymentReportUseCase,
        OptimizeScenarioUseCase,
    };
    pub use crate::dependency_analysis::domain::{
        DependencyType, GraphType, ScenarioDependency, ScenarioName, ServiceManifest,
    };
    pub use crate::dependency_analysis::policies::{ImpactThresholds, TierPolicy};
    pub use crate::dependency_analysis::services::{DependencyDetector, NameCatalog};
    pub use crate::ports::outbound::{
        CatalogSource, DependencyStore, DeploymentReportStore, OutputPresenter, ProgressReporter,
        ReportFormatter, ScenarioRepository, SilentProgressReporter,
    };
    pub use crate::shared::Result;
}
