/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the analysis core uses to reach
/// the file system, the dependency store, the report cache and the console.
pub mod catalog_source;
pub mod dependency_store;
pub mod formatter;
pub mod output_presenter;
pub mod progress_reporter;
pub mod report_store;
pub mod scenario_repository;

pub use catalog_source::CatalogSource;
pub use dependency_store::DependencyStore;
pub use formatter::ReportFormatter;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::{ProgressReporter, SilentProgressReporter};
pub use report_store::DeploymentReportStore;
pub use scenario_repository::ScenarioRepository;
