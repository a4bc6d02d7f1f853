/// Mock implementations for testing
mod mock_dependency_store;
mod mock_progress_reporter;
mod mock_report_store;
mod mock_scenario_repository;

pub use mock_dependency_store::MockDependencyStore;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_report_store::MockReportStore;
pub use mock_scenario_repository::MockScenarioRepository;
