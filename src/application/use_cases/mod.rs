/// Use cases module containing application business logic orchestration
mod analyze_scenario;
mod dependency_graph;
mod deployment_report;
mod manifest_edits;
mod optimize_scenario;

pub use analyze_scenario::AnalyzeScenarioUseCase;
pub use dependency_graph::DependencyGraphUseCase;
pub use deployment_report::DeploymentReportUseCase;
pub use optimize_scenario::OptimizeScenarioUseCase;

/// Errors carry hint paragraphs; batch summaries keep only the headline
fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}
