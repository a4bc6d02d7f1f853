/// Data Transfer Objects for application layer
///
/// Requests carry validated input from the CLI into the use cases;
/// responses carry results out to the formatters.
mod analysis_output;
mod output_format;
mod requests;
mod responses;

pub use analysis_output::AnalysisOutput;
pub use output_format::OutputFormat;
pub use requests::{AnalyzeRequest, BundleRequest, DeploymentRequest, OptimizeRequest};
pub use responses::{
    AnalysisResponse, BatchAnalysisResponse, BundleResponse, DeploymentResponse,
    OptimizationRecommendation, OptimizationResponse, RecommendationKind, ScenarioAnalysisSummary,
    ScenarioFailure,
};
