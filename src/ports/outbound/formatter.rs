use crate::application::dto::AnalysisOutput;
use crate::shared::Result;

/// ReportFormatter port for rendering analysis results
///
/// One formatter renders every kind of result (scan, graph, cycles, impact,
/// optimization, deployment, bundle) in its own output format.
pub trait ReportFormatter {
    /// Renders a result
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, output: &AnalysisOutput) -> Result<String>;
}
