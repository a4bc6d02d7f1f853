use crate::application::dto::AnalysisOutput;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use serde::Serialize;

/// JsonFormatter adapter rendering results as pretty-printed JSON
///
/// Each result is serialized as-is; field order follows the report types.
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn render<T: Serialize>(value: &T) -> Result<String> {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');
        Ok(json)
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, output: &AnalysisOutput) -> Result<String> {
        match output {
            AnalysisOutput::Analysis(response) => Self::render(response),
            AnalysisOutput::Batch(batch) => Self::render(batch),
            AnalysisOutput::Graph(graph) => Self::render(graph),
            AnalysisOutput::Cycles(report) => Self::render(report),
            AnalysisOutput::Impact(report) => Self::render(report),
            AnalysisOutput::Optimization(response) => Self::render(response),
            AnalysisOutput::Deployment(response) => Self::render(response),
            AnalysisOutput::Bundle(response) => Self::render(&response.skeleton),
        }
    }
}
