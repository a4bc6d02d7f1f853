use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
use crate::application::dto::{AnalysisOutput, OutputFormat};
use crate::ports::outbound::ReportFormatter;

/// Factory for creating report formatters
///
/// Selects the formatter adapter for an output format so the CLI never
/// names adapter types directly.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use scenario_deps::application::dto::OutputFormat;
    /// use scenario_deps::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Markdown);
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn ReportFormatter> {
        match format {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new()),
        }
    }

    /// Progress line shown before rendering `output` as `format`
    pub fn progress_message(format: OutputFormat, output: &AnalysisOutput) -> String {
        let subject = match output {
            AnalysisOutput::Analysis(_) => "analysis",
            AnalysisOutput::Batch(_) => "workspace analysis",
            AnalysisOutput::Graph(_) => "dependency graph",
            AnalysisOutput::Cycles(_) => "cycle report",
            AnalysisOutput::Impact(_) => "impact report",
            AnalysisOutput::Optimization(_) => "optimization report",
            AnalysisOutput::Deployment(_) => "deployment report",
            AnalysisOutput::Bundle(_) => "bundle skeleton",
        };
        let format = match format {
            OutputFormat::Json => "JSON",
            OutputFormat::Markdown => "Markdown",
        };
        format!("📝 Rendering {} as {}...", subject, format)
    }
}
