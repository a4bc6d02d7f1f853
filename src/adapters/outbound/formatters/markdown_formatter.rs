use crate::application::dto::{
    AnalysisOutput, AnalysisResponse, BatchAnalysisResponse, BundleResponse, DeploymentResponse,
    OptimizationResponse,
};
use crate::dependency_analysis::domain::{
    CycleReport, DependencyDiff, DependencyGraph, DiffDetail, ImpactReport,
};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

const DIFF_TABLE_HEADER: &str = "| Name | Status | Details |\n|------|--------|---------|\n";

/// MarkdownFormatter adapter rendering results as human-readable Markdown
///
/// One section layout per result kind; every table cell is escaped.
#[derive(Debug, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn cell(text: &str) -> String {
        if text.is_empty() {
            "-".to_string()
        } else {
            Self::escape_markdown_table_cell(text)
        }
    }

    fn yes_no(value: bool) -> &'static str {
        if value {
            "yes"
        } else {
            "no"
        }
    }
}

/// Helper methods for rendering sections
impl MarkdownFormatter {
    fn render_analysis(output: &mut String, response: &AnalysisResponse) {
        output.push_str(&format!("# Dependency Analysis: {}\n\n", response.scenario));
        output.push_str(&format!(
            "Scanned {} file(s), detected {} dependency(ies).\n\n",
            response.scan.files_scanned,
            response.scan.dependencies.len()
        ));

        Self::render_diff(output, "Resources", &response.resources);
        Self::render_diff(output, "Scenarios", &response.scenarios);
        Self::render_diff(output, "Shared Workflows", &response.shared_workflows);

        if !response.applied.is_empty() {
            output.push_str("## Applied Declarations\n\n");
            for applied in &response.applied {
                output.push_str(&format!("- {}\n", applied));
            }
            output.push('\n');
        }

        if !response.scan.skipped.is_empty() {
            output.push_str("## Skipped Paths\n\n");
            for skipped in &response.scan.skipped {
                output.push_str(&format!("- `{}`: {}\n", skipped.path, skipped.reason));
            }
            output.push('\n');
        }

        if !response.persisted {
            output.push_str("> ⚠️ Dependency edges could not be persisted.\n\n");
        }
    }

    fn render_diff(output: &mut String, title: &str, diff: &DependencyDiff<DiffDetail>) {
        output.push_str(&format!("## {}\n\n", title));
        if diff.is_empty() {
            output.push_str("*Declarations match the source tree*\n\n");
            return;
        }

        output.push_str(DIFF_TABLE_HEADER);
        for entry in &diff.missing {
            let details = if entry.details.files.is_empty() {
                String::new()
            } else {
                format!("found in {}", entry.details.files.join(", "))
            };
            output.push_str(&format!(
                "| {} | missing | {} |\n",
                Self::cell(&entry.name),
                Self::cell(&details)
            ));
        }
        for entry in &diff.extra {
            let details = match entry.details.required {
                Some(true) => "declared required, never referenced",
                Some(false) => "declared optional, never referenced",
                None => "never referenced",
            };
            output.push_str(&format!(
                "| {} | extra | {} |\n",
                Self::cell(&entry.name),
                details
            ));
        }
        output.push('\n');
    }

    fn render_batch(output: &mut String, batch: &BatchAnalysisResponse) {
        output.push_str("# Workspace Dependency Analysis\n\n");
        output.push_str("| Scenario | Detected | Missing | Extra | Persisted |\n");
        output.push_str("|----------|----------|---------|-------|-----------|\n");
        for summary in &batch.analyzed {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                Self::cell(&summary.scenario),
                summary.detected,
                summary.missing,
                summary.extra,
                Self::yes_no(summary.persisted)
            ));
        }
        output.push('\n');

        if !batch.failures.is_empty() {
            output.push_str("## Failures\n\n");
            for failure in &batch.failures {
                output.push_str(&format!("- **{}**: {}\n", failure.scenario, failure.error));
            }
            output.push('\n');
        }
    }

    fn render_graph(output: &mut String, graph: &DependencyGraph) {
        output.push_str(&format!("# Dependency Graph ({})\n\n", graph.graph_type));
        output.push_str(&format!(
            "{} node(s), {} edge(s), complexity {:.2}\n\n",
            graph.metadata.total_nodes, graph.metadata.total_edges, graph.metadata.complexity_score
        ));
        if graph.metadata.stale_edges_dropped > 0 {
            output.push_str(&format!(
                "{} edge(s) to unknown scenarios were dropped.\n\n",
                graph.metadata.stale_edges_dropped
            ));
        }

        output.push_str("| From | To | Type | Required |\n");
        output.push_str("|------|----|------|----------|\n");
        for edge in &graph.edges {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                Self::cell(&edge.source),
                Self::cell(&edge.target),
                edge.edge_type,
                Self::yes_no(edge.required)
            ));
        }
        output.push('\n');
    }

    fn render_cycles(output: &mut String, report: &CycleReport) {
        output.push_str("# Dependency Cycles\n\n");
        if !report.has_cycles {
            output.push_str("*No cycles detected*\n\n");
            return;
        }

        output.push_str(&format!(
            "{} cycle(s), severity **{}**\n\n",
            report.total_cycles, report.severity
        ));
        for cycle in &report.cycles {
            output.push_str(&format!(
                "- `{}`{}: {}\n",
                cycle.path.join(" → "),
                if cycle.required { " (required)" } else { "" },
                cycle.description
            ));
        }
        output.push('\n');
    }

    fn render_impact(output: &mut String, report: &ImpactReport) {
        output.push_str(&format!("# Impact of Removing {}\n\n", report.dependency_name));
        output.push_str(&format!(
            "Severity **{}**: {} scenario(s) affected, {} require it.\n\n",
            report.severity, report.total_affected, report.required_dependents
        ));

        if !report.direct_dependents.is_empty() {
            output.push_str("## Direct Dependents\n\n");
            output.push_str("| Scenario | Required | Purpose | Access |\n");
            output.push_str("|----------|----------|---------|--------|\n");
            for dependent in &report.direct_dependents {
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    Self::cell(&dependent.scenario),
                    Self::yes_no(dependent.required),
                    Self::cell(&dependent.purpose),
                    Self::cell(&dependent.access_method)
                ));
            }
            output.push('\n');
        }

        if !report.indirect_dependents.is_empty() {
            output.push_str("## Indirect Dependents\n\n");
            for dependent in &report.indirect_dependents {
                output.push_str(&format!("- {} (via {})\n", dependent.scenario, dependent.via));
            }
            output.push('\n');
        }

        output.push_str("## Recommendations\n\n");
        for recommendation in &report.recommendations {
            output.push_str(&format!("- {}\n", recommendation));
        }
        output.push('\n');
    }

    fn render_optimization(output: &mut String, response: &OptimizationResponse) {
        output.push_str(&format!("# Optimization: {}\n\n", response.scenario));
        if response.recommendations.is_empty() {
            output.push_str("*Nothing to optimize*\n\n");
            return;
        }

        output.push_str("| Kind | Dependency | Tier | Alternative | Reason |\n");
        output.push_str("|------|------------|------|-------------|--------|\n");
        for recommendation in &response.recommendations {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                recommendation.kind,
                Self::cell(&recommendation.dependency),
                Self::cell(recommendation.tier.as_deref().unwrap_or_default()),
                Self::cell(recommendation.alternative.as_deref().unwrap_or_default()),
                Self::cell(&recommendation.reason)
            ));
        }
        output.push('\n');

        if !response.applied.is_empty() {
            output.push_str(&format!("Applied {} change(s).\n\n", response.applied.len()));
        }
    }

    fn render_deployment(output: &mut String, response: &DeploymentResponse) {
        let report = &response.report;
        output.push_str(&format!("# Deployment Report: {}\n\n", report.scenario));
        output.push_str(&format!(
            "Generated {}{}\n\n",
            report.generated_at.to_rfc3339(),
            if response.from_cache { " (cached)" } else { "" }
        ));

        output.push_str("| Tier | Dependencies | RAM (MB) | Disk (MB) | CPU | Fitness | Blocking |\n");
        output.push_str("|------|--------------|----------|-----------|-----|---------|----------|\n");
        for (tier, aggregate) in &report.aggregates {
            let requirements = &aggregate.estimated_requirements;
            output.push_str(&format!(
                "| {} | {} | {} | {} | {:.2} | {:.2} | {} |\n",
                Self::cell(tier),
                aggregate.dependency_count,
                requirements.ram_mb,
                requirements.disk_mb,
                requirements.cpu_cores,
                aggregate.fitness_score,
                Self::cell(&aggregate.blocking_dependencies.join(", "))
            ));
        }
        output.push('\n');

        if !report.secrets.is_empty() {
            output.push_str("## Secrets\n\n");
            for secret in &report.secrets {
                output.push_str(&format!(
                    "- `{}` ({}): {}\n",
                    secret.name, secret.dependency, secret.description
                ));
            }
            output.push('\n');
        }

        if !report.swaps.is_empty() {
            output.push_str("## Suggested Swaps\n\n");
            for swap in &report.swaps {
                output.push_str(&format!(
                    "- {} on {}: {} ({})\n",
                    swap.dependency,
                    swap.tier,
                    swap.alternatives.join(", "),
                    swap.reason
                ));
            }
            output.push('\n');
        }
    }

    fn render_bundle(output: &mut String, response: &BundleResponse) {
        let skeleton = &response.skeleton;
        output.push_str(&format!(
            "# Bundle: {} ({})\n\n",
            skeleton.scenario, skeleton.target_tier
        ));

        output.push_str("| Service | Kind | Health | Depends On |\n");
        output.push_str("|---------|------|--------|------------|\n");
        for service in &skeleton.services {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                Self::cell(&service.id),
                Self::cell(&service.kind),
                Self::cell(&service.health.check_type),
                Self::cell(&service.depends_on.join(", "))
            ));
        }
        output.push('\n');

        for swap in &skeleton.swaps {
            output.push_str(&format!("- swap {} → {}: {}\n", swap.from, swap.to, swap.reason));
        }
        if !skeleton.swaps.is_empty() {
            output.push('\n');
        }

        if let Some(path) = &response.written_to {
            output.push_str(&format!("Written to `{}`\n", path.display()));
        }
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, output: &AnalysisOutput) -> Result<String> {
        let mut rendered = String::new();
        match output {
            AnalysisOutput::Analysis(response) => Self::render_analysis(&mut rendered, response),
            AnalysisOutput::Batch(batch) => Self::render_batch(&mut rendered, batch),
            AnalysisOutput::Graph(graph) => Self::render_graph(&mut rendered, graph),
            AnalysisOutput::Cycles(report) => Self::render_cycles(&mut rendered, report),
            AnalysisOutput::Impact(report) => Self::render_impact(&mut rendered, report),
            AnalysisOutput::Optimization(response) => {
                Self::render_optimization(&mut rendered, response)
            }
            AnalysisOutput::Deployment(response) => {
                Self::render_deployment(&mut rendered, response)
            }
            AnalysisOutput::Bundle(response) => Self::render_bundle(&mut rendered, response),
        }
        Ok(rendered)
    }
}
