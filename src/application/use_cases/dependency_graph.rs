use crate::dependency_analysis::domain::{CycleReport, DependencyGraph, GraphType, ImpactReport};
use crate::dependency_analysis::policies::ImpactThresholds;
use crate::dependency_analysis::services::{
    CatalogLookup, CycleDetector, GraphBuilder, ImpactAnalyzer,
};
use crate::ports::outbound::{DependencyStore, ProgressReporter};
use crate::shared::Result;
use tracing::info;

/// DependencyGraphUseCase - cross-scenario views over the stored edges
///
/// Graphs, cycle reports and impact reports are recomputed from the store on
/// every call; nothing here writes.
///
/// # Type Parameters
/// * `S` - DependencyStore implementation
/// * `K` - CatalogLookup used to drop stale scenario references
/// * `P` - ProgressReporter implementation
pub struct DependencyGraphUseCase<S, K, P> {
    store: S,
    catalog: K,
    thresholds: ImpactThresholds,
    progress_reporter: P,
}

impl<S, K, P> DependencyGraphUseCase<S, K, P>
where
    S: DependencyStore,
    K: CatalogLookup,
    P: ProgressReporter,
{
    pub fn new(store: S, catalog: K, thresholds: ImpactThresholds, progress_reporter: P) -> Self {
        Self {
            store,
            catalog,
            thresholds,
            progress_reporter,
        }
    }

    /// Builds the dependency graph of the requested type
    ///
    /// # Errors
    /// Returns an error if the store cannot be read
    pub fn graph(&self, graph_type: GraphType) -> Result<DependencyGraph> {
        self.progress_reporter
            .report(&format!("🕸️  Building {} graph...", graph_type));

        let edges = self.store.all_dependencies()?;
        let graph = GraphBuilder::generate_graph(&edges, graph_type, &self.catalog);

        info!(
            graph_type = %graph_type,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "dependency graph built"
        );
        Ok(graph)
    }

    /// Finds scenario-to-scenario cycles in the stored edges. Stale scenario
    /// edges are dropped first, as in [`Self::graph`].
    ///
    /// # Errors
    /// Returns an error if the store cannot be read
    pub fn cycles(&self) -> Result<CycleReport> {
        self.progress_reporter.report("🔁 Detecting dependency cycles...");

        let current: Vec<_> = self
            .store
            .all_dependencies()?
            .into_iter()
            .filter(|edge| !GraphBuilder::is_stale(edge, &self.catalog))
            .collect();
        let edges = CycleDetector::edges_from(&current);
        let report = CycleDetector::detect(&edges);

        info!(cycles = report.cycles.len(), "cycle detection finished");
        Ok(report)
    }

    /// Computes the blast radius of removing `dependency_name`
    ///
    /// # Errors
    /// Returns an error if the direct dependents cannot be read
    pub fn impact(&self, dependency_name: &str) -> Result<ImpactReport> {
        self.progress_reporter
            .report(&format!("💥 Analyzing impact of removing '{}'...", dependency_name));

        ImpactAnalyzer::new(&self.store, &self.catalog, &self.thresholds).analyze(dependency_name)
    }
}
