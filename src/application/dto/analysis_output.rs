use super::{
    AnalysisResponse, BatchAnalysisResponse, BundleResponse, DeploymentResponse,
    OptimizationResponse,
};
use crate::dependency_analysis::domain::{CycleReport, DependencyGraph, ImpactReport};

/// Any result the analyzer can hand to a formatter
#[derive(Debug, Clone)]
pub enum AnalysisOutput {
    Analysis(AnalysisResponse),
    Batch(BatchAnalysisResponse),
    Graph(DependencyGraph),
    Cycles(CycleReport),
    Impact(ImpactReport),
    Optimization(OptimizationResponse),
    Deployment(DeploymentResponse),
    Bundle(BundleResponse),
}
