use crate::dependency_analysis::domain::ScenarioName;

/// Scan one scenario and reconcile it with its manifest
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub scenario: ScenarioName,
    /// Insert missing declarations into the manifest
    pub apply: bool,
}

impl AnalyzeRequest {
    pub fn new(scenario: ScenarioName, apply: bool) -> Self {
        Self { scenario, apply }
    }
}

/// Produce (and optionally apply) optimization recommendations
#[derive(Debug, Clone)]
pub struct OptimizeRequest {
    pub scenario: ScenarioName,
    pub apply: bool,
}

impl OptimizeRequest {
    pub fn new(scenario: ScenarioName, apply: bool) -> Self {
        Self { scenario, apply }
    }
}

/// Load or rebuild a scenario's deployment report
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub scenario: ScenarioName,
    /// Ignore the cached report even when it is fresh
    pub refresh: bool,
}

impl DeploymentRequest {
    pub fn new(scenario: ScenarioName, refresh: bool) -> Self {
        Self { scenario, refresh }
    }
}

/// Build a bundle skeleton for one tier
#[derive(Debug, Clone)]
pub struct BundleRequest {
    pub scenario: ScenarioName,
    /// Defaults to the first analyzed tier
    pub tier: Option<String>,
    /// Persist the skeleton next to the manifest
    pub write: bool,
}

impl BundleRequest {
    pub fn new(scenario: ScenarioName, tier: Option<String>, write: bool) -> Self {
        Self {
            scenario,
            tier,
            write,
        }
    }
}
