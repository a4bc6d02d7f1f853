use crate::dependency_analysis::policies::ResourceKnowledge;
use crate::ports::outbound::CatalogSource;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Read access to the set of names a detection may resolve to
pub trait CatalogLookup {
    fn known_scenario(&self, name: &str) -> bool;
    fn known_resource(&self, name: &str) -> bool;
    fn known_shared_workflow(&self, name: &str) -> bool;
}

/// Immutable snapshot of known scenario, resource and shared-workflow names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCatalog {
    scenarios: HashSet<String>,
    resources: HashSet<String>,
    shared_workflows: HashSet<String>,
}

impl NameCatalog {
    pub fn new<S, R, W>(scenarios: S, resources: R, shared_workflows: W) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        Self {
            scenarios: scenarios
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
            resources: resources
                .into_iter()
                .map(|r| ResourceKnowledge::canonical_name(r.as_ref()))
                .collect(),
            shared_workflows: shared_workflows
                .into_iter()
                .map(|w| w.as_ref().to_string())
                .collect(),
        }
    }

    /// Builds a catalog from a source. A failing list is logged and left empty;
    /// an empty list only means fewer detections are kept.
    pub fn from_source<C: CatalogSource + ?Sized>(source: &C) -> Self {
        let scenarios = source.known_scenarios().unwrap_or_else(|e| {
            warn!(error = %e, "failed to list known scenarios");
            Vec::new()
        });
        let resources = source.known_resources().unwrap_or_else(|e| {
            warn!(error = %e, "failed to list known resources");
            Vec::new()
        });
        let workflows = source.known_shared_workflows().unwrap_or_else(|e| {
            warn!(error = %e, "failed to list shared workflows");
            Vec::new()
        });
        Self::new(scenarios, resources, workflows)
    }

    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

impl CatalogLookup for NameCatalog {
    fn known_scenario(&self, name: &str) -> bool {
        self.scenarios.contains(&name.to_lowercase())
    }

    fn known_resource(&self, name: &str) -> bool {
        self.resources
            .contains(&ResourceKnowledge::canonical_name(name))
    }

    fn known_shared_workflow(&self, name: &str) -> bool {
        self.shared_workflows.contains(name)
    }
}

/// Lazily built, explicitly refreshable catalog owned by one detector.
///
/// Readers share an `Arc` snapshot taken under the read lock, so a refresh
/// never changes the catalog in the middle of a scan.
pub struct CatalogCache<C: CatalogSource> {
    source: C,
    snapshot: RwLock<Option<Arc<NameCatalog>>>,
}

impl<C: CatalogSource> CatalogCache<C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            snapshot: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    /// Returns the current snapshot, building it on first use
    pub fn snapshot(&self) -> Arc<NameCatalog> {
        {
            let guard = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
            if let Some(catalog) = guard.as_ref() {
                return Arc::clone(catalog);
            }
        }

        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        if let Some(catalog) = guard.as_ref() {
            return Arc::clone(catalog);
        }
        let catalog = Arc::new(NameCatalog::from_source(&self.source));
        debug!(
            scenarios = catalog.scenario_count(),
            resources = catalog.resource_count(),
            "built name catalog"
        );
        *guard = Some(Arc::clone(&catalog));
        catalog
    }

    /// Rebuilds the snapshot from the source under the write lock
    pub fn refresh(&self) -> Arc<NameCatalog> {
        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        let catalog = Arc::new(NameCatalog::from_source(&self.source));
        debug!(
            scenarios = catalog.scenario_count(),
            resources = catalog.resource_count(),
            "refreshed name catalog"
        );
        *guard = Some(Arc::clone(&catalog));
        catalog
    }
}
