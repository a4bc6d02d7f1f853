use crate::shared::Result;

/// CatalogSource port supplying the names the detector may report
///
/// Detected names that are not in one of these lists are treated as false
/// positives and discarded.
pub trait CatalogSource {
    /// Names of every scenario in the workspace
    fn known_scenarios(&self) -> Result<Vec<String>>;

    /// Names of every resource the platform offers
    fn known_resources(&self) -> Result<Vec<String>>;

    /// Names of shared workflows that scenarios can reference
    fn known_shared_workflows(&self) -> Result<Vec<String>>;
}

impl<T: CatalogSource + ?Sized> CatalogSource for std::sync::Arc<T> {
    fn known_scenarios(&self) -> Result<Vec<String>> {
        (**self).known_scenarios()
    }

    fn known_resources(&self) -> Result<Vec<String>> {
        (**self).known_resources()
    }

    fn known_shared_workflows(&self) -> Result<Vec<String>> {
        (**self).known_shared_workflows()
    }
}
