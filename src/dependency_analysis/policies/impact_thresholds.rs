use crate::dependency_analysis::domain::ImpactSeverity;
use serde::{Deserialize, Serialize};

/// Thresholds that map dependent counts to an impact severity
///
/// Rules, checked from most to least severe:
/// 1. critical: `required >= critical_required`, or
///    `required >= 1 && total >= critical_total`
/// 2. high: `required >= high_required` or `total >= high_total`
/// 3. medium: `required >= 1` or `total >= medium_total`
/// 4. low: `total >= low_total`
/// 5. none otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactThresholds {
    pub critical_required: usize,
    pub critical_total: usize,
    pub high_required: usize,
    pub high_total: usize,
    pub medium_total: usize,
    pub low_total: usize,
}

impl Default for ImpactThresholds {
    fn default() -> Self {
        Self {
            critical_required: 5,
            critical_total: 10,
            high_required: 3,
            high_total: 8,
            medium_total: 5,
            low_total: 2,
        }
    }
}

impl ImpactThresholds {
    /// Classifies a blast radius
    ///
    /// # Arguments
    /// * `required` - Direct dependents that declare the dependency required
    /// * `total` - Direct plus indirect dependents
    pub fn classify(&self, required: usize, total: usize) -> ImpactSeverity {
        if required >= self.critical_required || (required >= 1 && total >= self.critical_total) {
            ImpactSeverity::Critical
        } else if required >= self.high_required || total >= self.high_total {
            ImpactSeverity::High
        } else if required >= 1 || total >= self.medium_total {
            ImpactSeverity::Medium
        } else if total >= self.low_total {
            ImpactSeverity::Low
        } else {
            ImpactSeverity::None
        }
    }
}
