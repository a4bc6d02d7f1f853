use crate::dependency_analysis::domain::TierSupport;
use serde::{Deserialize, Serialize};

/// Fitness below this marks a dependency as blocking for a tier
pub const DEFAULT_BLOCKING_THRESHOLD: f64 = 0.75;

/// Tiers analyzed when a scenario declares none
pub const DEFAULT_TIERS: [&str; 5] = ["local", "desktop", "server", "mobile", "saas"];

/// TierPolicy decides when a dependency blocks a deployment tier
///
/// A dependency blocks tier T when it is unsupported on T or its fitness
/// score for T is below the blocking threshold. The threshold is a tunable
/// policy value, not an invariant of the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPolicy {
    pub blocking_threshold: f64,
    pub default_tiers: Vec<String>,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            blocking_threshold: DEFAULT_BLOCKING_THRESHOLD,
            default_tiers: DEFAULT_TIERS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl TierPolicy {
    pub fn with_threshold(blocking_threshold: f64) -> Self {
        Self {
            blocking_threshold,
            ..Self::default()
        }
    }

    pub fn is_blocking(&self, support: &TierSupport) -> bool {
        !support.supported || support.fitness_score < self.blocking_threshold
    }

    /// Tiers to analyze: the scenario's own declarations, else the defaults
    pub fn tiers_for(&self, declared: &[String]) -> Vec<String> {
        if declared.is_empty() {
            self.default_tiers.clone()
        } else {
            declared.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_fitness_is_blocking() {
        let policy = TierPolicy::default();
        assert!(policy.is_blocking(&TierSupport::new(true, 0.5)));
        assert!(!policy.is_blocking(&TierSupport::new(true, 0.9)));
    }

    #[test]
    fn test_threshold_is_inclusive_lower_bound() {
        let policy = TierPolicy::default();
        assert!(!policy.is_blocking(&TierSupport::new(true, 0.75)));
    }

    #[test]
    fn test_unsupported_is_blocking_regardless_of_score() {
        let policy = TierPolicy::default();
        assert!(policy.is_blocking(&TierSupport::new(false, 1.0)));
    }

    #[test]
    fn test_custom_threshold() {
        let policy = TierPolicy::with_threshold(0.4);
        assert!(!policy.is_blocking(&TierSupport::new(true, 0.5)));
    }

    #[test]
    fn test_tiers_for_falls_back_to_defaults() {
        let policy = TierPolicy::default();
        assert_eq!(policy.tiers_for(&[]).len(), DEFAULT_TIERS.len());
        assert_eq!(
            policy.tiers_for(&["desktop".to_string()]),
            vec!["desktop".to_string()]
        );
    }
}
