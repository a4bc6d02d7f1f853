mod impact_thresholds;
mod resource_knowledge;
mod tier_policy;

pub use impact_thresholds::ImpactThresholds;
pub use resource_knowledge::{ResourceKnowledge, KNOWN_RESOURCE_NAMES};
pub use tier_policy::{TierPolicy, DEFAULT_BLOCKING_THRESHOLD, DEFAULT_TIERS};
