/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports:
/// the scenario workspace on disk, dependency stores, console progress and
/// report formatters.
pub mod outbound;
