/// Crate-wide result type. Domain errors are `AnalyzerError` values wrapped
/// in `anyhow::Error` so callers can attach context while propagating.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
