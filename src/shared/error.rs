use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// The analyzer is advisory, so findings (cycles, blocking dependencies,
/// critical impact) never change the exit code. Only failures do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the requested analysis completed
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (missing scenario, unreadable manifest, store failure, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for dependency analysis.
///
/// Scan-level problems (unreadable files, unknown names) are not errors at
/// all; they are logged and reported in the scan outcome. The variants below
/// are the failures that surface to a caller.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Scenario not found: {name}\nLooked in: {path}\n\n💡 Hint: Check the scenario name or pass the scenarios directory with --root")]
    ScenarioNotFound { name: String, path: PathBuf },

    #[error("Failed to parse scenario manifest: {path}\nDetails: {details}\n\n💡 Hint: Please verify that service.json contains valid JSON")]
    ManifestParseError { path: PathBuf, details: String },

    #[error("Generated bundle manifest failed schema validation for scenario '{scenario}'\nDetails: {details}")]
    ManifestValidation { scenario: String, details: String },

    #[error("Dependency store operation failed: {operation}\nDetails: {details}\n\n💡 Hint: Check that the store file is writable, or remove it to start fresh")]
    StoreError { operation: String, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid scenarios root: {path}\nReason: {reason}\n\n💡 Hint: Please specify the directory that contains your scenarios")]
    InvalidWorkspacePath { path: PathBuf, reason: String },

    /// Validation error for names and configuration values
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

impl AnalyzerError {
    /// Returns true when the error only concerns a single scenario, so batch
    /// operations can record it and move on.
    pub fn is_per_scenario(&self) -> bool {
        matches!(
            self,
            AnalyzerError::ScenarioNotFound { .. } | AnalyzerError::ManifestParseError { .. }
        )
    }
}
