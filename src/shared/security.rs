use crate::shared::error::AnalyzerError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of a manifest or cached report (10 MB)
pub const MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum size of a source file considered by the scanner (2 MB).
/// Larger files are generated bundles or data dumps, never hand-written code.
pub const MAX_SCAN_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Security
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
///
/// # Errors
/// Returns an error if the path is missing, a symbolic link, or not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<fs::Metadata> {
    let metadata = fs::symlink_metadata(path).map_err(|e| AnalyzerError::FileReadError {
        path: path.to_path_buf(),
        details: format!("Failed to read {} metadata: {}", file_description, e),
    })?;

    if metadata.is_symlink() {
        return Err(AnalyzerError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} is a symbolic link", file_description),
            hint: "Replace the link with a regular file".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(metadata)
}

/// Validates file size is within acceptable limits
///
/// # Errors
/// Returns an error if the file size exceeds the maximum
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        return Err(AnalyzerError::SecurityError {
            path: path.to_path_buf(),
            reason: format!(
                "file is too large ({} bytes). Maximum allowed size is {} bytes",
                file_size, max_size
            ),
            hint: "Large generated files are not analyzed".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Reads a document after the symlink, file-type and size checks pass
pub fn read_document(path: &Path, file_description: &str) -> Result<String> {
    let metadata = validate_regular_file(path, file_description)?;
    validate_file_size(metadata.len(), path, MAX_DOCUMENT_SIZE)?;

    fs::read_to_string(path).map_err(|e| {
        AnalyzerError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        }
        .into()
    })
}
