use crate::shared::error::AnalyzerError;
use crate::shared::Result;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `content` to `path` through a temp file in the same directory and
/// a rename, so readers never observe a partially written file.
///
/// Missing parent directories are created. An existing symlink at `path` is
/// refused rather than followed.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let write_error = |details: String| AnalyzerError::FileWriteError {
        path: path.to_path_buf(),
        details,
    };

    if let Ok(metadata) = fs::symlink_metadata(path) {
        if metadata.is_symlink() {
            return Err(AnalyzerError::SecurityError {
                path: path.to_path_buf(),
                reason: "refusing to replace a symbolic link".to_string(),
                hint: "Remove the link and rerun".to_string(),
            }
            .into());
        }
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| write_error(e.to_string()))?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| write_error(e.to_string()))?;
    temp.persist(path)
        .map_err(|e| write_error(e.error.to_string()))?;

    Ok(())
}
