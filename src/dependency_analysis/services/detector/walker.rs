use crate::shared::security::MAX_SCAN_FILE_SIZE;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into
const SKIPPED_DIRECTORIES: &[&str] = &[
    "node_modules",
    "vendor",
    "dist",
    "build",
    "target",
    "coverage",
    "__pycache__",
    "docs",
    "doc",
    "test",
    "tests",
    "__tests__",
    "testdata",
    "fixtures",
];

/// File name prefixes (lower-cased) of documentation files
const SKIPPED_NAME_PREFIXES: &[&str] = &["readme", "changelog", "license", "contributing"];

/// Extensions of documentation, lock, media and binary files
const SKIPPED_EXTENSIONS: &[&str] = &[
    "md", "txt", "rst", "lock", "sum", "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "pdf",
    "zip", "gz", "tgz", "tar", "woff", "woff2", "ttf", "eot", "mp3", "mp4", "wav", "wasm", "so",
    "dylib", "exe", "bin", "map",
];

const SKIPPED_FILE_NAMES: &[&str] = &["package-lock.json", "pnpm-lock.yaml", "yarn.lock"];

/// A file selected for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the scanned root, `/`-separated
    pub relative: String,
}

impl SourceFile {
    /// First path segment, or empty for files directly under the root
    pub fn top_level_dir(&self) -> &str {
        match self.relative.split_once('/') {
            Some((first, _)) => first,
            None => "",
        }
    }
}

/// An entry the walk could not use
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<SourceFile>,
    pub skipped: Vec<SkippedEntry>,
}

/// Best-effort source tree walker with directory and file denylists
#[derive(Debug, Clone)]
pub struct SourceWalker {
    max_file_size: u64,
}

impl Default for SourceWalker {
    fn default() -> Self {
        Self {
            max_file_size: MAX_SCAN_FILE_SIZE,
        }
    }
}

impl SourceWalker {
    pub fn with_max_file_size(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Collects eligible files under `root`, sorted by relative path.
    /// Unreadable entries are recorded and skipped.
    pub fn walk(&self, root: &Path) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();

        let entries = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_directory(entry));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| relative_path(root, p))
                        .unwrap_or_default();
                    debug!(path = %path, error = %e, "skipping unreadable entry");
                    outcome.skipped.push(SkippedEntry {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_eligible_file(&entry) {
                continue;
            }

            let relative = relative_path(root, entry.path());
            match entry.metadata() {
                Ok(metadata) if metadata.len() > self.max_file_size => {
                    debug!(path = %relative, size = metadata.len(), "skipping oversized file");
                    outcome.skipped.push(SkippedEntry {
                        path: relative,
                        reason: format!(
                            "file size {} exceeds scan limit {}",
                            metadata.len(),
                            self.max_file_size
                        ),
                    });
                }
                Ok(_) => outcome.files.push(SourceFile {
                    path: entry.path().to_path_buf(),
                    relative,
                }),
                Err(e) => {
                    debug!(path = %relative, error = %e, "skipping file without metadata");
                    outcome.skipped.push(SkippedEntry {
                        path: relative,
                        reason: e.to_string(),
                    });
                }
            }
        }

        outcome
    }
}

fn is_skipped_directory(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRECTORIES.contains(&name.as_ref())
}

fn is_eligible_file(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy().to_lowercase();

    if name.starts_with('.') || SKIPPED_FILE_NAMES.contains(&name.as_str()) {
        return false;
    }
    if SKIPPED_NAME_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return false;
    }
    if name.ends_with("_test.go") || name.contains(".test.") || name.contains(".spec.") {
        return false;
    }
    match name.rsplit_once('.') {
        Some((_, extension)) => !SKIPPED_EXTENSIONS.contains(&extension),
        None => true,
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn relatives(outcome: &WalkOutcome) -> Vec<&str> {
        outcome.files.iter().map(|f| f.relative.as_str()).collect()
    }

    #[test]
    fn test_denylisted_directories_are_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "api/main.go", "package main");
        write(root, "docs/guide.go", "x");
        write(root, "test/helpers.sh", "x");
        write(root, "node_modules/pkg/index.js", "x");
        write(root, ".vrooli/service.json", "{}");
        write(root, "ui/src/app.ts", "x");

        let outcome = SourceWalker::default().walk(root);
        assert_eq!(relatives(&outcome), vec!["api/main.go", "ui/src/app.ts"]);
    }

    #[test]
    fn test_denylisted_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "README.md", "x");
        write(root, "api/handlers_test.go", "x");
        write(root, "ui/app.test.ts", "x");
        write(root, "ui/app.spec.js", "x");
        write(root, "ui/logo.png", "x");
        write(root, "ui/package-lock.json", "{}");
        write(root, "cli/install.sh", "x");
        write(root, "cli/notes", "x");

        let outcome = SourceWalker::default().walk(root);
        assert_eq!(relatives(&outcome), vec!["cli/install.sh", "cli/notes"]);
    }

    #[test]
    fn test_oversized_files_are_recorded_as_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "api/big.go", &"x".repeat(64));
        write(root, "api/small.go", "x");

        let outcome = SourceWalker::with_max_file_size(16).walk(root);
        assert_eq!(relatives(&outcome), vec!["api/small.go"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, "api/big.go");
    }

    #[test]
    fn test_top_level_dir() {
        let file = SourceFile {
            path: PathBuf::from("/x/api/main.go"),
            relative: "api/main.go".to_string(),
        };
        assert_eq!(file.top_level_dir(), "api");

        let file = SourceFile {
            path: PathBuf::from("/x/Makefile"),
            relative: "Makefile".to_string(),
        };
        assert_eq!(file.top_level_dir(), "");
    }

    #[test]
    fn test_missing_root_does_not_panic() {
        let temp = TempDir::new().unwrap();
        let outcome = SourceWalker::default().walk(&temp.path().join("absent"));
        assert!(outcome.files.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
    }
}
