/// Filesystem adapters: the scenario workspace, cached artifacts and report output
mod atomic;
mod caching_workspace;
mod file_writer;
mod report_store;
mod scenario_workspace;

pub use atomic::write_atomic;
pub use caching_workspace::CachingScenarioWorkspace;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use report_store::{FileSystemReportStore, BUNDLE_RELATIVE_PATH, REPORT_RELATIVE_PATH};
pub use scenario_workspace::{FileSystemScenarioWorkspace, WorkspaceLayout, MANIFEST_RELATIVE_PATH};
