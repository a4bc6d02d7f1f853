/// ProgressReporter port for user-facing progress during analysis
///
/// Diagnostics go to `tracing`; this port carries the short status lines a
/// person running the CLI expects to see on stderr.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress through a batch
    ///
    /// # Arguments
    /// * `current` - Items processed so far
    /// * `total` - Total items in the batch
    /// * `message` - Optional label for the current item
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning or a per-item failure that did not stop the batch
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}

/// Reporter that discards everything, for library callers that only want results
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn report(&self, _message: &str) {}
    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
    fn report_error(&self, _message: &str) {}
    fn report_completion(&self, _message: &str) {}
}
