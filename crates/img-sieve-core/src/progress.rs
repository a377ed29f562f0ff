/// Trait for reporting pipeline progress.
///
/// The CLI implements it with indicatif bars. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_extract_start(&self, _archive: &str) {}
    fn on_extract_complete(&self, _files: usize, _duration_secs: f64) {}
    fn on_size_check_start(&self, _total_files: usize) {}
    fn on_size_check_progress(&self, _files_checked: usize, _total_files: usize) {}
    fn on_size_check_complete(&self, _mismatches: usize, _duration_secs: f64) {}
    fn on_file_deleted(&self, _path: &str) {}
    fn on_archive_start(&self) {}
    fn on_archive_complete(&self, _files: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
