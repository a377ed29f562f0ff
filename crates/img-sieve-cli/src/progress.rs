use img_sieve_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

const TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Extract and archive phases: spinner
/// - Size check phase: progress bar (file count known from the walk)
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars(TICKS),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    /// Drop any active bar, e.g. when a phase fails before its completion hook runs.
    pub fn clear(&self) {
        self.finish_bar();
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_extract_start(&self, archive: &str) {
        self.spinner(format!("Extracting {}...", archive));
    }

    fn on_extract_complete(&self, files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Extracted {} files in {:.2}s",
            files, duration_secs
        );
    }

    fn on_size_check_start(&self, total_files: usize) {
        let pb = ProgressBar::new(total_files as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Checking sizes [{bar:30.cyan/dim}] {pos}/{len} files ({eta} remaining)",
            )
            .unwrap()
            .progress_chars("━╸─")
            .tick_chars(TICKS),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_size_check_progress(&self, files_checked: usize, _total_files: usize) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            pb.set_position(files_checked as u64);
        }
    }

    fn on_size_check_complete(&self, mismatches: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Size check complete: {} mismatches in {:.2}s",
            mismatches, duration_secs
        );
    }

    fn on_archive_start(&self) {
        self.spinner("Writing archive...".to_string());
    }

    fn on_archive_complete(&self, files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Archive written: {} files in {:.2}s",
            files, duration_secs
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_finishes_active_spinner() {
        let reporter = CliReporter::new();
        reporter.on_extract_start("input.zip");
        let pb = reporter.bar.lock().unwrap().clone().unwrap();
        assert!(!pb.is_finished());

        reporter.clear();
        assert!(reporter.bar.lock().unwrap().is_none());
        assert!(pb.is_finished());
    }
}
