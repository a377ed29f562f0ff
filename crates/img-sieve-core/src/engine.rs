use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::analysis::reconcile::{self, NameReport};
use crate::analysis::size_check::{self, SizeCheckOptions, SizeCleanup, SizeEvaluation};
use crate::archive::{self, BuildReport, ExtractReport};
use crate::cleaner::{self, CleanAllReport};
use crate::config::AppConfig;
use crate::error::Result;
use crate::manifest::RetainSet;
use crate::progress::ProgressReporter;
use crate::workspace::Workspace;

/// One cleanup run: an extracted tree, the manifest it is judged against, and
/// the actions a user can trigger on it.
pub struct SieveEngine {
    config: AppConfig,
    options: SizeCheckOptions,
    workspace: Workspace,
    retain: RetainSet,
    extract_report: ExtractReport,
    name_report: NameReport,
}

impl SieveEngine {
    pub fn open(
        config: AppConfig,
        archive_path: &Path,
        manifest_path: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<Self> {
        let retain = RetainSet::from_path(manifest_path)?;
        Self::with_retain_set(config, archive_path, retain, reporter)
    }

    /// Extract `archive_path` into a fresh workspace and compute the name report once.
    pub fn with_retain_set(
        config: AppConfig,
        archive_path: &Path,
        retain: RetainSet,
        reporter: &dyn ProgressReporter,
    ) -> Result<Self> {
        config.validate()?;
        let options = SizeCheckOptions::from_config(&config);
        let workspace = Workspace::create(config.work_dir.as_deref())?;

        info!("Extracting {}", archive_path.display());
        reporter.on_extract_start(&archive_path.to_string_lossy());
        let start = Instant::now();
        let extract_report = workspace.load_archive(archive_path)?;
        reporter.on_extract_complete(extract_report.files, start.elapsed().as_secs_f64());

        let name_report = reconcile::reconcile(workspace.tree(), &retain, &options.filter)?;
        debug!("Retain set: {} identifiers", retain.len());

        Ok(Self {
            config,
            options,
            workspace,
            retain,
            extract_report,
            name_report,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn retain_set(&self) -> &RetainSet {
        &self.retain
    }

    pub fn tree(&self) -> &Path {
        self.workspace.tree()
    }

    pub fn extract_report(&self) -> &ExtractReport {
        &self.extract_report
    }

    /// Name report computed right after extraction. Not refreshed by deletions.
    pub fn name_report(&self) -> &NameReport {
        &self.name_report
    }

    /// Size verdicts for the current tree without deleting anything.
    pub fn evaluate_sizes(&self, reporter: &dyn ProgressReporter) -> Result<SizeEvaluation> {
        size_check::evaluate(self.tree(), &self.options, reporter)
    }

    pub fn delete_unlisted(&self, reporter: &dyn ProgressReporter) -> Result<Vec<String>> {
        cleaner::delete_unlisted(self.tree(), &self.retain, &self.options.filter, reporter)
    }

    pub fn delete_size_mismatched(&self, reporter: &dyn ProgressReporter) -> Result<SizeCleanup> {
        cleaner::delete_size_mismatched(self.tree(), &self.options, reporter)
    }

    pub fn clean_all(&self, reporter: &dyn ProgressReporter) -> Result<CleanAllReport> {
        cleaner::clean_all(self.tree(), &self.retain, &self.options, reporter)
    }

    /// Package the tree as it stands now.
    pub fn export(&self, output: &Path, reporter: &dyn ProgressReporter) -> Result<BuildReport> {
        reporter.on_archive_start();
        let start = Instant::now();
        let report = archive::build_archive(self.tree(), output)?;
        reporter.on_archive_complete(report.files, start.elapsed().as_secs_f64());
        Ok(report)
    }

    pub fn close(self) -> Result<()> {
        self.workspace.close()
    }
}
