use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::analysis::size_check::{self, SizeCheckOptions, SizeCleanup};
use crate::error::{Error, Result};
use crate::manifest::RetainSet;
use crate::progress::ProgressReporter;
use crate::scanner::{walk_files, WalkFilter};

#[derive(Debug, Clone, Default)]
pub struct CleanAllReport {
    /// File names removed because the manifest does not list them.
    pub unlisted: Vec<String>,
    pub size: SizeCleanup,
}

pub(crate) fn remove_file(path: &Path, reporter: &dyn ProgressReporter) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))?;
    reporter.on_file_deleted(&path.to_string_lossy());
    Ok(())
}

/// Permanently delete every file the manifest does not retain.
/// Returns the deleted file names in walk order.
pub fn delete_unlisted(
    root: &Path,
    retain: &RetainSet,
    filter: &WalkFilter,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<String>> {
    let mut deleted = Vec::new();

    for file in walk_files(root, filter)? {
        if retain.retains(&file) {
            continue;
        }
        remove_file(&file.path, reporter)?;
        debug!("Deleted unlisted {}", file.relative.display());
        deleted.push(file.file_name);
    }

    info!("Deleted {} images not in the list", deleted.len());
    Ok(deleted)
}

pub fn delete_size_mismatched(
    root: &Path,
    options: &SizeCheckOptions,
    reporter: &dyn ProgressReporter,
) -> Result<SizeCleanup> {
    size_check::check_and_delete(root, options, reporter)
}

/// Unlisted deletion first, then size deletion over whatever is left.
pub fn clean_all(
    root: &Path,
    retain: &RetainSet,
    options: &SizeCheckOptions,
    reporter: &dyn ProgressReporter,
) -> Result<CleanAllReport> {
    let unlisted = delete_unlisted(root, retain, &options.filter, reporter)?;
    let size = delete_size_mismatched(root, options, reporter)?;
    info!(
        "Cleaned {} images not in list and {} size mismatches",
        unlisted.len(),
        size.deleted.len()
    );
    Ok(CleanAllReport { unlisted, size })
}
