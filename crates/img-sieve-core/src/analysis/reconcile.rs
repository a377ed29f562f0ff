use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::manifest::RetainSet;
use crate::scanner::{walk_files, TreeFile, WalkFilter};

/// Outcome of comparing the working tree against the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameReport {
    /// Number of identifiers in the manifest.
    pub retained: usize,
    /// Every stripped file name found in the tree.
    pub found: BTreeSet<String>,
    /// Found in the tree, not retained by the manifest.
    pub extra: BTreeSet<String>,
    /// Listed in the manifest, matched by no file.
    pub missing: BTreeSet<String>,
}

pub fn reconcile(root: &Path, retain: &RetainSet, filter: &WalkFilter) -> Result<NameReport> {
    let files = walk_files(root, filter)?;
    let report = reconcile_files(&files, retain);
    info!(
        "{} listed, {} found, {} not in list, {} not in archive",
        report.retained,
        report.found.len(),
        report.extra.len(),
        report.missing.len()
    );
    Ok(report)
}

/// Read-only set difference in both directions.
pub fn reconcile_files(files: &[TreeFile], retain: &RetainSet) -> NameReport {
    let mut found = BTreeSet::new();
    let mut found_paths = BTreeSet::new();
    let mut extra = BTreeSet::new();

    for file in files {
        found.insert(file.stem.clone());
        found_paths.insert(file.relative_identity());
        if !retain.retains(file) {
            extra.insert(file.stem.clone());
        }
    }

    let missing = retain
        .iter()
        .filter(|id| !found.contains(*id) && !found_paths.contains(*id))
        .map(str::to_string)
        .collect();

    NameReport {
        retained: retain.len(),
        found,
        extra,
        missing,
    }
}
