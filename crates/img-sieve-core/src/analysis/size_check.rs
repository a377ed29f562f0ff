//! Folder-encoded size validation.
//!
//! Images live under folders named `<W>x<H>`. A file whose decoded pixel size
//! differs from its folder's size by more than the tolerance on either axis is a
//! mismatch. Checking is split in two phases: [`evaluate`] only reads, and
//! [`apply`] deletes the mismatches it was handed. [`check_and_delete`] runs both.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use image::{ImageReader, ImageResult};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cleaner::remove_file;
use crate::config::{AppConfig, SizeFolder};
use crate::error::{Result, Warning};
use crate::progress::ProgressReporter;
use crate::scanner::{walk_files, TreeFile, WalkFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn within_tolerance(&self, expected: &Dimensions, tolerance: u32) -> bool {
        self.width.abs_diff(expected.width) <= tolerance
            && self.height.abs_diff(expected.height) <= tolerance
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.width, self.height)
    }
}

/// Parse a folder name like `1920x1080` (case-insensitive). Anything else has no size.
pub fn parse_size_tag(folder_name: &str) -> Option<Dimensions> {
    let lower = folder_name.to_lowercase();
    let mut parts = lower.split('x');
    let width = parts.next()?.trim().parse().ok()?;
    let height = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Dimensions::new(width, height))
}

/// Expected size of `file`, taken from the folder selected by `mode`.
pub fn expected_size(file: &TreeFile, mode: SizeFolder) -> Option<Dimensions> {
    let folder = match mode {
        SizeFolder::FirstSegment => file.first_segment(),
        SizeFolder::ImmediateParent => file.parent_name(),
    }?;
    parse_size_tag(&folder)
}

#[derive(Debug, Clone, Default)]
pub struct SizeCheckOptions {
    pub tolerance: u32,
    pub size_folder: SizeFolder,
    pub filter: WalkFilter,
}

impl SizeCheckOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            size_folder: config.size_folder,
            filter: WalkFilter::new(&config.ignore_patterns),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeVerdict {
    /// The size folder does not carry a `<W>x<H>` tag.
    Exempt,
    Within {
        expected: Dimensions,
        actual: Dimensions,
    },
    Mismatch {
        expected: Dimensions,
        actual: Dimensions,
    },
    /// The image could not be decoded; the file is left alone.
    Undecodable {
        expected: Dimensions,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeCheck {
    pub file: TreeFile,
    pub verdict: SizeVerdict,
}

#[derive(Debug, Clone, Default)]
pub struct SizeEvaluation {
    /// One entry per walked file, in walk order.
    pub checks: Vec<SizeCheck>,
    pub warnings: Vec<Warning>,
}

impl SizeEvaluation {
    pub fn mismatches(&self) -> impl Iterator<Item = &SizeCheck> {
        self.checks
            .iter()
            .filter(|c| matches!(c.verdict, SizeVerdict::Mismatch { .. }))
    }
}

/// A file removed because its pixel size did not fit its folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeMismatch {
    pub file_name: String,
    pub path: PathBuf,
    pub expected: Dimensions,
    pub actual: Dimensions,
}

impl fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Expected: {}, Actual: {}",
            self.file_name, self.expected, self.actual
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct SizeCleanup {
    /// Deleted files, in walk order.
    pub deleted: Vec<SizeMismatch>,
    pub warnings: Vec<Warning>,
}

pub fn evaluate(
    root: &Path,
    options: &SizeCheckOptions,
    reporter: &dyn ProgressReporter,
) -> Result<SizeEvaluation> {
    let files = walk_files(root, &options.filter)?;
    Ok(evaluate_files(files, options, reporter))
}

/// Decode every file that has an expected size. Nothing on disk is modified.
pub fn evaluate_files(
    files: Vec<TreeFile>,
    options: &SizeCheckOptions,
    reporter: &dyn ProgressReporter,
) -> SizeEvaluation {
    let start = Instant::now();
    let total = files.len();
    reporter.on_size_check_start(total);

    let checked = AtomicUsize::new(0);
    let checks: Vec<SizeCheck> = files
        .into_par_iter()
        .map(|file| {
            let verdict = judge(&file, options);
            let done = checked.fetch_add(1, Ordering::Relaxed) + 1;
            reporter.on_size_check_progress(done, total);
            SizeCheck { file, verdict }
        })
        .collect();

    let warnings: Vec<Warning> = checks
        .iter()
        .filter_map(|c| match &c.verdict {
            SizeVerdict::Undecodable { message, .. } => {
                Some(Warning::new(c.file.path.clone(), message))
            }
            _ => None,
        })
        .collect();

    let evaluation = SizeEvaluation { checks, warnings };
    let mismatches = evaluation.mismatches().count();
    reporter.on_size_check_complete(mismatches, start.elapsed().as_secs_f64());
    debug!(
        "Size evaluation of {} files: {} mismatches, {} warnings",
        total,
        mismatches,
        evaluation.warnings.len()
    );
    evaluation
}

fn judge(file: &TreeFile, options: &SizeCheckOptions) -> SizeVerdict {
    let Some(expected) = expected_size(file, options.size_folder) else {
        return SizeVerdict::Exempt;
    };

    match read_dimensions(&file.path) {
        Ok(actual) if actual.within_tolerance(&expected, options.tolerance) => {
            SizeVerdict::Within { expected, actual }
        }
        Ok(actual) => SizeVerdict::Mismatch { expected, actual },
        Err(e) => {
            warn!("Could not open {}: {}", file.path.display(), e);
            SizeVerdict::Undecodable {
                expected,
                message: e.to_string(),
            }
        }
    }
}

fn read_dimensions(path: &Path) -> ImageResult<Dimensions> {
    let (width, height) = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(Dimensions::new(width, height))
}

/// Delete every mismatch in `evaluation`. Aborts on the first file that cannot be removed.
pub fn apply(evaluation: SizeEvaluation, reporter: &dyn ProgressReporter) -> Result<SizeCleanup> {
    let mut deleted = Vec::new();

    for check in evaluation.checks {
        if let SizeVerdict::Mismatch { expected, actual } = check.verdict {
            remove_file(&check.file.path, reporter)?;
            let record = SizeMismatch {
                file_name: check.file.file_name,
                path: check.file.path,
                expected,
                actual,
            };
            debug!("Deleted by size: {}", record);
            deleted.push(record);
        }
    }

    info!("Deleted {} images with size mismatch", deleted.len());
    Ok(SizeCleanup {
        deleted,
        warnings: evaluation.warnings,
    })
}

pub fn check_and_delete(
    root: &Path,
    options: &SizeCheckOptions,
    reporter: &dyn ProgressReporter,
) -> Result<SizeCleanup> {
    let evaluation = evaluate(root, options, reporter)?;
    apply(evaluation, reporter)
}
