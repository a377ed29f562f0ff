use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub files: usize,
    pub directories: usize,
    pub total_bytes: u64,
}

/// Extract the zip at `archive` into `destination`.
///
/// Any existing `destination` is removed first so stale files from a previous run
/// never mix with the new tree.
pub fn extract_archive(archive: &Path, destination: &Path) -> Result<ExtractReport> {
    let file = File::open(archive).map_err(|e| Error::io(archive, e))?;
    extract_named(
        BufReader::new(file),
        &archive.display().to_string(),
        destination,
    )
}

pub fn extract_from_reader<R: Read + Seek>(reader: R, destination: &Path) -> Result<ExtractReport> {
    extract_named(reader, "<stream>", destination)
}

fn extract_named<R: Read + Seek>(
    reader: R,
    label: &str,
    destination: &Path,
) -> Result<ExtractReport> {
    let corrupt = |source| Error::CorruptArchive {
        archive: label.to_string(),
        source,
    };

    // Open the archive before touching the destination so a bad upload leaves it alone.
    let mut archive = ZipArchive::new(reader).map_err(corrupt)?;

    if destination.exists() {
        debug!("Removing stale working tree {}", destination.display());
        fs::remove_dir_all(destination).map_err(|e| Error::io(destination, e))?;
    }
    fs::create_dir_all(destination).map_err(|e| Error::io(destination, e))?;

    let mut report = ExtractReport::default();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(corrupt)?;
        let relative = entry.enclosed_name().ok_or_else(|| Error::UnsafeEntry {
            name: entry.name().to_string(),
        })?;
        let target = destination.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            report.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let mut out = File::create(&target).map_err(|e| Error::io(&target, e))?;
        let written = io::copy(&mut entry, &mut out).map_err(|e| Error::io(&target, e))?;

        debug!("Extracted {} ({} bytes)", relative.display(), written);
        report.files += 1;
        report.total_bytes += written;
    }

    info!(
        "Extracted {} files ({} bytes) into {}",
        report.files,
        report.total_bytes,
        destination.display()
    );
    Ok(report)
}
