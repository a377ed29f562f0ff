use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path};

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub files: usize,
    pub total_bytes: u64,
}

/// Write every file under `root` into a deflated zip at `output`.
/// Entry names are the paths relative to `root`, joined with `/`.
pub fn build_archive(root: &Path, output: &Path) -> Result<BuildReport> {
    let write_err = |source: ZipError| Error::ArchiveWrite {
        path: output.to_path_buf(),
        source,
    };

    let file = File::create(output).map_err(|e| write_err(ZipError::Io(e)))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut report = BuildReport::default();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.path() == output {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let name = entry_name(relative);

        let data = fs::read(entry.path()).map_err(|e| Error::io(entry.path(), e))?;
        zip.start_file(name.as_str(), options).map_err(write_err)?;
        zip.write_all(&data).map_err(|e| Error::io(output, e))?;

        debug!("Archived {} ({} bytes)", name, data.len());
        report.files += 1;
        report.total_bytes += data.len() as u64;
    }

    zip.finish().map_err(write_err)?;

    info!("Wrote {} files to {}", report.files, output.display());
    Ok(report)
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let relative: std::path::PathBuf = ["50x50", "sub", "a.png"].iter().collect();
        assert_eq!(entry_name(&relative), "50x50/sub/a.png");
    }
}
