use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::archive::{self, ExtractReport};
use crate::error::{Error, Result};

const TREE_DIR: &str = "tree";

/// Scoped scratch directory owning one working tree.
///
/// The directory is created fresh per run and removed on drop, so two runs never
/// share extracted files.
pub struct Workspace {
    dir: TempDir,
    tree: PathBuf,
}

impl Workspace {
    /// Create under the system temp dir, or under `parent` when given.
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("img-sieve-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| Error::io(parent.unwrap_or_else(|| Path::new("<tmp>")), e))?;

        let tree = dir.path().join(TREE_DIR);
        debug!("Workspace created at {}", dir.path().display());
        Ok(Self { dir, tree })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Root of the extracted tree.
    pub fn tree(&self) -> &Path {
        &self.tree
    }

    /// Replace the working tree with the contents of `archive`.
    pub fn load_archive(&self, archive: &Path) -> Result<ExtractReport> {
        archive::extract_archive(archive, &self.tree)
    }

    /// Remove the workspace now and surface any error, instead of on drop.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| Error::io(path, e))
    }
}
