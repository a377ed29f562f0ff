use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::result::ZipError;

use crate::config::MAX_TOLERANCE;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Corrupt archive '{archive}': {source}")]
    CorruptArchive {
        archive: String,
        #[source]
        source: ZipError,
    },

    #[error("Archive entry '{name}' would escape the extraction root")]
    UnsafeEntry { name: String },

    #[error("Error writing archive {}: {source}", path.display())]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error walking directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Tolerance {0} is out of range (0..={max})", max = MAX_TOLERANCE)]
    InvalidTolerance(u32),
}

impl Error {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A non-fatal problem with a single file, e.g. an image that could not be decoded.
/// The file is left untouched and the walk carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub path: PathBuf,
    pub message: String,
}

impl Warning {
    pub fn new(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not open {}: {}", self.path.display(), self.message)
    }
}
