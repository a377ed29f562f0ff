//! Zip extraction into the working tree and repackaging of whatever survives.

mod build;
mod extract;

pub use build::{build_archive, BuildReport};
pub use extract::{extract_archive, extract_from_reader, ExtractReport};
