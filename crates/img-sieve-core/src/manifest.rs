use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::scanner::TreeFile;

/// Identifiers (file names without extension) that should survive a cleanup.
///
/// Built once from the manifest text and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetainSet {
    names: BTreeSet<String>,
}

impl RetainSet {
    /// One identifier per line. Lines are trimmed, blank lines dropped, duplicates collapse.
    pub fn parse(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let set = Self::parse(&String::from_utf8_lossy(&bytes));
        debug!("Loaded {} identifiers from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.names.contains(identifier)
    }

    /// Identifiers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// A file is retained when its stripped name is listed, or when its stripped
    /// relative path (`folder/name`) is listed.
    pub fn retains(&self, file: &TreeFile) -> bool {
        self.contains(&file.stem) || self.contains(&file.relative_identity())
    }
}

impl FromIterator<String> for RetainSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_drops_blank_lines() {
        let set = RetainSet::parse("  a  \n\n\tb\r\n   \nc");
        assert_eq!(set.len(), 3);
        assert!(set.contains("a"));
        assert!(set.contains("b"));
        assert!(set.contains("c"));
        assert!(!set.contains(""));
    }

    #[test]
    fn test_parse_collapses_duplicates() {
        let set = RetainSet::parse("img1\nimg1\n img1 \nimg2");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_parse_is_order_independent() {
        let a = RetainSet::parse("x\ny\nz");
        let b = RetainSet::parse("\n z\ny \n\nx\nx");
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_empty() {
        assert!(RetainSet::parse("").is_empty());
        assert!(RetainSet::parse("\n \n\t\n").is_empty());
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        match RetainSet::from_path(&dir.path().join("nope.txt")) {
            Err(Error::Io { path, .. }) => assert!(path.ends_with("nope.txt")),
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
