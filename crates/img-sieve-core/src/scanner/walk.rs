use glob::Pattern;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// A regular file found under the working tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    pub path: PathBuf,
    /// Path relative to the tree root.
    pub relative: PathBuf,
    pub file_name: String,
    /// File name with its last extension stripped.
    pub stem: String,
}

impl TreeFile {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            relative,
            file_name,
            stem,
        }
    }

    /// Relative path with `/` separators and the extension stripped, e.g. `100x200/sub/img1`.
    pub fn relative_identity(&self) -> String {
        let mut parts = self.folders();
        parts.push(self.stem.clone());
        parts.join("/")
    }

    /// First folder below the root. `None` for files sitting directly in the root.
    pub fn first_segment(&self) -> Option<String> {
        self.folders().into_iter().next()
    }

    /// Folder directly containing the file. `None` for files sitting directly in the root.
    pub fn parent_name(&self) -> Option<String> {
        self.folders().pop()
    }

    fn folders(&self) -> Vec<String> {
        let mut parts: Vec<String> = self
            .relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        parts.pop();
        parts
    }
}

/// Glob patterns excluding files from reconciliation, size checks and deletion.
#[derive(Debug, Clone, Default)]
pub struct WalkFilter {
    patterns: Vec<Pattern>,
}

impl WalkFilter {
    pub fn new(globs: &[String]) -> Self {
        let patterns = globs
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Patterns apply to the path relative to the tree root, never to where the tree lives.
    pub fn is_ignored(&self, file: &TreeFile) -> bool {
        self.patterns.iter().any(|p| p.matches_path(&file.relative))
    }
}

/// Collect every regular file under `root`, in file-name order at each level.
/// Symlinks are not followed.
pub fn walk_files(root: &Path, filter: &WalkFilter) -> Result<Vec<TreeFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file = TreeFile::new(root, entry.into_path());
        if filter.is_ignored(&file) {
            debug!("Ignoring {}", file.relative.display());
            continue;
        }
        files.push(file);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_tree_file_segments() {
        let root = Path::new("/work/tree");
        let nested = TreeFile::new(root, root.join("100x200/sub/img1.png"));
        assert_eq!(nested.file_name, "img1.png");
        assert_eq!(nested.stem, "img1");
        assert_eq!(nested.first_segment().as_deref(), Some("100x200"));
        assert_eq!(nested.parent_name().as_deref(), Some("sub"));
        assert_eq!(nested.relative_identity(), "100x200/sub/img1");

        let top = TreeFile::new(root, root.join("loose.jpg"));
        assert_eq!(top.first_segment(), None);
        assert_eq!(top.parent_name(), None);
        assert_eq!(top.relative_identity(), "loose");
    }

    #[test]
    fn test_stem_strips_last_extension_only() {
        let root = Path::new("/r");
        assert_eq!(TreeFile::new(root, root.join("a.tar.gz")).stem, "a.tar");
        assert_eq!(TreeFile::new(root, root.join(".hidden")).stem, ".hidden");
        assert_eq!(TreeFile::new(root, root.join("noext")).stem, "noext");
    }

    #[test]
    fn test_walk_files_sorted_and_filtered() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("__MACOSX/a")).unwrap();
        fs::write(root.join("b/2.png"), b"x").unwrap();
        fs::write(root.join("b/1.png"), b"x").unwrap();
        fs::write(root.join("a/3.png"), b"x").unwrap();
        fs::write(root.join("__MACOSX/a/._3.png"), b"x").unwrap();

        let filter = WalkFilter::new(&["**/__MACOSX/**".to_string()]);
        let files = walk_files(root, &filter).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.relative_identity()).collect();
        assert_eq!(names, vec!["a/3", "b/1", "b/2"]);

        let all = walk_files(root, &WalkFilter::default()).unwrap();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_patterns_ignore_the_root_location() {
        let root = Path::new("/var/tmp/img-sieve-abc/tree");
        let file = TreeFile::new(root, root.join("10x10/a.png"));
        for glob in ["**/tree/**", "/var/**", "**/img-sieve-*/**"] {
            assert!(!WalkFilter::new(&[glob.to_string()]).is_ignored(&file), "{glob}");
        }
        assert!(WalkFilter::new(&["10x10/*".to_string()]).is_ignored(&file));
    }

    #[test]
    fn test_invalid_glob_is_skipped() {
        let filter = WalkFilter::new(&["[".to_string()]);
        let file = TreeFile::new(Path::new("/r"), PathBuf::from("/r/x.png"));
        assert!(!filter.is_ignored(&file));
    }
}
