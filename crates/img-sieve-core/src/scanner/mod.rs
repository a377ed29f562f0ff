mod walk;

pub use walk::{walk_files, TreeFile, WalkFilter};
