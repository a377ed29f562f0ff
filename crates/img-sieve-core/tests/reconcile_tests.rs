mod common;

use std::collections::BTreeSet;
use std::fs;

use img_sieve_core::analysis::reconcile::{reconcile, reconcile_files};
use img_sieve_core::cleaner::delete_unlisted;
use img_sieve_core::scanner::{walk_files, WalkFilter};
use img_sieve_core::{RetainSet, SilentReporter};
use tempfile::tempdir;

fn touch(root: &std::path::Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"x").unwrap();
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_set_difference_laws() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    for rel in ["10x10/a.png", "10x10/b.jpg", "20x20/a.png", "misc/c.gif", "d"] {
        touch(root, rel);
    }
    let files = walk_files(root, &WalkFilter::default()).unwrap();

    for manifest in ["", "a", "a\nb\nc\nd", "x\ny", "a\nzz\n\n d \n"] {
        let retain = RetainSet::parse(manifest);
        let report = reconcile_files(&files, &retain);
        let retained: BTreeSet<String> = retain.iter().map(str::to_string).collect();

        assert_eq!(report.found, set(&["a", "b", "c", "d"]));
        assert!(report.extra.is_disjoint(&retained));
        let in_both: BTreeSet<_> = report.found.intersection(&retained).cloned().collect();
        let union: BTreeSet<_> = report.extra.union(&in_both).cloned().collect();
        assert_eq!(union, report.found, "manifest {manifest:?}");

        assert!(report.missing.is_disjoint(&report.found));
        let union: BTreeSet<_> = report.missing.union(&in_both).cloned().collect();
        assert_eq!(union, retained, "manifest {manifest:?}");
    }
}

#[test]
fn test_duplicate_names_across_folders_collapse() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    touch(root, "10x10/img1.png");
    touch(root, "20x20/img1.png");

    let report = reconcile(root, &RetainSet::parse("img1\nimg2"), &WalkFilter::default()).unwrap();
    assert_eq!(report.found, set(&["img1"]));
    assert!(report.extra.is_empty());
    assert_eq!(report.missing, set(&["img2"]));
}

#[test]
fn test_path_qualified_entries() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    touch(root, "10x10/img1.png");
    touch(root, "20x20/img1.png");

    let retain = RetainSet::parse("10x10/img1\n30x30/img1");
    let report = reconcile(root, &retain, &WalkFilter::default()).unwrap();
    assert_eq!(report.extra, set(&["img1"]));
    assert_eq!(report.missing, set(&["30x30/img1"]));

    let deleted = delete_unlisted(root, &retain, &WalkFilter::default(), &SilentReporter).unwrap();
    assert_eq!(deleted, vec!["img1.png".to_string()]);
    assert!(root.join("10x10/img1.png").exists());
    assert!(!root.join("20x20/img1.png").exists());
}

#[test]
fn test_ignored_files_are_neither_found_nor_deleted() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    touch(root, "10x10/a.png");
    touch(root, "__MACOSX/10x10/._a.png");

    let filter = WalkFilter::new(&["**/__MACOSX/**".to_string()]);
    let retain = RetainSet::parse("a");
    let report = reconcile(root, &retain, &filter).unwrap();
    assert_eq!(report.found, set(&["a"]));
    assert!(report.extra.is_empty());

    let deleted = delete_unlisted(root, &retain, &filter, &SilentReporter).unwrap();
    assert!(deleted.is_empty());
    assert!(root.join("__MACOSX/10x10/._a.png").exists());
}

#[test]
fn test_reconcile_is_read_only() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    touch(root, "a.png");
    touch(root, "b.png");

    reconcile(root, &RetainSet::default(), &WalkFilter::default()).unwrap();
    assert_eq!(common::count_files_recursive(root), 2);
}

#[test]
fn test_ignore_patterns_do_not_see_the_root_location() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("tree");
    touch(&root, "10x10/stray.png");

    let filter = WalkFilter::new(&["**/tree/**".to_string()]);
    let report = reconcile(&root, &RetainSet::default(), &filter).unwrap();
    assert_eq!(report.extra, set(&["stray"]));

    let deleted = delete_unlisted(&root, &RetainSet::default(), &filter, &SilentReporter).unwrap();
    assert_eq!(deleted, vec!["stray.png".to_string()]);
    assert!(!root.join("10x10/stray.png").exists());
}
