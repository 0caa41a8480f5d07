//! End-to-end tests of the walk → hash → index → report pipeline.

use hashdupe::duplicates::{
    build_index, DuplicateFinder, FinderConfig, Report, ReadErrorPolicy,
};
use hashdupe::progress::ProgressCallback;
use hashdupe::scanner::{FileDigest, HashAlgorithm, HashError, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

fn hello_world_tree() -> TempDir {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"hello");
    write_file(dir.path(), "b.txt", b"hello");
    write_file(dir.path(), "c.txt", b"world");
    dir
}

#[test]
fn test_hello_world_scenario() {
    let dir = hello_world_tree();

    let (index, summary) = build_index(dir.path(), "sha256").unwrap();
    let report = Report::summarize(&index);

    assert_eq!(summary.files_hashed, 3);
    assert_eq!(report.duplicate_sets, 1);
    assert_eq!(report.redundant_files, 1);
    assert_eq!(report.wasted_bytes, 5);

    let set = &report.sets[0];
    assert_eq!(set.digest, HELLO_SHA256);
    assert_eq!(set.size, 5);
    assert_eq!(
        set.files,
        vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
    );
    assert!(report
        .sets
        .iter()
        .all(|s| !s.files.contains(&dir.path().join("c.txt"))));
}

#[test]
fn test_empty_directory_reports_nothing() {
    let dir = tempdir().unwrap();

    let (index, summary) = build_index(dir.path(), "sha256").unwrap();
    let report = Report::summarize(&index);

    assert!(report.is_empty());
    assert_eq!(report.duplicate_sets, 0);
    assert_eq!(report.wasted_bytes, 0);
    assert_eq!(summary.files_found, 0);
}

#[test]
fn test_nested_directories_are_walked() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "top.bin", b"payload");
    write_file(dir.path(), "one/mid.bin", b"payload");
    write_file(dir.path(), "one/two/three/deep.bin", b"payload");
    write_file(dir.path(), "one/two/other.bin", b"other");

    let (index, _) = build_index(dir.path(), "sha512").unwrap();
    let report = Report::summarize(&index);

    assert_eq!(report.duplicate_sets, 1);
    assert_eq!(report.sets[0].files.len(), 3);
    assert_eq!(report.wasted_bytes, 7 * 2);
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = tempdir().unwrap();
    for i in 0..25 {
        write_file(
            dir.path(),
            &format!("d{}/f{}.txt", i % 4, i),
            format!("{}", i % 6).as_bytes(),
        );
    }

    let first = Report::summarize(&build_index(dir.path(), "md5").unwrap().0);
    let second = Report::summarize(&build_index(dir.path(), "md5").unwrap().0);

    assert_eq!(first, second);
    let digests: Vec<_> = first.sets.iter().map(|s| s.digest.clone()).collect();
    let mut sorted = digests.clone();
    sorted.sort();
    assert_eq!(digests, sorted);
}

#[test]
fn test_singletons_are_never_reported() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "x", b"1");
    write_file(dir.path(), "y", b"2");
    write_file(dir.path(), "z", b"3");

    let (index, _) = build_index(dir.path(), "sha256").unwrap();

    assert_eq!(index.len(), 3);
    assert!(Report::summarize(&index).is_empty());
}

#[test]
fn test_empty_files_form_a_zero_waste_set() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "empty1", b"");
    write_file(dir.path(), "empty2", b"");

    let report = Report::summarize(&build_index(dir.path(), "sha256").unwrap().0);

    assert_eq!(report.duplicate_sets, 1);
    assert_eq!(report.sets[0].size, 0);
    assert_eq!(report.wasted_bytes, 0);
}

#[test]
fn test_files_larger_than_one_chunk() {
    let dir = tempdir().unwrap();
    let big: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
    write_file(dir.path(), "big1", &big);
    write_file(dir.path(), "big2", &big);
    let mut changed = big.clone();
    changed[299_999] ^= 0xff;
    write_file(dir.path(), "big3", &changed);

    let report = Report::summarize(&build_index(dir.path(), "sha256").unwrap().0);

    assert_eq!(report.duplicate_sets, 1);
    assert_eq!(report.sets[0].files.len(), 2);
    assert_eq!(report.wasted_bytes, 300_000);
}

/// Deletes a file once the walk is over, before it gets opened.
struct DeleteAfterWalk {
    victim: PathBuf,
    skipped: Mutex<Vec<PathBuf>>,
}

impl ProgressCallback for DeleteAfterWalk {
    fn on_walk_complete(&self, _total: usize) {
        fs::remove_file(&self.victim).unwrap();
    }

    fn on_file_hashed(&self, _path: &Path, _digest: &FileDigest) {}

    fn on_file_skipped(&self, path: &Path, _error: &HashError) {
        self.skipped.lock().unwrap().push(path.to_path_buf());
    }
}

#[test]
fn test_file_deleted_after_enumeration_is_skipped() {
    let dir = hello_world_tree();
    let victim = write_file(dir.path(), "d.txt", b"hello");

    let callback = Arc::new(DeleteAfterWalk {
        victim: victim.clone(),
        skipped: Mutex::new(Vec::new()),
    });
    let config = FinderConfig::default().with_progress_callback(callback.clone());
    let (index, summary) = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(summary.files_found, 4);
    assert_eq!(summary.files_hashed, 3);
    assert_eq!(summary.files_skipped, 1);
    assert!(matches!(summary.skipped[0], HashError::Open { .. }));
    assert_eq!(*callback.skipped.lock().unwrap(), vec![victim]);

    let report = Report::summarize(&index);
    assert_eq!(report.duplicate_sets, 1);
    assert_eq!(report.sets[0].files.len(), 2);
}

#[test]
fn test_parallel_scan_matches_sequential_report() {
    let dir = tempdir().unwrap();
    for i in 0..60 {
        write_file(
            dir.path(),
            &format!("p{}/file{:03}", i % 5, i),
            format!("content-{}", i % 9).as_bytes(),
        );
    }

    let sequential = DuplicateFinder::new(FinderConfig::default())
        .find_duplicates(dir.path())
        .unwrap()
        .0;
    let parallel = DuplicateFinder::new(
        FinderConfig::default()
            .with_jobs(8)
            .with_read_errors(ReadErrorPolicy::Skip),
    )
    .find_duplicates(dir.path())
    .unwrap()
    .0;

    assert_eq!(Report::summarize(&sequential), Report::summarize(&parallel));
}

#[test]
fn test_walker_filters_apply_to_the_scan() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "small1", b"ab");
    write_file(dir.path(), "small2", b"ab");
    write_file(dir.path(), "large1", &[7u8; 4096]);
    write_file(dir.path(), "large2", &[7u8; 4096]);
    write_file(dir.path(), ".hidden/large3", &[7u8; 4096]);

    let walker_config = WalkerConfig::default()
        .with_min_size(Some(1024))
        .with_skip_hidden(true);
    let config = FinderConfig::default()
        .with_algorithm(HashAlgorithm::Md5)
        .with_walker_config(walker_config);
    let (index, _) = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();
    let report = Report::summarize(&index);

    assert_eq!(report.duplicate_sets, 1);
    assert_eq!(
        report.sets[0].files,
        vec![dir.path().join("large1"), dir.path().join("large2")]
    );
}

#[test]
#[cfg(unix)]
fn test_file_symlink_groups_with_its_target() {
    let dir = tempdir().unwrap();
    let target = write_file(dir.path(), "a.txt", b"hello");
    let link = dir.path().join("link.txt");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let (index, summary) = build_index(dir.path(), "sha256").unwrap();
    let report = Report::summarize(&index);

    assert_eq!(summary.files_found, 2);
    assert!(summary.walk_errors.is_empty());
    assert_eq!(report.duplicate_sets, 1);
    assert_eq!(report.sets[0].digest, HELLO_SHA256);
    assert_eq!(report.sets[0].files, vec![target, link]);
}
