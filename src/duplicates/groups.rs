//! Digest-keyed file grouping.
//!
//! # Overview
//!
//! [`DuplicateIndex`] maps a hex digest to the [`FileGroup`] of every path
//! whose content produced that digest. Files are folded in one at a time;
//! groups are created on first sight of a digest and only ever grow.
//!
//! The index is ordered by digest, so iterating it (and any report built
//! from it) gives the same order on every run.
//!
//! # Example
//!
//! ```
//! use hashdupe::duplicates::DuplicateIndex;
//! use std::path::PathBuf;
//!
//! let mut index = DuplicateIndex::new();
//! index.insert("aa".to_string(), PathBuf::from("/a.txt"), 5);
//! index.insert("aa".to_string(), PathBuf::from("/b.txt"), 5);
//! index.insert("bb".to_string(), PathBuf::from("/c.txt"), 5);
//!
//! assert_eq!(index.len(), 2);
//! assert_eq!(index.total_files(), 3);
//! assert_eq!(index.groups_with_duplicates().count(), 1);
//! ```

use std::collections::btree_map::{self, BTreeMap};
use std::path::PathBuf;

use serde::Serialize;

/// All files that share one content digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileGroup {
    /// Paths in discovery order; never empty
    pub filenames: Vec<PathBuf>,
    /// Size of the first member, in bytes
    pub size: u64,
}

impl FileGroup {
    /// Create a group holding a single file.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            filenames: vec![path],
            size,
        }
    }

    /// Append another file with the same digest.
    pub fn add(&mut self, path: PathBuf) {
        self.filenames.push(path);
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    /// Always `false`; a group is created with one member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }

    /// Check if this group has duplicates (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.filenames.len() > 1
    }

    /// Number of copies beyond the first.
    #[must_use]
    pub fn redundant_copies(&self) -> usize {
        self.filenames.len().saturating_sub(1)
    }

    /// Bytes taken by the redundant copies.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.redundant_copies() as u64
    }
}

/// Mapping from hex digest to the group of files with that digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DuplicateIndex {
    groups: BTreeMap<String, FileGroup>,
}

impl DuplicateIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file under its digest.
    ///
    /// The first insert for a digest fixes the group's size; later inserts
    /// only append the path and do not compare sizes.
    pub fn insert(&mut self, digest: String, path: PathBuf, size: u64) {
        match self.groups.entry(digest) {
            btree_map::Entry::Occupied(mut entry) => entry.get_mut().add(path),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(FileGroup::new(path, size));
            }
        }
    }

    /// Look up the group for a digest.
    #[must_use]
    pub fn get(&self, digest: &str) -> Option<&FileGroup> {
        self.groups.get(digest)
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no file has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of recorded files across all groups.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.groups.values().map(FileGroup::len).sum()
    }

    /// Iterate over `(digest, group)` pairs in digest order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileGroup)> {
        self.groups.iter().map(|(digest, group)| (digest.as_str(), group))
    }

    /// Iterate over the groups that have more than one member, in digest order.
    pub fn groups_with_duplicates(&self) -> impl Iterator<Item = (&str, &FileGroup)> {
        self.iter().filter(|(_, group)| group.has_duplicates())
    }
}
