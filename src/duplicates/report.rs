//! Duplicate report construction.
//!
//! [`Report::summarize`] reduces a completed [`DuplicateIndex`] to the sets
//! that actually contain duplicates, plus the aggregate counts. It does no
//! formatting; see [`crate::output`] for that.

use std::path::PathBuf;

use serde::Serialize;

use super::groups::DuplicateIndex;

/// One set of byte-identical files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateSet {
    /// Hex digest shared by every member
    pub digest: String,
    /// Size of each member in bytes
    pub size: u64,
    /// Member paths in discovery order
    pub files: Vec<PathBuf>,
}

impl DuplicateSet {
    /// Copies beyond the first.
    #[must_use]
    pub fn redundant_copies(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes that removing the redundant copies would free.
    #[must_use]
    pub fn wasted_bytes(&self) -> u64 {
        self.size * self.redundant_copies() as u64
    }
}

/// Summary of all duplicate sets found in an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Duplicate sets, sorted by digest
    pub sets: Vec<DuplicateSet>,
    /// Number of duplicate sets
    pub duplicate_sets: usize,
    /// Number of redundant copies across all sets
    pub redundant_files: usize,
    /// Sum of `size * (members - 1)` over all sets
    pub wasted_bytes: u64,
}

impl Report {
    /// Build the report for a completed index.
    ///
    /// Groups with a single member are left out.
    #[must_use]
    pub fn summarize(index: &DuplicateIndex) -> Self {
        let sets: Vec<DuplicateSet> = index
            .groups_with_duplicates()
            .map(|(digest, group)| DuplicateSet {
                digest: digest.to_string(),
                size: group.size,
                files: group.filenames.clone(),
            })
            .collect();

        let redundant_files = sets.iter().map(DuplicateSet::redundant_copies).sum();
        let wasted_bytes = sets.iter().map(DuplicateSet::wasted_bytes).sum();

        Self {
            duplicate_sets: sets.len(),
            redundant_files,
            wasted_bytes,
            sets,
        }
    }

    /// Check if no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
