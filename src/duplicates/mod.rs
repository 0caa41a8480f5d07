//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Running the walk → hash → index pipeline ([`finder`])
//! - Digest-keyed file grouping ([`groups`])
//! - Reducing a completed index to duplicate sets ([`report`])

pub mod finder;
pub mod groups;
pub mod report;

pub use finder::{
    build_index, DuplicateFinder, FinderConfig, FinderError, ReadErrorPolicy, ScanSummary,
};
pub use groups::{DuplicateIndex, FileGroup};
pub use report::{DuplicateSet, Report};
