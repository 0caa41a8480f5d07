//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "algorithm": "sha256",
//!   "duplicates": [
//!     {
//!       "digest": "2cf24d...",
//!       "size": 5,
//!       "files": ["./a.txt", "./b.txt"]
//!     }
//!   ],
//!   "unreadable": ["./locked.txt"],
//!   "summary": {
//!     "files_found": 3,
//!     "files_hashed": 3,
//!     "files_skipped": 1,
//!     "walk_errors": 0,
//!     "duplicate_sets": 1,
//!     "redundant_files": 1,
//!     "wasted_bytes": 5,
//!     "scan_duration_ms": 2,
//!     "exit_code": 3,
//!     "exit_code_name": "HD003"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{Report, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::{HashAlgorithm, HashError, ScanError};

/// A single duplicate set in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateSet {
    /// Hex digest shared by the set
    pub digest: String,
    /// Size of each file in bytes
    pub size: u64,
    /// Member paths as discovered
    pub files: Vec<String>,
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Regular files found by the walk
    pub files_found: usize,
    /// Files hashed and indexed
    pub files_hashed: usize,
    /// Files skipped because they could not be read
    pub files_skipped: usize,
    /// Entries the walk could not read
    pub walk_errors: usize,
    /// Number of duplicate sets
    pub duplicate_sets: usize,
    /// Copies beyond the first across all sets
    pub redundant_files: usize,
    /// Bytes held by redundant copies
    pub wasted_bytes: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "HD000")
    pub exit_code_name: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Algorithm used for the digests
    pub algorithm: HashAlgorithm,
    /// List of duplicate sets, sorted by digest
    pub duplicates: Vec<JsonDuplicateSet>,
    /// Entries the walk could not read, then files skipped while hashing
    pub unreadable: Vec<String>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from a report, summary and exit code.
    #[must_use]
    pub fn new(report: &Report, summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            algorithm: summary.algorithm,
            duplicates: report
                .sets
                .iter()
                .map(|set| JsonDuplicateSet {
                    digest: set.digest.clone(),
                    size: set.size,
                    files: set
                        .files
                        .iter()
                        .map(|p| p.to_string_lossy().into_owned())
                        .collect(),
                })
                .collect(),
            unreadable: summary
                .walk_errors
                .iter()
                .map(ScanError::path)
                .chain(summary.skipped.iter().map(HashError::path))
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            summary: JsonSummary {
                files_found: summary.files_found,
                files_hashed: summary.files_hashed,
                files_skipped: summary.files_skipped,
                walk_errors: summary.walk_errors.len(),
                duplicate_sets: report.duplicate_sets,
                redundant_files: report.redundant_files,
                wasted_bytes: report.wasted_bytes,
                scan_duration_ms: summary.duration.as_millis() as u64,
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        let json = self.to_json_pretty()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
