//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Selecting a digest algorithm (MD5, SHA-256, SHA-512)
//! - Sorted, single-threaded directory walking using walkdir
//! - Streaming content hashing in bounded chunks
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`algorithm`]: Hash algorithm selection and streaming accumulators
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Per-file digest computation
//!
//! # Example
//!
//! ```no_run
//! use hashdupe::scanner::{HashAlgorithm, Hasher, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let outcome = walker.collect_files().expect("root must be readable");
//!
//! let hasher = Hasher::new(HashAlgorithm::Sha256);
//! for path in &outcome.files {
//!     match hasher.digest_file(path) {
//!         Ok(file) => println!("{} {}", file.digest, path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod algorithm;
pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use algorithm::{ContentHasher, HashAlgorithm, UnsupportedAlgorithm};
pub use hasher::{FileDigest, Hasher, CHUNK_SIZE};
pub use walker::{WalkOutcome, Walker, WalkerConfig};

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A symlink cycle was detected while following links.
    #[error("Symlink loop detected at {0}")]
    SymlinkLoop(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Build a `ScanError` from an I/O error, keeping the common kinds distinct.
    #[must_use]
    pub fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(path) | Self::NotFound(path) | Self::SymlinkLoop(path) => path,
            Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file could not be opened (deleted, permission denied, ...).
    #[error("Cannot open {path}: {source}")]
    Open {
        /// Path of the file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading failed after the file was opened.
    #[error("Read failed for {path}: {source}")]
    Read {
        /// Path of the file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file size could not be retrieved after reading.
    #[error("Cannot stat {path}: {source}")]
    Metadata {
        /// Path of the file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Hashing stopped because shutdown was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),
}

impl HashError {
    /// Whether the run can continue by skipping this file.
    ///
    /// Only open failures are recoverable on their own; read and stat
    /// failures depend on the configured [`ReadErrorPolicy`].
    ///
    /// [`ReadErrorPolicy`]: crate::duplicates::ReadErrorPolicy
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } | Self::Metadata { path, .. } => {
                path
            }
            Self::Interrupted(path) => path,
        }
    }
}
