//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for enumerating every regular
//! file beneath a root directory. Children are sorted by file name, so the
//! order is stable for an unchanged tree and repeated scans print the same
//! output.
//!
//! # Failure policy
//!
//! - The root itself must exist and be readable. [`Walker::collect_files`]
//!   checks it before walking and returns the error, aborting the scan.
//! - Anything below the root that cannot be read (an unreadable
//!   subdirectory, a vanished entry, a symlink loop) is logged and yielded
//!   as a [`ScanError`]; the walk continues with the remaining entries.
//!
//! # Example
//!
//! ```no_run
//! use hashdupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::ScanError;

/// Configuration for directory walking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Symlink cycles are reported as errors by walkdir.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: Option<u64>,

    /// Maximum file size to include (in bytes).
    pub max_size: Option<u64>,
}

impl WalkerConfig {
    /// Set whether symbolic links are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set whether hidden entries are skipped.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Set the minimum file size.
    #[must_use]
    pub fn with_min_size(mut self, size: Option<u64>) -> Self {
        self.min_size = size;
        self
    }

    /// Set the maximum file size.
    #[must_use]
    pub fn with_max_size(mut self, size: Option<u64>) -> Self {
        self.max_size = size;
        self
    }

    fn has_size_filter(&self) -> bool {
        self.min_size.is_some() || self.max_size.is_some()
    }
}

/// Result of a complete walk.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Regular files in traversal order
    pub files: Vec<PathBuf>,
    /// Entries below the root that could not be read
    pub errors: Vec<ScanError>,
}

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Verify that the root exists and, if it is a directory, can be listed.
    ///
    /// # Errors
    ///
    /// Returns the [`ScanError`] describing why the root is unusable.
    pub fn check_root(&self) -> Result<(), ScanError> {
        let metadata = std::fs::metadata(&self.root)
            .map_err(|e| ScanError::from_io(self.root.clone(), e))?;

        if metadata.is_dir() {
            std::fs::read_dir(&self.root).map_err(|e| ScanError::from_io(self.root.clone(), e))?;
        }
        Ok(())
    }

    /// Walk the directory tree, yielding regular file paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. The root is not validated here; use
    /// [`collect_files`](Self::collect_files) for the fail-fast variant.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let skip_hidden = self.config.skip_hidden;

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && is_hidden(entry)))
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(entry),
                Err(e) => Some(Err(self.handle_walkdir_error(e))),
            })
    }

    /// Walk the whole tree after validating the root.
    ///
    /// # Errors
    ///
    /// Fails only when the root cannot be read. Errors below the root are
    /// returned in [`WalkOutcome::errors`].
    pub fn collect_files(&self) -> Result<WalkOutcome, ScanError> {
        self.check_root()?;

        let mut outcome = WalkOutcome::default();
        for result in self.walk() {
            match result {
                Ok(path) => outcome.files.push(path),
                Err(e) => outcome.errors.push(e),
            }
        }

        log::debug!(
            "Walked {}: {} files, {} errors",
            self.root.display(),
            outcome.files.len(),
            outcome.errors.len()
        );
        Ok(outcome)
    }

    /// Turn a walkdir entry into a file path if it is a regular file that
    /// passes the configured filters.
    ///
    /// Without `follow_symlinks`, a symlink to a regular file is yielded
    /// under the link's own path; symlinks to directories are not entered.
    fn process_entry(&self, entry: DirEntry) -> Option<Result<PathBuf, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }

        // With follow_links the entry already reports the target's type
        let target = if file_type.is_symlink() {
            match std::fs::metadata(entry.path()) {
                Ok(m) if m.is_file() => Some(m),
                Ok(m) if m.is_dir() => {
                    log::debug!(
                        "Not descending into directory symlink: {}",
                        entry.path().display()
                    );
                    return None;
                }
                Ok(_) => {
                    log::trace!("Skipping symlink to special file: {}", entry.path().display());
                    return None;
                }
                Err(e) => {
                    let err = ScanError::from_io(entry.into_path(), e);
                    log::warn!("Broken symlink: {}", err);
                    return Some(Err(err));
                }
            }
        } else if file_type.is_file() {
            None
        } else {
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        };

        if self.config.has_size_filter() {
            let size = match target {
                Some(m) => m.len(),
                None => match entry.metadata() {
                    Ok(m) => m.len(),
                    Err(e) => return Some(Err(self.handle_walkdir_error(e))),
                },
            };
            if !self.passes_size_filter(size) {
                log::trace!(
                    "Skipping file due to size filter ({}): {}",
                    size,
                    entry.path().display()
                );
                return None;
            }
        }

        Some(Ok(entry.into_path()))
    }

    /// Check if a file passes size filters.
    fn passes_size_filter(&self, size: u64) -> bool {
        if let Some(min) = self.config.min_size {
            if size < min {
                return false;
            }
        }
        if let Some(max) = self.config.max_size {
            if size > max {
                return false;
            }
        }
        true
    }

    /// Convert a walkdir error into a [`ScanError`], logging it.
    fn handle_walkdir_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if error.loop_ancestor().is_some() {
            log::warn!("Symlink loop detected: {}", path.display());
            return ScanError::SymlinkLoop(path);
        }

        let err = match error.into_io_error() {
            Some(io) => ScanError::from_io(path, io),
            None => ScanError::Io {
                source: std::io::Error::other("directory walk failed"),
                path,
            },
        };
        log::warn!("Walker error: {}", err);
        err
    }
}

/// Entries below the root whose name starts with `.`.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().as_encoded_bytes().starts_with(b".")
}
