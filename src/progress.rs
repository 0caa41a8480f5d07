//! Per-file progress reporting.
//!
//! The finder calls a [`ProgressCallback`] as it works through the file
//! list. [`ConsoleProgress`] is the implementation used by the CLI: it
//! prints each file's path followed by its digest. Skipped files get their
//! path and no digest.
//!
//! Callbacks may be invoked from several threads when hashing runs in
//! parallel, so implementations must be `Send + Sync`.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::scanner::{FileDigest, HashError};

/// Progress callback for the duplicate finding pipeline.
pub trait ProgressCallback: Send + Sync {
    /// Called once the walk finished, with the number of files to hash.
    fn on_walk_complete(&self, _total: usize) {}

    /// Called before a file is opened.
    fn on_file_start(&self, _path: &Path) {}

    /// Called after a file's digest was computed.
    fn on_file_hashed(&self, path: &Path, digest: &FileDigest);

    /// Called when a file is skipped because of a recoverable error.
    fn on_file_skipped(&self, _path: &Path, _error: &HashError) {}
}

/// Prints `path`, `digest` and a blank line for every hashed file.
///
/// By default both lines are written under one lock once the digest is
/// known, so that parallel hashing never splits a path from its digest.
/// With [`with_paths_first`](Self::with_paths_first) the path goes out as
/// soon as the file is opened, which shows the file being hashed when a
/// long read is in progress or fails.
pub struct ConsoleProgress<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
    paths_first: bool,
}

impl ConsoleProgress<io::Stdout> {
    /// Progress printer writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleProgress<W> {
    /// Progress printer writing to the given writer.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            paths_first: false,
        }
    }

    /// Print each path before its file is read.
    ///
    /// Only meaningful when files are hashed one at a time.
    #[must_use]
    pub fn with_paths_first(mut self, paths_first: bool) -> Self {
        self.paths_first = paths_first;
        self
    }

    /// Take back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_locked(&self, f: impl FnOnce(&mut W) -> io::Result<()>) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = f(&mut out) {
            log::debug!("Failed to write progress: {}", e);
        }
    }
}

impl<W: Write + Send> ProgressCallback for ConsoleProgress<W> {
    fn on_walk_complete(&self, total: usize) {
        self.write_locked(|out| writeln!(out, "Analysing {} files...", total));
    }

    fn on_file_start(&self, path: &Path) {
        if self.paths_first {
            self.write_locked(|out| {
                writeln!(out, "{}", path.display())?;
                out.flush()
            });
        } else {
            log::trace!("Hashing {}", path.display());
        }
    }

    fn on_file_hashed(&self, path: &Path, digest: &FileDigest) {
        self.write_locked(|out| {
            if !self.paths_first {
                writeln!(out, "{}", path.display())?;
            }
            writeln!(out, "{}", digest.digest)?;
            writeln!(out)
        });
    }

    fn on_file_skipped(&self, path: &Path, _error: &HashError) {
        self.write_locked(|out| {
            if !self.paths_first {
                writeln!(out, "{}", path.display())?;
            }
            writeln!(out)
        });
    }
}
