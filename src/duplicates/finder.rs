//! Duplicate finder: walk, hash, index.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives the whole pipeline for one root:
//! 1. **Walk** - collect every regular file below the root (fails fast if
//!    the root itself is unreadable)
//! 2. **Hash** - stream each file through the selected algorithm
//! 3. **Index** - fold each `(digest, path, size)` into a [`DuplicateIndex`]
//!
//! With `jobs > 1` step 2 runs on a dedicated rayon pool. Results are
//! collected in walk order and inserted on the calling thread after every
//! worker has finished, so the index is built exactly as in a sequential
//! run.
//!
//! # Example
//!
//! ```no_run
//! use hashdupe::duplicates::{DuplicateFinder, FinderConfig, Report};
//! use hashdupe::scanner::HashAlgorithm;
//! use std::path::Path;
//!
//! let config = FinderConfig::default().with_algorithm(HashAlgorithm::Sha512);
//! let finder = DuplicateFinder::new(config);
//!
//! let (index, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//! let report = Report::summarize(&index);
//! println!("{} duplicate sets in {} files", report.duplicate_sets, summary.files_hashed);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::groups::DuplicateIndex;
use crate::progress::ProgressCallback;
use crate::scanner::{
    FileDigest, HashAlgorithm, HashError, Hasher, ScanError, UnsupportedAlgorithm, Walker,
    WalkerConfig,
};

/// What to do when a file fails after it was opened.
///
/// Open failures are always skipped. Read and stat failures on an open file
/// abort the run by default.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    /// Abort the whole scan
    #[default]
    Abort,
    /// Skip the file and keep going
    Skip,
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Digest algorithm applied to every file.
    pub algorithm: HashAlgorithm,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Number of hashing threads. 1 hashes files one after another.
    pub jobs: usize,
    /// Handling of read/stat failures on opened files.
    pub read_errors: ReadErrorPolicy,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("algorithm", &self.algorithm)
            .field("walker_config", &self.walker_config)
            .field("jobs", &self.jobs)
            .field("read_errors", &self.read_errors)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            walker_config: WalkerConfig::default(),
            jobs: 1,
            read_errors: ReadErrorPolicy::default(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the number of hashing threads (at least 1).
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Set the read error policy.
    #[must_use]
    pub fn with_read_errors(mut self, policy: ReadErrorPolicy) -> Self {
        self.read_errors = policy;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Statistics from a completed scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Algorithm used for every digest
    pub algorithm: HashAlgorithm,
    /// Regular files found by the walk
    pub files_found: usize,
    /// Files successfully hashed and indexed
    pub files_hashed: usize,
    /// Files skipped because of recoverable errors
    pub files_skipped: usize,
    /// Total size of the hashed files
    pub bytes_hashed: u64,
    /// Entries below the root that the walk could not read
    pub walk_errors: Vec<ScanError>,
    /// Errors for the skipped files
    pub skipped: Vec<HashError>,
    /// Duration of the entire scan
    pub duration: Duration,
}

impl ScanSummary {
    /// Whether anything was skipped or unreadable during the scan.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.walk_errors.is_empty() || !self.skipped.is_empty()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The requested algorithm name is unknown.
    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithm),

    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The root could not be walked.
    #[error("Cannot scan root: {0}")]
    Walk(#[from] ScanError),

    /// A file failed while being read.
    #[error(transparent)]
    Hash(HashError),

    /// The hashing thread pool could not be created.
    #[error("Failed to start hashing threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Outcome for one file that did not abort the scan.
type FileOutcome = Result<FileDigest, HashError>;

/// Duplicate finder that runs the walk → hash → index pipeline.
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new(config.algorithm);
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Build the digest index for every file below `root`.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The root cannot be read
    /// - A file fails mid-read and the policy is [`ReadErrorPolicy::Abort`]
    /// - The scan is interrupted by shutdown signal
    ///
    /// Files that cannot be opened are skipped and listed in
    /// [`ScanSummary::skipped`].
    pub fn find_duplicates(
        &self,
        root: &Path,
    ) -> Result<(DuplicateIndex, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary {
            algorithm: self.config.algorithm,
            ..ScanSummary::default()
        };

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        log::info!(
            "Starting duplicate scan of {} ({})",
            root.display(),
            self.config.algorithm
        );

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }
        let outcome = walker.collect_files()?;

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        summary.files_found = outcome.files.len();
        summary.walk_errors = outcome.errors;
        log::info!("Found {} files", summary.files_found);

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_walk_complete(summary.files_found);
        }

        let mut index = DuplicateIndex::new();

        if self.config.jobs <= 1 {
            for path in outcome.files {
                let result = self.hash_file(&path)?;
                Self::record(&mut index, &mut summary, path, result);
            }
        } else {
            let results = self.hash_parallel(&outcome.files)?;
            for (path, result) in outcome.files.into_iter().zip(results) {
                Self::record(&mut index, &mut summary, path, result);
            }
        }

        summary.duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files hashed, {} skipped, {} distinct digests",
            summary.files_hashed,
            summary.files_skipped,
            index.len()
        );

        Ok((index, summary))
    }

    /// Hash every file on a pool of `jobs` threads, keeping input order.
    fn hash_parallel(&self, files: &[PathBuf]) -> Result<Vec<FileOutcome>, FinderError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()?;

        log::debug!("Hashing on {} threads", self.config.jobs);
        pool.install(|| files.par_iter().map(|path| self.hash_file(path)).collect())
    }

    /// Hash one file, classifying failures.
    ///
    /// `Ok(Err(_))` is a skipped file; `Err(_)` aborts the scan.
    fn hash_file(&self, path: &Path) -> Result<FileOutcome, FinderError> {
        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let callback = self.config.progress_callback.as_deref();
        if let Some(cb) = callback {
            cb.on_file_start(path);
        }

        match self.hasher.digest_file(path) {
            Ok(digest) => {
                if let Some(cb) = callback {
                    cb.on_file_hashed(path, &digest);
                }
                Ok(Ok(digest))
            }
            Err(HashError::Interrupted(_)) => Err(FinderError::Interrupted),
            Err(e) if self.is_skippable(&e) => {
                log::warn!("Skipping file: {}", e);
                if let Some(cb) = callback {
                    cb.on_file_skipped(path, &e);
                }
                Ok(Err(e))
            }
            Err(e) => {
                log::error!("Aborting scan: {}", e);
                Err(FinderError::Hash(e))
            }
        }
    }

    fn is_skippable(&self, error: &HashError) -> bool {
        match error {
            HashError::Interrupted(_) => false,
            e => e.is_recoverable() || self.config.read_errors == ReadErrorPolicy::Skip,
        }
    }

    fn record(
        index: &mut DuplicateIndex,
        summary: &mut ScanSummary,
        path: PathBuf,
        result: FileOutcome,
    ) {
        match result {
            Ok(file) => {
                summary.files_hashed += 1;
                summary.bytes_hashed += file.size;
                index.insert(file.digest, path, file.size);
            }
            Err(e) => {
                summary.files_skipped += 1;
                summary.skipped.push(e);
            }
        }
    }
}

/// Build the index for `root` using the algorithm named `algorithm`.
///
/// The name is resolved before anything touches the filesystem; an unknown
/// name fails with [`FinderError::UnsupportedAlgorithm`].
///
/// # Errors
///
/// See [`DuplicateFinder::find_duplicates`].
pub fn build_index(
    root: &Path,
    algorithm: &str,
) -> Result<(DuplicateIndex, ScanSummary), FinderError> {
    let algorithm: HashAlgorithm = algorithm.parse()?;
    DuplicateFinder::new(FinderConfig::default().with_algorithm(algorithm)).find_duplicates(root)
}
