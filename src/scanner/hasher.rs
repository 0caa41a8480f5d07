//! Streaming file hasher.
//!
//! # Overview
//!
//! [`Hasher`] computes the digest of a file by reading it in bounded chunks
//! ([`CHUNK_SIZE`] by default), so memory use does not depend on file size.
//! The size reported alongside the digest comes from a metadata query on
//! the open handle, taken after the last chunk was read.
//!
//! Failures are split by phase: [`HashError::Open`] means the file could not
//! be opened and is safe to skip, while [`HashError::Read`] and
//! [`HashError::Metadata`] happen on a file that was already open.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{HashAlgorithm, HashError};

/// Default read buffer size (64 KiB).
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Digest and size of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    /// Lowercase hexadecimal digest
    pub digest: String,
    /// File size in bytes, from metadata taken after reading
    pub size: u64,
}

/// Computes file digests with a fixed algorithm.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    chunk_size: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Hasher {
    /// Create a hasher for the given algorithm with the default chunk size.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            chunk_size: CHUNK_SIZE,
            shutdown_flag: None,
        }
    }

    /// Use a different read buffer size. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the shutdown flag, checked between chunks.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The algorithm used by this hasher.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The read buffer size.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash a file's full content.
    ///
    /// The file handle is dropped before returning on every path.
    ///
    /// # Errors
    ///
    /// - [`HashError::Open`] if the file cannot be opened
    /// - [`HashError::Read`] if reading fails part way through
    /// - [`HashError::Metadata`] if the size cannot be retrieved afterwards
    /// - [`HashError::Interrupted`] if shutdown was requested mid-file
    pub fn digest_file(&self, path: &Path) -> Result<FileDigest, HashError> {
        let mut file = File::open(path).map_err(|source| HashError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let (digest, bytes_read) = self
            .digest_reader(&mut file)
            .map_err(|source| self.read_error(path, source))?;

        let size = file
            .metadata()
            .map_err(|source| HashError::Metadata {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        if size != bytes_read {
            log::debug!(
                "{} changed while hashing: read {} bytes, metadata reports {}",
                path.display(),
                bytes_read,
                size
            );
        }

        log::trace!("{} {}", digest, path.display());
        Ok(FileDigest { digest, size })
    }

    /// Stream a reader through a fresh accumulator.
    ///
    /// Returns the lowercase hex digest and the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than [`io::ErrorKind::Interrupted`],
    /// which is retried. A shutdown request surfaces as an error of that
    /// same kind so callers can tell it apart.
    pub fn digest_reader<R: Read>(&self, mut reader: R) -> io::Result<(String, u64)> {
        let mut hasher = self.algorithm.hasher();
        let mut buffer = vec![0u8; self.chunk_size];
        let mut total: u64 = 0;

        loop {
            if self.is_shutdown_requested() {
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "shutdown requested",
                ));
            }

            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..n]);
            total += n as u64;
        }

        Ok((hasher.finalize_hex(), total))
    }

    fn read_error(&self, path: &Path, source: io::Error) -> HashError {
        if source.kind() == io::ErrorKind::Interrupted && self.is_shutdown_requested() {
            HashError::Interrupted(path.to_path_buf())
        } else {
            HashError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

/// Convenience wrapper: hash one file with the given algorithm.
///
/// # Errors
///
/// See [`Hasher::digest_file`].
pub fn digest_file(
    path: impl AsRef<Path>,
    algorithm: HashAlgorithm,
) -> Result<FileDigest, HashError> {
    Hasher::new(algorithm).digest_file(path.as_ref())
}
