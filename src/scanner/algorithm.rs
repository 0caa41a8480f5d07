//! Hash algorithm selection.
//!
//! # Overview
//!
//! [`HashAlgorithm`] is the closed set of digest functions a scan can use.
//! One algorithm is selected per run and every file is hashed with it;
//! [`HashAlgorithm::hasher`] hands out a fresh [`ContentHasher`] for each file.
//!
//! # Example
//!
//! ```
//! use hashdupe::scanner::HashAlgorithm;
//!
//! let algorithm = HashAlgorithm::select("sha256").unwrap();
//! let mut hasher = algorithm.hasher();
//! hasher.update(b"hello");
//! assert_eq!(
//!     hasher.finalize_hex(),
//!     "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
//! );
//!
//! assert!(HashAlgorithm::select("crc32").is_none());
//! ```

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

/// Digest function applied to file contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5 (128-bit). Fast, but not collision resistant.
    Md5,
    /// SHA-256 (256-bit).
    #[default]
    Sha256,
    /// SHA-512 (512-bit).
    Sha512,
}

impl HashAlgorithm {
    /// All supported algorithms.
    pub const ALL: [HashAlgorithm; 3] = [Self::Md5, Self::Sha256, Self::Sha512];

    /// Look up an algorithm by name.
    ///
    /// Returns `None` for anything other than `md5`, `sha256` or `sha512`.
    #[must_use]
    pub fn select(name: &str) -> Option<Self> {
        match name {
            "md5" => Some(Self::Md5),
            "sha256" => Some(Self::Sha256),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Create a fresh, independent accumulator for this algorithm.
    #[must_use]
    pub fn hasher(self) -> ContentHasher {
        match self {
            Self::Md5 => ContentHasher::Md5(Md5::new()),
            Self::Sha256 => ContentHasher::Sha256(Sha256::new()),
            Self::Sha512 => ContentHasher::Sha512(Sha512::new()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Hash algorithm '{0}' is not supported (expected one of: md5, sha256, sha512)")]
pub struct UnsupportedAlgorithm(pub String);

impl FromStr for HashAlgorithm {
    type Err = UnsupportedAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::select(s).ok_or_else(|| UnsupportedAlgorithm(s.to_string()))
    }
}

/// Streaming digest accumulator.
///
/// Bytes are fed with [`update`](Self::update) in any number of chunks; the
/// digest is only available once, from [`finalize_hex`](Self::finalize_hex).
#[derive(Clone)]
pub enum ContentHasher {
    /// MD5 state
    Md5(Md5),
    /// SHA-256 state
    Sha256(Sha256),
    /// SHA-512 state
    Sha512(Sha512),
}

impl ContentHasher {
    /// Feed more bytes into the digest.
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
        }
    }

    /// The algorithm this accumulator computes.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Md5(_) => HashAlgorithm::Md5,
            Self::Sha256(_) => HashAlgorithm::Sha256,
            Self::Sha512(_) => HashAlgorithm::Sha512,
        }
    }

    /// Consume the accumulator and return the digest as lowercase hex.
    #[must_use]
    pub fn finalize_hex(self) -> String {
        match self {
            Self::Md5(h) => format!("{:x}", h.finalize()),
            Self::Sha256(h) => format!("{:x}", h.finalize()),
            Self::Sha512(h) => format!("{:x}", h.finalize()),
        }
    }
}

impl fmt::Debug for ContentHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentHasher")
            .field(&self.algorithm())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_of(algorithm: HashAlgorithm, data: &[u8]) -> String {
        let mut hasher = algorithm.hasher();
        hasher.update(data);
        hasher.finalize_hex()
    }

    #[test]
    fn test_select_known_names() {
        assert_eq!(HashAlgorithm::select("md5"), Some(HashAlgorithm::Md5));
        assert_eq!(HashAlgorithm::select("sha256"), Some(HashAlgorithm::Sha256));
        assert_eq!(HashAlgorithm::select("sha512"), Some(HashAlgorithm::Sha512));
    }

    #[test]
    fn test_select_unknown_names() {
        assert_eq!(HashAlgorithm::select("sha1"), None);
        assert_eq!(HashAlgorithm::select(""), None);
        assert_eq!(HashAlgorithm::select("SHA256"), None);
        assert_eq!(HashAlgorithm::select(" sha256"), None);
    }

    #[test]
    fn test_from_str_error_message() {
        let err = "blake3".parse::<HashAlgorithm>().unwrap_err();
        assert_eq!(err, UnsupportedAlgorithm("blake3".to_string()));
        assert!(err.to_string().contains("'blake3'"));
    }

    #[test]
    fn test_default_is_sha256() {
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha256);
    }

    #[test]
    fn test_name_round_trips_through_select() {
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(HashAlgorithm::select(algorithm.name()), Some(algorithm));
            assert_eq!(algorithm.to_string(), algorithm.name());
        }
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(
            digest_of(HashAlgorithm::Md5, b"hello"),
            "5d41402abc4b2a76b9719d911017c592"
        );
        assert_eq!(
            digest_of(HashAlgorithm::Sha256, b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest_of(HashAlgorithm::Sha512, b"abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_hex_length_matches_digest_len() {
        for algorithm in HashAlgorithm::ALL {
            let hex = digest_of(algorithm, b"some content");
            assert_eq!(hex.len(), algorithm.digest_len() * 2);
            assert!(hex
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_hashers_are_independent() {
        let mut a = HashAlgorithm::Sha256.hasher();
        let b = HashAlgorithm::Sha256.hasher();
        a.update(b"data");
        assert_ne!(a.finalize_hex(), b.finalize_hex());
    }

    #[test]
    fn test_chunked_update_matches_single_update() {
        let data = b"the quick brown fox jumps over the lazy dog";
        for algorithm in HashAlgorithm::ALL {
            let mut chunked = algorithm.hasher();
            for chunk in data.chunks(3) {
                chunked.update(chunk);
            }
            assert_eq!(chunked.finalize_hex(), digest_of(algorithm, data));
        }
    }

    #[test]
    fn test_hasher_reports_algorithm() {
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(algorithm.hasher().algorithm(), algorithm);
        }
    }
}
