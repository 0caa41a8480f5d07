//! Structured error handling and exit codes.

use serde::Serialize;

use crate::config::ConfigError;
use crate::duplicates::FinderError;

/// Exit codes for the hashdupe application.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (root unreadable, fatal read error)
/// - 2: No duplicates found (completed normally, no duplicates)
/// - 3: Partial success (completed, but some files were skipped)
/// - 4: Configuration error (nothing was scanned)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and duplicates were found.
    Success = 0,
    /// General error: The scan could not complete.
    GeneralError = 1,
    /// No duplicates: Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Partial success: Scan completed but encountered some non-fatal errors.
    PartialSuccess = 3,
    /// Configuration error: Unknown algorithm or unreadable config file.
    ConfigError = 4,
    /// Interrupted: Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "HD000",
            Self::GeneralError => "HD001",
            Self::NoDuplicates => "HD002",
            Self::PartialSuccess => "HD003",
            Self::ConfigError => "HD004",
            Self::Interrupted => "HD130",
        }
    }

    /// Pick the exit code for an error that ended the run.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<ConfigError>().is_some() {
            return Self::ConfigError;
        }
        match err.downcast_ref::<FinderError>() {
            Some(FinderError::Interrupted) => Self::Interrupted,
            Some(FinderError::UnsupportedAlgorithm(_)) => Self::ConfigError,
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "HD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{ScanError, UnsupportedAlgorithm};
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::NoDuplicates.as_i32(), 2);
        assert_eq!(ExitCode::PartialSuccess.as_i32(), 3);
        assert_eq!(ExitCode::ConfigError.as_i32(), 4);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_code_prefix_matches_number() {
        for code in [
            ExitCode::Success,
            ExitCode::GeneralError,
            ExitCode::NoDuplicates,
            ExitCode::PartialSuccess,
            ExitCode::ConfigError,
            ExitCode::Interrupted,
        ] {
            assert_eq!(code.code_prefix(), format!("HD{:03}", code.as_i32()));
        }
    }

    #[test]
    fn test_for_error_classification() {
        let interrupted = anyhow::Error::new(FinderError::Interrupted);
        assert_eq!(ExitCode::for_error(&interrupted), ExitCode::Interrupted);

        let unknown = anyhow::Error::new(FinderError::from(UnsupportedAlgorithm(
            "crc32".to_string(),
        )));
        assert_eq!(ExitCode::for_error(&unknown), ExitCode::ConfigError);

        let walk = anyhow::Error::new(FinderError::Walk(ScanError::NotFound(PathBuf::from(
            "/nope",
        ))));
        assert_eq!(ExitCode::for_error(&walk), ExitCode::GeneralError);

        let other = anyhow::anyhow!("something else");
        assert_eq!(ExitCode::for_error(&other), ExitCode::GeneralError);
    }

    #[test]
    fn test_structured_error_serializes() {
        let err = anyhow::Error::new(FinderError::Interrupted);
        let structured = StructuredError::new(&err, ExitCode::Interrupted);
        let json = serde_json::to_value(&structured).unwrap();

        assert_eq!(json["code"], "HD130");
        assert_eq!(json["exit_code"], 130);
        assert_eq!(json["interrupted"], true);
        assert_eq!(json["message"], "Scan interrupted by user");
    }
}
