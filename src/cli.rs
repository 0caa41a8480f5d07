//! Command-line interface definitions for hashdupe.
//!
//! Options that also exist in the configuration file are optional here:
//! a flag given on the command line wins over the file and the
//! environment, a missing flag leaves the configured value alone.
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory with SHA-256
//! hashdupe
//!
//! # Scan a directory with MD5 on four threads
//! hashdupe --dir ~/Downloads --crypto md5 --jobs 4
//!
//! # JSON report, only files of at least 1 MiB
//! hashdupe --dir ~/Downloads --output json --min-size 1MiB
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::ReadErrorPolicy;

/// Find duplicate files by content digest.
///
/// Every regular file below the root is hashed with the selected
/// algorithm; files sharing a digest are reported as duplicates together
/// with the space their extra copies occupy.
#[derive(Debug, Parser)]
#[command(name = "hashdupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory to scan
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Hash algorithm: md5, sha256 or sha512 [default: sha256]
    #[arg(short, long, value_name = "NAME")]
    pub crypto: Option<String>,

    /// Number of hashing threads [default: 1]
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// What to do when a file fails after it was opened [default: abort]
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_read_error: Option<ReadErrorPolicy>,

    /// Descend into symlinked directories (file symlinks are always hashed)
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Configuration file (TOML) to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print errors as JSON objects on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use hashdupe::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
