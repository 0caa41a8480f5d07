//! hashdupe - content-hash duplicate file finder
//!
//! Walks a directory tree, streams every regular file through MD5, SHA-256
//! or SHA-512, and groups files by digest. Groups with more than one member
//! are reported as duplicates together with the bytes their extra copies
//! occupy.
//!
//! The pipeline lives in [`scanner`] (algorithm selection, walking,
//! hashing) and [`duplicates`] (index, finder, report); [`output`] renders
//! the report. [`run_app`] wires it to the command line.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig, FinderError, Report, ScanSummary};
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextReporter};
use crate::progress::ConsoleProgress;
use crate::scanner::{HashAlgorithm, WalkerConfig};

/// Run one scan as described by the command line.
///
/// Configuration and the algorithm name are resolved before the
/// filesystem is touched. On success the returned code tells whether
/// duplicates were found and whether anything was skipped.
///
/// # Errors
///
/// Returns an error for invalid configuration, an unknown algorithm, an
/// unreadable root, a fatal read error or an interrupted scan. Use
/// [`ExitCode::for_error`] to map it to a process exit code.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let algorithm = config
        .crypto
        .parse::<HashAlgorithm>()
        .map_err(FinderError::from)?;

    let handler = signal::install_handler()?;

    let walker_config = WalkerConfig::default()
        .with_follow_symlinks(config.follow_symlinks)
        .with_skip_hidden(config.skip_hidden)
        .with_min_size(cli.min_size)
        .with_max_size(cli.max_size);

    let mut finder_config = FinderConfig::default()
        .with_algorithm(algorithm)
        .with_walker_config(walker_config)
        .with_jobs(config.jobs)
        .with_read_errors(config.on_read_error)
        .with_shutdown_flag(handler.get_flag());

    if cli.output == OutputFormat::Text && !cli.quiet {
        let progress = ConsoleProgress::stdout().with_paths_first(config.jobs <= 1);
        finder_config = finder_config.with_progress_callback(Arc::new(progress));
    }

    let finder = DuplicateFinder::new(finder_config);
    let (index, summary) = finder.find_duplicates(&cli.dir)?;

    let report = Report::summarize(&index);
    let exit_code = exit_code_for(&report, &summary);

    log::info!(
        "{} files hashed ({}), {} skipped, {} walk errors in {:.2?}",
        summary.files_hashed,
        bytesize::ByteSize::b(summary.bytes_hashed),
        summary.files_skipped,
        summary.walk_errors.len(),
        summary.duration
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Text => {
            let color = !cli.no_color && stdout.is_terminal();
            TextReporter::new(color)
                .write_report(&report, &mut out)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&report, &summary, exit_code)
                .write_to(&mut out)
                .context("Failed to write JSON report")?;
        }
    }
    out.flush().context("Failed to flush output")?;

    Ok(exit_code)
}

/// Exit code for a scan that ran to completion.
///
/// Skipped files take precedence: a partial index may hide duplicates.
#[must_use]
pub fn exit_code_for(report: &Report, summary: &ScanSummary) -> ExitCode {
    if summary.has_errors() {
        ExitCode::PartialSuccess
    } else if report.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    }
}
