//! Output formatters for duplicate scan results.
//!
//! - [`text`] for people at a terminal
//! - [`json`] for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use hashdupe::duplicates::{DuplicateFinder, Report};
//! use hashdupe::output::TextReporter;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (index, _summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let report = Report::summarize(&index);
//! TextReporter::new(false)
//!     .write_report(&report, &mut std::io::stdout())
//!     .unwrap();
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextReporter;
