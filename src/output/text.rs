//! Human-readable report.
//!
//! ```text
//! Duplicate file found:
//! Hash Value: 2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824
//! File Size: 5 bytes
//! Duplicate Files:
//! ./a.txt
//! ./b.txt
//!
//! 1 duplicate set found, 1 redundant copy, 5 bytes wasted (5 B)
//! ```

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::duplicates::{DuplicateSet, Report};

/// Writes a [`Report`] as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReporter {
    color: bool,
}

impl TextReporter {
    /// Create a reporter; `color` turns on bold headings.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Write the full report.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_report<W: Write>(&self, report: &Report, out: &mut W) -> io::Result<()> {
        for set in &report.sets {
            self.write_set(set, out)?;
        }

        if report.is_empty() {
            return writeln!(out, "{}", self.heading("No duplicate files found"));
        }

        let summary = format!(
            "{} duplicate {} found, {} redundant {}, {} bytes wasted ({})",
            report.duplicate_sets,
            plural(report.duplicate_sets, "set", "sets"),
            report.redundant_files,
            plural(report.redundant_files, "copy", "copies"),
            report.wasted_bytes,
            ByteSize::b(report.wasted_bytes),
        );
        writeln!(out, "{}", self.heading(&summary))
    }

    fn write_set<W: Write>(&self, set: &DuplicateSet, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.heading("Duplicate file found:"))?;
        writeln!(out, "Hash Value: {}", set.digest)?;
        writeln!(out, "File Size: {} bytes", set.size)?;
        writeln!(out, "{}", self.heading("Duplicate Files:"))?;
        for path in &set.files {
            writeln!(out, "{}", path.display())?;
        }
        writeln!(out)
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}
