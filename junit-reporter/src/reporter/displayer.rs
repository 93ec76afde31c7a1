// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable progress lines and the end-of-run summary.

use super::helpers::{Styles, format_elapsed};
use crate::{errors::DisplayErrorChain, write_str::WriteStr};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use std::{error::Error, fmt, io, time::Duration};

/// Statistics for a test run, shown in the summary.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunStats {
    /// The number of tests that passed.
    pub passes: usize,

    /// The number of tests and hooks that failed.
    pub failures: usize,

    /// The number of tests that were skipped without running.
    pub pending: usize,

    /// The number of suites entered.
    pub suites: usize,

    /// When the run started.
    pub start_time: Option<DateTime<Utc>>,

    /// When the run finished.
    pub end_time: Option<DateTime<Utc>>,

    /// Every failure, in the order reported.
    pub failed: Vec<FailureSummary>,
}

impl RunStats {
    /// The time between the start and the end of the run, or zero if either is unknown.
    pub fn elapsed(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (end - start).to_std().unwrap_or_default(),
            _ => Duration::ZERO,
        }
    }
}

/// A failure listed in the summary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FailureSummary {
    /// The full title of the suite the failure occurred in.
    pub suite: String,

    /// The title of the test or hook.
    pub title: String,

    /// The failure message.
    pub message: Option<String>,
}

/// Writes progress lines for a run to a status stream.
pub struct StatusDisplayer {
    writer: Box<dyn WriteStr>,
    styles: Styles,
    ok_symbol: &'static str,
}

impl StatusDisplayer {
    /// Creates a new displayer writing to `writer`.
    pub fn new(writer: impl WriteStr + 'static, colorize: bool, unicode: bool) -> Self {
        let mut styles = Styles::default();
        if colorize {
            styles.colorize();
        }
        Self {
            writer: Box::new(writer),
            styles,
            ok_symbol: if unicode { "✓" } else { "ok" },
        }
    }

    /// Writes the header for a suite.
    pub fn suite_entered(&mut self, full_title: &str) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "  {}", full_title.style(self.styles.suite))
    }

    /// Writes the line for a passing test.
    pub fn test_passed(&mut self, title: &str) -> io::Result<()> {
        let line = format!("     {} {title}", self.ok_symbol);
        writeln!(self.writer, "{}", line.style(self.styles.pass))
    }

    /// Writes the line for a failure. `n` is the failure's number within its suite.
    pub fn test_failed(&mut self, n: usize, title: &str) -> io::Result<()> {
        let line = format!("    {n}) {title}");
        writeln!(self.writer, "{}", line.style(self.styles.fail))
    }

    /// Writes the line for a pending test.
    pub fn test_pending(&mut self, title: &str) -> io::Result<()> {
        let line = format!("      - {title}");
        writeln!(self.writer, "{}", line.style(self.styles.skip))
    }

    /// Writes an error that was handled without stopping the run.
    pub fn write_error(&mut self, error: &dyn Error) -> io::Result<()> {
        writeln!(
            self.writer,
            "{}: {}",
            "error".style(self.styles.error),
            DisplayErrorChain::new(error)
        )
    }

    /// Writes the end-of-run summary.
    pub fn write_summary(&mut self, stats: &RunStats) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "  {} {} {}",
            stats.passes.style(self.styles.count),
            "passing".style(self.styles.pass),
            format!("({})", format_elapsed(stats.elapsed())).style(self.styles.dimmed),
        )?;
        if stats.pending > 0 {
            writeln!(
                self.writer,
                "  {} {}",
                stats.pending.style(self.styles.count),
                "pending".style(self.styles.skip),
            )?;
        }
        if stats.failures > 0 {
            writeln!(
                self.writer,
                "  {} {}",
                stats.failures.style(self.styles.count),
                "failing".style(self.styles.fail),
            )?;
        }

        for (index, failure) in stats.failed.iter().enumerate() {
            writeln!(self.writer)?;
            writeln!(self.writer, "  {}) {}", index + 1, failure.suite)?;
            writeln!(self.writer, "       {}:", failure.title)?;
            if let Some(message) = &failure.message {
                for line in message.lines() {
                    writeln!(self.writer, "     {}", line.style(self.styles.fail))?;
                }
            }
        }

        writeln!(self.writer)?;
        self.writer.write_str_flush()
    }
}

impl fmt::Debug for StatusDisplayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusDisplayer")
            .field("styles", &self.styles)
            .field("ok_symbol", &self.ok_symbol)
            .finish_non_exhaustive()
    }
}
