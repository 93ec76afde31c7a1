// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns runner events into a JUnit document.
//!
//! The main structure in this module is [`JunitReporter`].

use super::{
    displayer::{FailureSummary, RunStats, StatusDisplayer},
    events::{RunnerEvent, RunnerEventKind, SuiteInfo, TestInfo},
    sink::ReportSink,
};
use crate::{
    aggregator::{FailedRunnable, SuiteAggregator},
    config::ReporterConfig,
    console::{CaptureGuard, Console},
    errors::{DisplayErrorChain, WriteEventError},
    naming::ClassNaming,
    output::Color,
    screenshots::Screenshots,
    write_str::WriteStr,
};
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use std::io;
use stream_junit::{FailureDetail, JunitWriter, SerializeError, TestResult, TestState};

/// Reporter builder.
#[derive(Debug, Default)]
pub struct ReporterBuilder {
    should_colorize: bool,
    no_unicode: bool,
}

impl ReporterBuilder {
    /// Set to true if the reporter should colorize status output.
    pub fn set_colorize(&mut self, should_colorize: bool) -> &mut Self {
        self.should_colorize = should_colorize;
        self
    }

    /// Set to true if status output should be restricted to ASCII.
    pub fn set_no_unicode(&mut self, no_unicode: bool) -> &mut Self {
        self.no_unicode = no_unicode;
        self
    }

    /// Sets colorization and unicode output based on the terminal standard output is attached
    /// to.
    pub fn detect_stdout(&mut self, color: Color) -> &mut Self {
        self.should_colorize = color.should_colorize(supports_color::Stream::Stdout);
        self.no_unicode = !supports_unicode::on(supports_unicode::Stream::Stdout);
        self
    }

    /// Creates a new reporter.
    ///
    /// `console` is the console that test code logs to. `status` receives progress lines and the
    /// summary, and is usually standard output.
    pub fn build(
        &self,
        config: ReporterConfig,
        console: Console,
        status: impl WriteStr + 'static,
    ) -> JunitReporter {
        let displayer = StatusDisplayer::new(status, self.should_colorize, !self.no_unicode);
        JunitReporter {
            naming: config.class_naming(),
            config,
            console,
            displayer,
            aggregator: SuiteAggregator::new(),
            state: RunState::NotStarted,
            capture: None,
            stats: RunStats::default(),
        }
    }
}

/// Writes a JUnit report for the events of a test run.
///
/// The report is streamed: each suite is written out as soon as the next one is entered or the
/// run finishes, and only the open suite is kept in memory.
#[derive(Debug)]
pub struct JunitReporter {
    config: ReporterConfig,
    naming: ClassNaming,
    console: Console,
    displayer: StatusDisplayer,
    aggregator: SuiteAggregator,
    state: RunState,
    capture: Option<CaptureGuard>,
    stats: RunStats,
}

enum RunState {
    NotStarted,
    Running(Box<RunningReport>),
    Finished,
}

struct RunningReport {
    writer: JunitWriter<ReportSink>,
    screenshots: Screenshots,
}

impl std::fmt::Debug for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => f.write_str("NotStarted"),
            Self::Running(running) => f
                .debug_struct("Running")
                .field("report_file", &running.writer.get_ref().path())
                .finish_non_exhaustive(),
            Self::Finished => f.write_str("Finished"),
        }
    }
}

impl JunitReporter {
    /// Returns the console that is captured while tests run.
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Returns statistics for the run so far.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Returns the path the report is being written to, once the run has started.
    pub fn report_file(&self) -> Option<&Utf8Path> {
        match &self.state {
            RunState::Running(running) => running.writer.get_ref().path(),
            RunState::NotStarted | RunState::Finished => None,
        }
    }

    /// Processes a single event.
    ///
    /// Errors writing a suite are reported on the status stream and do not stop the run. Errors
    /// opening or closing the report, or writing to the status stream, are returned.
    pub fn report_event(&mut self, event: RunnerEvent) -> Result<(), WriteEventError> {
        let RunnerEvent { timestamp, kind } = event;
        match kind {
            RunnerEventKind::RunStarted => {
                if matches!(self.state, RunState::NotStarted) {
                    self.start(timestamp)?;
                } else {
                    tracing::warn!("ignoring duplicate run start");
                }
            }
            RunnerEventKind::SuiteEntered { suite } => {
                self.start_if_needed(timestamp)?;
                self.suite_entered(suite, timestamp)?;
            }
            RunnerEventKind::TestStarted { test } => {
                tracing::debug!("capturing console output for `{}`", test.title);
                // Replacing the guard ends any capture left over from an unfinished test.
                self.capture = Some(self.console.capture());
            }
            RunnerEventKind::TestFinished { test } => self.test_finished(test),
            RunnerEventKind::TestPassed { test } => {
                if self.aggregator.record_pass().is_none() {
                    warn_no_suite("pass", &test.title);
                }
                self.stats.passes += 1;
                self.displayer
                    .test_passed(&test.title)
                    .map_err(WriteEventError::Io)?;
            }
            RunnerEventKind::TestFailed { test, error } => {
                self.test_failed(test, error)?;
            }
            RunnerEventKind::TestPending { test } => {
                self.stats.pending += 1;
                self.displayer
                    .test_pending(&test.title)
                    .map_err(WriteEventError::Io)?;
            }
            RunnerEventKind::RunFinished => self.finish(timestamp)?,
        }

        Ok(())
    }

    // ---
    // Helper methods
    // ---

    fn start(&mut self, timestamp: DateTime<Utc>) -> Result<(), WriteEventError> {
        let (sink, report_dir) = match self.config.report_path() {
            Some(report_path) => {
                let sink = ReportSink::open(&report_path, timestamp)?;
                let report_dir = sink.path().and_then(Utf8Path::parent).map_or_else(
                    || self.config.working_dir().to_path_buf(),
                    Utf8Path::to_path_buf,
                );
                (sink, report_dir)
            }
            None => {
                tracing::debug!("no report path configured, discarding JUnit output");
                (ReportSink::Discard, self.config.working_dir().to_path_buf())
            }
        };

        let mut writer = JunitWriter::new(sink);
        writer.set_include_stack(self.config.include_stack());
        let file = writer.get_ref().path().map(Utf8Path::to_path_buf);
        writer
            .open_document(self.config.report_name())
            .map_err(|error| WriteEventError::Junit { file, error })?;

        let screenshots = Screenshots::new(
            self.config.screenshots(),
            report_dir,
            self.config.image_prefix().map(str::to_owned),
            self.config.image_extension(),
        );
        self.state = RunState::Running(Box::new(RunningReport {
            writer,
            screenshots,
        }));
        self.stats.start_time = Some(timestamp);
        Ok(())
    }

    fn start_if_needed(&mut self, timestamp: DateTime<Utc>) -> Result<(), WriteEventError> {
        if matches!(self.state, RunState::NotStarted) {
            tracing::debug!("no run start seen, starting the report now");
            self.start(timestamp)?;
        }
        Ok(())
    }

    fn suite_entered(
        &mut self,
        suite: SuiteInfo,
        timestamp: DateTime<Utc>,
    ) -> Result<(), WriteEventError> {
        self.finish_suite(timestamp)?;
        let displaced = self.aggregator.open(&suite.full_title, timestamp);
        debug_assert!(
            displaced.is_none(),
            "the previous suite is finalized before the next one opens"
        );
        self.stats.suites += 1;
        self.displayer
            .suite_entered(&suite.full_title)
            .map_err(WriteEventError::Io)
    }

    fn test_finished(&mut self, test: TestInfo) {
        let log_entries = self
            .capture
            .take()
            .map(CaptureGuard::finish)
            .unwrap_or_default();

        let Some(suite_title) = self.aggregator.suite_title() else {
            warn_no_suite("test end", &test.title);
            return;
        };
        let classname = self.classname(suite_title, test.file.as_deref());

        let state = test.state.unwrap_or(TestState::Skipped);
        let mut result = TestResult::new(&test.title, classname, state);
        if let Some(duration) = test.duration {
            result.set_time(duration);
        }
        // The failure event usually carries the error; fall back to it if the test doesn't.
        let error = test.error.or_else(|| {
            (state == TestState::Failed)
                .then(|| self.aggregator.last_failed())
                .flatten()
                .filter(|failed| failed.title == test.title)
                .map(|failed| failed.error.clone())
        });
        if let Some(error) = error {
            result.set_error(error);
        }
        result.add_log_entries(log_entries);

        self.aggregator.record(result);
    }

    fn test_failed(&mut self, test: TestInfo, error: FailureDetail) -> Result<(), WriteEventError> {
        self.stats.failures += 1;
        let Some(suite_title) = self.aggregator.suite_title() else {
            warn_no_suite("failure", &test.title);
            return Ok(());
        };
        let suite_title = suite_title.to_owned();
        let classname = self.classname(&suite_title, test.file.as_deref());
        let title = test.title;

        self.stats.failed.push(FailureSummary {
            suite: suite_title,
            title: title.clone(),
            message: error.message.clone(),
        });

        let n = self
            .aggregator
            .record_failure(FailedRunnable {
                title: title.clone(),
                classname,
                duration: test.duration,
                error,
            })
            .unwrap_or_default();
        self.displayer
            .test_failed(n, &title)
            .map_err(WriteEventError::Io)
    }

    fn classname(&self, suite_title: &str, file: Option<&Utf8Path>) -> String {
        let file = file.map(|file| self.config.working_dir().join(file));
        self.naming.classname(suite_title, file.as_deref())
    }

    // Finalizes and writes out the open suite, if any. Failures to write are reported but not
    // returned.
    fn finish_suite(&mut self, end_time: DateTime<Utc>) -> Result<(), WriteEventError> {
        let Some(mut report) = self.aggregator.finalize(end_time) else {
            return Ok(());
        };
        let RunState::Running(running) = &mut self.state else {
            tracing::warn!("suite `{}` finished outside of a run, dropping it", report.name);
            return Ok(());
        };

        if let Err(error) = running.screenshots.attach(&mut report) {
            tracing::warn!(
                "writing suite `{}` without screenshots: {}",
                report.name,
                DisplayErrorChain::new(&error)
            );
        }

        if let Err(error) = running.writer.write_suite(&report) {
            let error = WriteEventError::Junit {
                file: running.writer.get_ref().path().map(Utf8Path::to_path_buf),
                error,
            };
            tracing::error!(
                "failed to write suite `{}`: {}",
                report.name,
                DisplayErrorChain::new(&error)
            );
            self.displayer
                .write_error(&error)
                .map_err(WriteEventError::Io)?;
        }
        Ok(())
    }

    fn finish(&mut self, timestamp: DateTime<Utc>) -> Result<(), WriteEventError> {
        if matches!(self.state, RunState::Finished) {
            tracing::warn!("ignoring duplicate run finish");
            return Ok(());
        }
        self.start_if_needed(timestamp)?;

        // Restore the console even if the last test never finished.
        self.capture = None;
        let suite_result = self.finish_suite(timestamp);
        let close_result = self.close_document();
        self.stats.end_time = Some(timestamp);

        suite_result?;
        close_result?;
        self.displayer
            .write_summary(&self.stats)
            .map_err(WriteEventError::Io)
    }

    fn close_document(&mut self) -> Result<(), WriteEventError> {
        let RunState::Running(running) = std::mem::replace(&mut self.state, RunState::Finished)
        else {
            return Ok(());
        };
        let RunningReport { mut writer, .. } = *running;
        let file = writer.get_ref().path().map(Utf8Path::to_path_buf);

        writer
            .close_document()
            .and_then(|()| writer.finish())
            .and_then(|sink| close_sink(sink).map_err(SerializeError::from))
            .map_err(|error| WriteEventError::Junit { file, error })
    }
}

impl Drop for JunitReporter {
    fn drop(&mut self) {
        if !matches!(self.state, RunState::Running(_)) {
            return;
        }
        // Leave a well-formed document behind for runs that never finished.
        tracing::warn!("test run did not finish, closing the JUnit report early");
        self.capture = None;
        if let Err(error) = self.finish_suite(Utc::now()) {
            tracing::warn!("{}", DisplayErrorChain::new(&error));
        }
        if let Err(error) = self.close_document() {
            tracing::warn!("{}", DisplayErrorChain::new(&error));
        }
    }
}

fn close_sink(sink: ReportSink) -> io::Result<()> {
    match sink {
        ReportSink::File { writer, .. } => {
            let file = writer.into_inner().map_err(|error| error.into_error())?;
            file.sync_all()
        }
        ReportSink::Discard => Ok(()),
    }
}

fn warn_no_suite(event: &str, title: &str) {
    tracing::warn!("ignoring {event} for `{title}`: no suite has been entered");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_never_colorizes() {
        let mut builder = ReporterBuilder::default();
        builder.set_colorize(true).detect_stdout(Color::Never);
        assert!(!builder.should_colorize);

        builder.detect_stdout(Color::Always);
        assert!(builder.should_colorize);
    }
}
