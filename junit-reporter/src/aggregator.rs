// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Accumulates the results of one suite at a time.

use chrono::{DateTime, Utc};
use std::time::Duration;
use stream_junit::{FailureDetail, SuiteReport, TestResult, TestState};

/// A test or hook that reported a failure.
///
/// The most recent one in a suite becomes a synthetic test case if the suite ends without any
/// recorded tests, which happens when a setup hook fails.
#[derive(Clone, Debug, PartialEq)]
pub struct FailedRunnable {
    /// The title of the test or hook.
    pub title: String,

    /// The class name to report the runnable under.
    pub classname: String,

    /// How long the runnable took, if known.
    pub duration: Option<Duration>,

    /// Why it failed.
    pub error: FailureDetail,
}

impl FailedRunnable {
    fn into_test_result(self) -> TestResult {
        let mut test = TestResult::new(self.title, self.classname, TestState::Failed);
        test.set_error(self.error);
        if let Some(duration) = self.duration {
            test.set_time(duration);
        }
        test
    }
}

/// Holds the state of the suite that is currently open.
#[derive(Debug, Default)]
pub struct SuiteAggregator {
    active: Option<ActiveSuite>,
}

#[derive(Debug)]
struct ActiveSuite {
    report: SuiteReport,
    last_failed: Option<FailedRunnable>,
}

impl SuiteAggregator {
    /// Creates a new aggregator with no open suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the title of the open suite, if any.
    pub fn suite_title(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.report.name.as_str())
    }

    /// Opens a new suite.
    ///
    /// If a suite was already open, it is finalized as of `timestamp` and returned.
    pub fn open(
        &mut self,
        title: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Option<SuiteReport> {
        let displaced = self.finalize(timestamp);
        self.active = Some(ActiveSuite {
            report: SuiteReport::new(title, timestamp),
            last_failed: None,
        });
        displaced
    }

    /// Appends a test result to the open suite.
    ///
    /// Returns the number of tests recorded so far, or `None` if no suite is open.
    pub fn record(&mut self, test: TestResult) -> Option<usize> {
        let active = self.active.as_mut()?;
        active.report.add_test(test);
        Some(active.report.tests.len())
    }

    /// Counts a pass in the open suite.
    ///
    /// Returns the number of passes so far, or `None` if no suite is open.
    pub fn record_pass(&mut self) -> Option<usize> {
        let active = self.active.as_mut()?;
        active.report.passes += 1;
        Some(active.report.passes)
    }

    /// Counts a failure in the open suite, and remembers the runnable that failed.
    ///
    /// Returns the number of failures so far, or `None` if no suite is open.
    pub fn record_failure(&mut self, runnable: FailedRunnable) -> Option<usize> {
        let active = self.active.as_mut()?;
        active.report.failures += 1;
        active.last_failed = Some(runnable);
        Some(active.report.failures)
    }

    /// Returns the most recent failure in the open suite, if any.
    pub fn last_failed(&self) -> Option<&FailedRunnable> {
        self.active.as_ref()?.last_failed.as_ref()
    }

    /// Closes the open suite as of `end_time`.
    ///
    /// Returns `None` if no suite was open, or if the suite has nothing to report.
    pub fn finalize(&mut self, end_time: DateTime<Utc>) -> Option<SuiteReport> {
        let ActiveSuite {
            mut report,
            last_failed,
        } = self.active.take()?;

        // A clock that went backwards yields a zero duration.
        let time = (end_time - report.timestamp).to_std().unwrap_or_default();
        report.set_time(time);

        if report.tests.is_empty()
            && report.failures > 0
            && let Some(runnable) = last_failed
        {
            report.add_test(runnable.into_test_result());
        }

        if report.is_empty() {
            tracing::debug!("suite `{}` has no tests, skipping", report.name);
            return None;
        }
        Some(report)
    }
}
