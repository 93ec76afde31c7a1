// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events produced by a test runner.
//!
//! The test runner itself lives outside this crate: it reports what happens during a run as a
//! sequence of [`RunnerEvent`]s, which are consumed by a
//! [`JunitReporter`](crate::reporter::JunitReporter).

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use std::time::Duration;
use stream_junit::{FailureDetail, TestState};

/// A test event.
#[derive(Clone, Debug)]
pub struct RunnerEvent {
    /// The time at which the event was generated.
    pub timestamp: DateTime<Utc>,

    /// The kind of event this is.
    pub kind: RunnerEventKind,
}

impl RunnerEvent {
    /// Creates a new event.
    pub fn new(timestamp: DateTime<Utc>, kind: RunnerEventKind) -> Self {
        Self { timestamp, kind }
    }
}

/// The kind of event this is.
///
/// Forms part of [`RunnerEvent`]. Within a run, events arrive in this order:
///
/// ```text
/// RunStarted? (SuiteEntered (TestStarted | TestFinished | TestPassed | TestFailed | TestPending)*)* RunFinished
/// ```
#[derive(Clone, Debug)]
pub enum RunnerEventKind {
    /// The test run started.
    RunStarted,

    /// A suite was entered. Any previously entered suite is complete.
    SuiteEntered {
        /// The suite.
        suite: SuiteInfo,
    },

    /// A test started running.
    TestStarted {
        /// The test.
        test: TestInfo,
    },

    /// A test finished running, whatever its outcome.
    TestFinished {
        /// The test, with its final state.
        test: TestInfo,
    },

    /// A test passed.
    TestPassed {
        /// The test.
        test: TestInfo,
    },

    /// A test or a hook failed.
    ///
    /// Hook failures are reported with the hook as the test, and are not followed by a
    /// [`TestFinished`](Self::TestFinished) event.
    TestFailed {
        /// The test or hook that failed.
        test: TestInfo,

        /// Why it failed.
        error: FailureDetail,
    },

    /// A test was skipped without running.
    TestPending {
        /// The test.
        test: TestInfo,
    },

    /// The test run finished.
    RunFinished,
}

/// Information about a suite.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuiteInfo {
    /// The title of the suite, prefixed with the titles of all enclosing suites.
    pub full_title: String,
}

impl SuiteInfo {
    /// Creates a new `SuiteInfo`.
    pub fn new(full_title: impl Into<String>) -> Self {
        Self {
            full_title: full_title.into(),
        }
    }
}

/// Information about a test, or about a hook that stands in for one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TestInfo {
    /// The title of the test.
    pub title: String,

    /// The file the test is defined in, if known.
    pub file: Option<Utf8PathBuf>,

    /// How long the test took, if it ran.
    pub duration: Option<Duration>,

    /// The state of the test, or `None` if it never resolved.
    pub state: Option<TestState>,

    /// The error the test failed with, if any.
    pub error: Option<FailureDetail>,
}

impl TestInfo {
    /// Creates a new `TestInfo` with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the file the test is defined in.
    pub fn with_file(mut self, file: impl Into<Utf8PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the duration of the test.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Sets the state of the test.
    pub fn with_state(mut self, state: TestState) -> Self {
        self.state = Some(state);
        self
    }

    /// Sets the error the test failed with.
    pub fn with_error(mut self, error: FailureDetail) -> Self {
        self.error = Some(error);
        self
    }
}
