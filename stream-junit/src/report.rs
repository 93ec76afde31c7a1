// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::{path::PathBuf, time::Duration};

/// The finalized outcome of a single test suite.
///
/// A `SuiteReport` is produced once all events for a suite have been seen, written out by a
/// [`JunitWriter`](crate::JunitWriter), and then dropped.
#[derive(Clone, Debug)]
pub struct SuiteReport {
    /// The fully-qualified title of this suite.
    pub name: String,

    /// The test results in this suite, in the order they finished.
    pub tests: Vec<TestResult>,

    /// The number of failures reported for this suite.
    ///
    /// This counts failure events, which may include hook failures that have no entry in
    /// `tests`.
    pub failures: usize,

    /// The number of passes reported for this suite.
    pub passes: usize,

    /// The time at which the suite began execution.
    pub timestamp: DateTime<Utc>,

    /// The overall time taken by the suite.
    ///
    /// This is serialized as the number of seconds.
    pub time: Duration,
}

impl SuiteReport {
    /// Creates a new, empty `SuiteReport`.
    pub fn new(name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            tests: vec![],
            failures: 0,
            passes: 0,
            timestamp,
            time: Duration::ZERO,
        }
    }

    /// Sets the time taken for the suite.
    pub fn set_time(&mut self, time: Duration) -> &mut Self {
        self.time = time;
        self
    }

    /// Adds a test result to the end of this suite.
    ///
    /// Unlike the counters, the test list is never deduplicated.
    pub fn add_test(&mut self, test: TestResult) -> &mut Self {
        self.tests.push(test);
        self
    }

    /// The number of tests in this suite.
    ///
    /// This is the larger of the number of recorded tests and the number of pass and failure
    /// events, so that a runner reporting failures without test records (for example a failing
    /// `before` hook) still produces a non-zero count.
    pub fn test_count(&self) -> usize {
        self.tests.len().max(self.failures + self.passes)
    }

    /// The number of tests that neither passed nor failed.
    pub fn skipped(&self) -> usize {
        self.test_count()
            .saturating_sub(self.failures)
            .saturating_sub(self.passes)
    }

    /// Returns true if this suite should not be written out at all.
    pub fn is_empty(&self) -> bool {
        self.test_count() == 0
    }
}

/// The state a test ended up in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TestState {
    /// The test passed.
    Passed,

    /// The test, or the hook it stands in for, failed.
    Failed,

    /// The test never resolved to a pass or a failure, for example because it was pending.
    Skipped,
}

/// The outcome of a single test case.
#[derive(Clone, Debug)]
pub struct TestResult {
    /// The title of the test.
    pub title: String,

    /// The JUnit "classname" of the test.
    ///
    /// `classname` + `title` together should identify the test.
    pub classname: String,

    /// The state of the test.
    pub state: TestState,

    /// The time it took to execute this test, if the runner measured it.
    pub time: Option<Duration>,

    /// Details about the failure, if any.
    pub error: Option<FailureDetail>,

    /// Log lines captured while the test was running, without trailing newlines.
    pub log_entries: Vec<String>,

    /// A screenshot to attach to a failed test.
    pub attachment: Option<PathBuf>,
}

impl TestResult {
    /// Creates a new test result.
    pub fn new(title: impl Into<String>, classname: impl Into<String>, state: TestState) -> Self {
        Self {
            title: title.into(),
            classname: classname.into(),
            state,
            time: None,
            error: None,
            log_entries: vec![],
            attachment: None,
        }
    }

    /// Sets the time taken for the test.
    pub fn set_time(&mut self, time: Duration) -> &mut Self {
        self.time = Some(time);
        self
    }

    /// Sets the failure detail.
    pub fn set_error(&mut self, error: FailureDetail) -> &mut Self {
        self.error = Some(error);
        self
    }

    /// Appends a formatted log line.
    pub fn add_log_entry(&mut self, entry: impl Into<String>) -> &mut Self {
        self.log_entries.push(entry.into());
        self
    }

    /// Appends several formatted log lines.
    pub fn add_log_entries(
        &mut self,
        entries: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        for entry in entries {
            self.add_log_entry(entry);
        }
        self
    }

    /// Sets the screenshot attachment.
    pub fn set_attachment(&mut self, attachment: impl Into<PathBuf>) -> &mut Self {
        self.attachment = Some(attachment.into());
        self
    }
}

/// Information about why a test failed.
///
/// `actual` and `expected` are arbitrary values as reported by an assertion library. Strings
/// are diffed as-is; any other value is diffed through its JSON serialization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FailureDetail {
    /// The failure message.
    pub message: Option<String>,

    /// The value the assertion observed.
    pub actual: Option<Value>,

    /// The value the assertion wanted.
    pub expected: Option<Value>,

    /// The stack trace. The first line is expected to restate the message.
    pub stack: Option<String>,
}

impl FailureDetail {
    /// Creates a new, empty `FailureDetail`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the actual value.
    pub fn set_actual(&mut self, actual: impl Into<Value>) -> &mut Self {
        self.actual = Some(actual.into());
        self
    }

    /// Sets the expected value.
    pub fn set_expected(&mut self, expected: impl Into<Value>) -> &mut Self {
        self.expected = Some(expected.into());
        self
    }

    /// Sets the stack trace.
    pub fn set_stack(&mut self, stack: impl Into<String>) -> &mut Self {
        self.stack = Some(stack.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn suite_with(recorded: usize, failures: usize, passes: usize) -> SuiteReport {
        let mut suite = SuiteReport::new("suite", Utc::now());
        for i in 0..recorded {
            suite.add_test(TestResult::new(
                format!("test {i}"),
                "suite",
                TestState::Passed,
            ));
        }
        suite.failures = failures;
        suite.passes = passes;
        suite
    }

    #[test_case(0, 0, 0 => (0, 0); "empty")]
    #[test_case(3, 1, 2 => (3, 0); "all resolved")]
    #[test_case(4, 1, 1 => (4, 2); "two pending")]
    #[test_case(0, 1, 0 => (1, 0); "hook failure without tests")]
    #[test_case(1, 2, 1 => (3, 0); "more events than records")]
    fn counts(recorded: usize, failures: usize, passes: usize) -> (usize, usize) {
        let suite = suite_with(recorded, failures, passes);
        assert_eq!(
            suite.test_count(),
            suite.skipped() + suite.failures + suite.passes,
            "skipped is derived from the tolerant count"
        );
        (suite.test_count(), suite.skipped())
    }

    #[test]
    fn empty_suite_is_suppressed() {
        assert!(suite_with(0, 0, 0).is_empty());
        assert!(!suite_with(0, 1, 0).is_empty());
        assert!(!suite_with(1, 0, 0).is_empty());
    }
}
