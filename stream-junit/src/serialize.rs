// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a JUnit document incrementally.

use crate::{
    SerializeError, SuiteReport, TestResult, TestState,
    diff::failure_body,
    text::{cdata_segments, serialize_time, serialize_timestamp, strip_invalid_xml_chars},
};
use quick_xml::{
    Writer,
    events::{BytesCData, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{self, Write};

static TESTSUITES_TAG: &str = "testsuites";
static TESTSUITE_TAG: &str = "testsuite";
static TESTCASE_TAG: &str = "testcase";
static FAILURE_TAG: &str = "failure";
static SKIPPED_TAG: &str = "skipped";
static SYSTEM_OUT_TAG: &str = "system-out";

/// Writes a `<testsuites>` document to a sink, one suite at a time.
///
/// Every method appends complete XML fragments and never revisits earlier output. Each element
/// is followed by a newline, and the sink is flushed after every suite so that a run that is
/// cut short leaves a report that is readable up to the last complete suite.
///
/// To discard all output, use [`JunitWriter::discard`].
pub struct JunitWriter<W: Write> {
    writer: Writer<W>,
    include_stack: bool,
}

impl<W: Write> JunitWriter<W> {
    /// Creates a new writer over the given sink.
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
            include_stack: false,
        }
    }

    /// Sets whether stack traces are appended to failure bodies.
    pub fn set_include_stack(&mut self, include_stack: bool) -> &mut Self {
        self.include_stack = include_stack;
        self
    }

    /// Writes the opening `<testsuites>` tag.
    pub fn open_document(&mut self, name: &str) -> Result<(), SerializeError> {
        let mut tag = BytesStart::new(TESTSUITES_TAG);
        tag.push_attribute(("name", &*strip_invalid_xml_chars(name)));
        self.writer.write_event(Event::Start(tag))?;
        self.write_newline()?;
        self.flush()
    }

    /// Writes the closing `</testsuites>` tag.
    pub fn close_document(&mut self) -> Result<(), SerializeError> {
        self.write_end_tag(TESTSUITES_TAG)?;
        self.write_newline()?;
        self.flush()
    }

    /// Writes out a complete `<testsuite>` element, then flushes the sink.
    pub fn write_suite(&mut self, report: &SuiteReport) -> Result<(), SerializeError> {
        // Use the destructuring syntax to ensure that all fields are handled.
        let SuiteReport {
            name,
            tests,
            failures,
            passes: _,
            timestamp,
            time,
        } = report;

        let mut tag = BytesStart::new(TESTSUITE_TAG);
        tag.extend_attributes([
            ("name", &*strip_invalid_xml_chars(name)),
            ("tests", report.test_count().to_string().as_str()),
            ("failures", failures.to_string().as_str()),
            ("skipped", report.skipped().to_string().as_str()),
            ("timestamp", serialize_timestamp(timestamp).as_str()),
            ("time", serialize_time(time).as_str()),
        ]);
        self.writer.write_event(Event::Start(tag))?;
        self.write_newline()?;

        for test in tests {
            self.write_test(test)?;
        }

        self.write_end_tag(TESTSUITE_TAG)?;
        self.write_newline()?;
        self.flush()
    }

    /// Returns a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    /// Flushes and returns the underlying sink.
    pub fn finish(mut self) -> Result<W, SerializeError> {
        self.flush()?;
        Ok(self.writer.into_inner())
    }

    // ---
    // Helper methods
    // ---

    fn write_test(&mut self, test: &TestResult) -> Result<(), SerializeError> {
        let TestResult {
            title,
            classname,
            state,
            time,
            error,
            log_entries,
            attachment,
        } = test;

        let mut tag = BytesStart::new(TESTCASE_TAG);
        tag.extend_attributes([
            ("classname", &*strip_invalid_xml_chars(classname)),
            ("name", &*strip_invalid_xml_chars(title)),
        ]);
        if let Some(time) = time {
            tag.push_attribute(("time", serialize_time(time).as_str()));
        }
        self.writer.write_event(Event::Start(tag))?;
        self.write_newline()?;

        match state {
            TestState::Passed => {}
            TestState::Failed => {
                let (message, body) = match error {
                    Some(error) => (
                        error.message.as_deref().unwrap_or_default(),
                        failure_body(error, self.include_stack),
                    ),
                    None => ("", String::new()),
                };

                let mut tag = BytesStart::new(FAILURE_TAG);
                tag.push_attribute(("message", &*strip_invalid_xml_chars(message)));
                self.writer.write_event(Event::Start(tag))?;
                self.write_newline()?;
                self.writer.write_event(Event::Text(BytesText::new(
                    &strip_invalid_xml_chars(&body),
                )))?;
                self.write_newline()?;
                self.write_end_tag(FAILURE_TAG)?;
                self.write_newline()?;

                if let Some(attachment) = attachment {
                    // Jenkins picks up attachments from this marker.
                    let marker = format!("\n[[ATTACHMENT|{}]]\n", attachment.display());
                    self.write_start_tag(SYSTEM_OUT_TAG)?;
                    self.writer
                        .write_event(Event::Text(BytesText::new(&marker)))?;
                    self.write_end_tag(SYSTEM_OUT_TAG)?;
                    self.write_newline()?;
                }
            }
            TestState::Skipped => {
                self.writer
                    .write_event(Event::Empty(BytesStart::new(SKIPPED_TAG)))?;
                self.write_newline()?;
            }
        }

        if !log_entries.is_empty() {
            self.write_log_entries(log_entries)?;
        }

        self.write_end_tag(TESTCASE_TAG)?;
        self.write_newline()
    }

    fn write_log_entries(&mut self, log_entries: &[String]) -> Result<(), SerializeError> {
        let mut output = String::new();
        for entry in log_entries {
            output.push_str(&strip_invalid_xml_chars(entry));
            output.push('\n');
        }

        self.write_start_tag(SYSTEM_OUT_TAG)?;
        for segment in cdata_segments(&output) {
            self.writer
                .write_event(Event::CData(BytesCData::new(segment)))?;
        }
        self.write_end_tag(SYSTEM_OUT_TAG)?;
        self.write_newline()
    }

    fn write_start_tag(&mut self, tag_name: &'static str) -> Result<(), SerializeError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(tag_name)))?;
        Ok(())
    }

    fn write_end_tag(&mut self, tag_name: &'static str) -> Result<(), SerializeError> {
        self.writer.write_event(Event::End(BytesEnd::new(tag_name)))?;
        Ok(())
    }

    fn write_newline(&mut self) -> Result<(), SerializeError> {
        self.writer
            .write_event(Event::Text(BytesText::from_escaped("\n")))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SerializeError> {
        self.writer.get_mut().flush()?;
        Ok(())
    }
}

impl JunitWriter<io::Sink> {
    /// Creates a writer that discards everything written to it.
    pub fn discard() -> Self {
        Self::new(io::sink())
    }
}
