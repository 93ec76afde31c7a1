// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{TimeZone, Utc};
use indoc::indoc;
use pretty_assertions::assert_eq;
use quick_xml::{Reader, events::Event};
use std::time::Duration;
use stream_junit::{FailureDetail, JunitWriter, SuiteReport, TestResult, TestState};

#[test]
fn math_report() {
    let mut writer = JunitWriter::new(Vec::new());
    writer
        .open_document("Mocha Tests")
        .expect("opening the document succeeds");
    writer
        .write_suite(&math_suite())
        .expect("writing the suite succeeds");
    writer
        .close_document()
        .expect("closing the document succeeds");
    let output = String::from_utf8(writer.finish().expect("flush succeeds"))
        .expect("output is valid UTF-8");

    assert_eq!(
        output,
        indoc! {r#"
            <testsuites name="Mocha Tests">
            <testsuite name="Math" tests="2" failures="1" skipped="0" timestamp="Mon, 19 Oct 2026 12:00:00 GMT" time="0.012">
            <testcase classname="Math" name="adds" time="0.005">
            </testcase>
            <testcase classname="Math" name="subtracts" time="0.001">
            <failure message="expected 2 got 3">
            -3
            +2
            </failure>
            </testcase>
            </testsuite>
            </testsuites>
        "#}
    );
}

#[test]
fn cdata_terminator_stays_well_formed() {
    let mut test = TestResult::new("prints", "Output", TestState::Passed);
    test.add_log_entries(["<xml>]]></xml>", "]]>]]>", "tail"]);
    let mut suite = SuiteReport::new("Output", timestamp());
    suite.add_test(test);
    suite.passes = 1;

    let mut writer = JunitWriter::new(Vec::new());
    writer.open_document("run").expect("open succeeds");
    writer.write_suite(&suite).expect("write succeeds");
    writer.close_document().expect("close succeeds");
    let output = String::from_utf8(writer.finish().expect("flush succeeds"))
        .expect("output is valid UTF-8");

    let mut reader = Reader::from_str(&output);
    let mut depth = 0_usize;
    let mut in_system_out = false;
    let mut system_out_count = 0;
    let mut cdata = String::new();
    loop {
        match reader.read_event().expect("output is well-formed XML") {
            Event::Start(start) => {
                depth += 1;
                if start.name().as_ref() == b"system-out" {
                    in_system_out = true;
                    system_out_count += 1;
                }
            }
            Event::End(end) => {
                depth -= 1;
                if end.name().as_ref() == b"system-out" {
                    in_system_out = false;
                }
            }
            Event::CData(data) => {
                assert!(in_system_out, "CDATA only appears inside system-out");
                cdata.push_str(std::str::from_utf8(&data).expect("CDATA is UTF-8"));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    assert_eq!(depth, 0, "all elements are closed");
    assert_eq!(system_out_count, 1, "exactly one system-out element");
    assert_eq!(cdata, "<xml>]]></xml>\n]]>]]>\ntail\n");
}

fn timestamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn math_suite() -> SuiteReport {
    let mut suite = SuiteReport::new("Math", timestamp());

    let mut adds = TestResult::new("adds", "Math", TestState::Passed);
    adds.set_time(Duration::from_millis(5));
    suite.add_test(adds);
    suite.passes += 1;

    let mut error = FailureDetail::new();
    error
        .set_message("expected 2 got 3")
        .set_actual(3)
        .set_expected(2);
    let mut subtracts = TestResult::new("subtracts", "Math", TestState::Failed);
    subtracts.set_time(Duration::from_millis(1)).set_error(error);
    suite.add_test(subtracts);
    suite.failures += 1;

    suite.set_time(Duration::from_millis(12));
    suite
}
