// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build the body of a `<failure>` element.
//!
//! The body is a unified diff from the actual to the expected value, followed by the stack
//! trace if requested. Whitespace that would otherwise be invisible in a rendered report is
//! replaced with placeholders such as `<tab>`.

use crate::FailureDetail;
use serde_json::Value;
use similar::TextDiff;
use std::borrow::Cow;

/// Returns the body of the `<failure>` element for `error`, unescaped.
pub fn failure_body(error: &FailureDetail, include_stack: bool) -> String {
    let mut body = String::new();

    if let (Some(actual), Some(expected)) = (&error.actual, &error.expected) {
        let diff = unified_diff(&coerce_value(actual), &coerce_value(expected));
        // Everything before the first hunk is the file header.
        let hunks = split_lines(&diff).skip_while(|line| !line.starts_with("@@"));
        push_cleaned_lines(&mut body, hunks);
    }

    if include_stack && let Some(stack) = &error.stack {
        if !body.is_empty() {
            body.push('\n');
        }
        // The first line of a stack trace restates the message.
        push_cleaned_lines(&mut body, split_lines(stack).skip(1));
    }

    body
}

/// Returns the text to diff for an assertion value.
///
/// Strings are used verbatim; everything else is serialized as compact JSON.
pub fn coerce_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

fn unified_diff(actual: &str, expected: &str) -> String {
    let diff = TextDiff::from_lines(actual, expected);
    let mut unified = diff.unified_diff();
    unified.header("actual", "expected");
    unified.to_string()
}

// Splits on `\n` only, keeping any `\r` so that CRLF line endings stay visible.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.strip_suffix('\n').unwrap_or(text).split('\n')
}

fn push_cleaned_lines<'a>(out: &mut String, lines: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for line in lines.filter_map(clean_up) {
        if !first {
            out.push('\n');
        }
        first = false;
        out.push_str(&line);
    }
}

// Drops diff bookkeeping lines and makes invisible characters visible.
fn clean_up(line: &str) -> Option<String> {
    if line.contains("@@") || line.contains("\\ No newline") {
        return None;
    }
    Some(escape_invisibles(line))
}

fn escape_invisibles(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => out.push_str("<tab>"),
            '\r' => out.push_str("<CR>"),
            '\n' => out.push_str("<LF>\n"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn detail(actual: Value, expected: Value) -> FailureDetail {
        let mut error = FailureDetail::new();
        error
            .set_message("assertion failed")
            .set_actual(actual)
            .set_expected(expected);
        error
    }

    #[test]
    fn string_values() {
        let body = failure_body(&detail(json!("foo"), json!("bar")), false);
        assert_eq!(body, "-foo\n+bar");
        assert!(!body.contains("@@"));
        assert!(!body.contains("No newline"));
    }

    #[test]
    fn numeric_values_are_coerced() {
        let body = failure_body(&detail(json!(3), json!(2)), false);
        assert_eq!(body, "-3\n+2");
    }

    #[test]
    fn structured_values_use_json() {
        let error = detail(json!({"a": [1, 2]}), json!({"a": [1]}));
        let body = failure_body(&error, false);
        assert_eq!(body, "-{\"a\":[1,2]}\n+{\"a\":[1]}");
    }

    #[test]
    fn multiline_diff_keeps_context() {
        let error = detail(json!("one\ntwo\nthree\n"), json!("one\n2\nthree\n"));
        let body = failure_body(&error, false);
        assert_eq!(
            body,
            indoc! {"
                 one
                -two
                +2
                 three"
            }
        );
    }

    #[test]
    fn invisibles_are_replaced() {
        let error = detail(json!("a\tb"), json!("a b"));
        let body = failure_body(&error, false);
        assert_eq!(body, "-a<tab>b\n+a b");
        assert_eq!(escape_invisibles("x\ry"), "x<CR>y");
        assert_eq!(escape_invisibles("x\ny"), "x<LF>\ny");
    }

    #[test]
    fn missing_side_produces_no_diff() {
        let mut error = FailureDetail::new();
        error.set_actual("foo");
        assert_eq!(failure_body(&error, true), "");
    }

    #[test]
    fn stack_is_appended_without_first_line() {
        let mut error = detail(json!("foo"), json!("bar"));
        error.set_stack("AssertionError: assertion failed\n    at check (math.js:3:9)\n\tat run");

        assert_eq!(failure_body(&error, false), "-foo\n+bar");
        assert_eq!(
            failure_body(&error, true),
            "-foo\n+bar\n    at check (math.js:3:9)\n<tab>at run"
        );

        error.actual = None;
        assert_eq!(
            failure_body(&error, true),
            "    at check (math.js:3:9)\n<tab>at run"
        );
    }

    #[test]
    fn carriage_returns_stay_visible() {
        let mut error = detail(json!("a\nb"), json!("a\r\nb"));
        assert_eq!(failure_body(&error, false), "-a\n+a<CR>\n b");

        error.actual = None;
        error.set_stack("Error: x\r\n    at a\r\n    at b");
        assert_eq!(failure_body(&error, true), "    at a<CR>\n    at b");
    }

    #[test]
    fn blank_stack_lines_are_kept() {
        let mut error = FailureDetail::new();
        error.set_stack("Error: x\n    at a\n\n    at b\n");
        assert_eq!(failure_body(&error, true), "    at a\n\n    at b");
    }
}
