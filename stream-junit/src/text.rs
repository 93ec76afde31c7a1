// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text helpers for JUnit XML: escaping, sanitizing, and value formatting.

use chrono::{DateTime, Utc};
use std::{borrow::Cow, time::Duration};

/// Escapes `&`, `<`, `>`, `"` and `'` for use in XML text or attribute values.
pub fn escape(input: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(input)
}

/// Reverses [`escape`].
pub fn unescape(input: &str) -> Result<Cow<'_, str>, quick_xml::escape::EscapeError> {
    quick_xml::escape::unescape(input)
}

/// Returns true if `c` may not appear in XML 1.0 character data.
///
/// Besides the C0 controls that XML forbids outright, this also rejects DEL, the C1 controls
/// and the byte-order-mark-like code points, which are legal but break many JUnit consumers.
pub fn is_invalid_xml_char(c: char) -> bool {
    matches!(
        c,
        '\x00'..='\x08'
            | '\x0b'
            | '\x0c'
            | '\x0e'..='\x1f'
            | '\x7f'..='\u{9f}'
            | '\u{feff}'
            | '\u{fffe}'
            | '\u{ffff}'
    )
}

/// Removes characters that are invalid in XML text.
///
/// Rust strings cannot contain unpaired surrogates, so only the characters matched by
/// [`is_invalid_xml_char`] need to be dropped.
pub fn strip_invalid_xml_chars(input: &str) -> Cow<'_, str> {
    if input.contains(is_invalid_xml_char) {
        Cow::Owned(input.replace(is_invalid_xml_char, ""))
    } else {
        Cow::Borrowed(input)
    }
}

/// Splits `input` into pieces that can each be written as their own CDATA section.
///
/// Every `]]>` is broken between `]]` and `>`, so writing the pieces back to back as
/// `<![CDATA[piece]]>` reproduces the input without any section ending early.
pub fn cdata_segments(input: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(input);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find("]]>") {
            Some(index) => {
                let (head, tail) = current.split_at(index + 2);
                rest = Some(tail);
                Some(head)
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

// Serialize time as seconds with 3 decimal points.
pub(crate) fn serialize_time(time: &Duration) -> String {
    format!("{:.3}", time.as_secs_f64())
}

// Serialize timestamps as an HTTP-style UTC date, e.g. "Mon, 19 Oct 2026 12:00:00 GMT".
pub(crate) fn serialize_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
