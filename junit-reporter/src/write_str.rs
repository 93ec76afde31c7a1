// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Support for string-only writes.
//!
//! The status stream and the console only ever emit text. [`WriteStr`] is a narrower
//! [`std::fmt::Write`] that reports [`std::io::Error`]s, so a closed stdout surfaces as an I/O
//! error instead of an opaque [`std::fmt::Error`].

use std::{
    fmt,
    io::{self, Write},
};

/// A text sink for status lines and console output.
pub trait WriteStr {
    /// Writes a string to the sink.
    fn write_str(&mut self, s: &str) -> io::Result<()>;

    /// Flushes anything the sink has buffered.
    fn write_str_flush(&mut self) -> io::Result<()>;

    /// Writes formatted text to the sink, so that `write!` and `writeln!` work.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match args.as_str() {
            Some(s) => self.write_str(s),
            None => self.write_str(&args.to_string()),
        }
    }
}

impl WriteStr for String {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl WriteStr for io::Stdout {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.lock().write_all(s.as_bytes())
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<T: WriteStr + ?Sized> WriteStr for Box<T> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        (**self).write_str(s)
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        (**self).write_str_flush()
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        (**self).write_fmt(args)
    }
}
