// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A console that test code logs to, and that can be captured while a test runs.
//!
//! [`Console`] is a cheaply cloneable handle: the test runner hands one to test bodies, and the
//! reporter keeps another. While a [`CaptureGuard`] is alive, every line logged to the console is
//! stored instead of being written out, and is returned by [`CaptureGuard::finish`].

use crate::write_str::WriteStr;
use itertools::Itertools;
use std::{cell::RefCell, fmt, io, rc::Rc};

/// A shared handle to a line-oriented log sink.
#[derive(Clone)]
pub struct Console {
    inner: Rc<RefCell<ConsoleInner>>,
}

struct ConsoleInner {
    sink: Box<dyn WriteStr>,
    capture: Option<Capture>,
    next_generation: u64,
}

struct Capture {
    generation: u64,
    entries: Vec<String>,
}

impl Console {
    /// Creates a console that writes lines to `sink` when not capturing.
    pub fn new(sink: impl WriteStr + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ConsoleInner {
                sink: Box::new(sink),
                capture: None,
                next_generation: 0,
            })),
        }
    }

    /// Creates a console that writes lines to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Logs a line made of `args` separated by single spaces.
    ///
    /// `console.log(&[&"value:", &42])` logs `value: 42`.
    pub fn log(&self, args: &[&dyn fmt::Display]) {
        self.log_line(args.iter().join(" "));
    }

    /// Logs a preformatted line.
    pub fn log_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_line(args.to_string());
    }

    /// Returns true if output is currently being captured.
    pub fn is_capturing(&self) -> bool {
        self.inner.borrow().capture.is_some()
    }

    /// Starts capturing logged lines.
    ///
    /// Any capture already in progress is discarded. Normal output resumes when the returned
    /// guard is finished or dropped.
    pub fn capture(&self) -> CaptureGuard {
        let mut inner = self.inner.borrow_mut();
        let generation = inner.next_generation;
        inner.next_generation += 1;
        if inner.capture.is_some() {
            tracing::debug!("discarding unfinished console capture");
        }
        inner.capture = Some(Capture {
            generation,
            entries: Vec::new(),
        });

        CaptureGuard {
            console: self.clone(),
            generation,
        }
    }

    fn log_line(&self, line: String) {
        let mut inner = self.inner.borrow_mut();
        let inner = &mut *inner;
        match &mut inner.capture {
            Some(capture) => capture.entries.push(line),
            None => {
                if let Err(error) = writeln!(inner.sink, "{line}") {
                    tracing::warn!("failed to write console output: {error}");
                }
            }
        }
    }

    // Ends the capture with the given generation, if it is still the active one.
    fn end_capture(&self, generation: u64) -> Vec<String> {
        let mut inner = self.inner.borrow_mut();
        match inner.capture.take() {
            Some(capture) if capture.generation == generation => capture.entries,
            other => {
                inner.capture = other;
                Vec::new()
            }
        }
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("is_capturing", &self.is_capturing())
            .finish_non_exhaustive()
    }
}

/// Captures console output until finished or dropped.
///
/// Returned by [`Console::capture`].
#[derive(Debug)]
#[must_use = "output is only captured while the guard is alive"]
pub struct CaptureGuard {
    console: Console,
    generation: u64,
}

impl CaptureGuard {
    /// Stops capturing and returns the lines logged since the capture started.
    ///
    /// If a newer capture has replaced this one, nothing is returned and the newer capture is
    /// left running.
    pub fn finish(self) -> Vec<String> {
        // Drop runs afterwards and finds nothing left to end.
        self.console.end_capture(self.generation)
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.console.end_capture(self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<String>>);

    impl WriteStr for SharedSink {
        fn write_str(&mut self, s: &str) -> io::Result<()> {
            self.0.borrow_mut().push_str(s);
            Ok(())
        }

        fn write_str_flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn capture_redirects_output() {
        let sink = SharedSink::default();
        let console = Console::new(sink.clone());

        console.log(&[&"before"]);
        let guard = console.capture();
        console.log(&[&"value:", &42]);
        console.log_fmt(format_args!("{} items", 3));
        assert!(console.is_capturing());
        let entries = guard.finish();
        console.log(&[&"after"]);

        assert_eq!(entries, vec!["value: 42", "3 items"]);
        assert_eq!(*sink.0.borrow(), "before\nafter\n");
        assert!(!console.is_capturing());
    }

    #[test]
    fn dropped_guard_restores_output() {
        let sink = SharedSink::default();
        let console = Console::new(sink.clone());

        {
            let _guard = console.capture();
            console.log(&[&"lost"]);
        }
        console.log(&[&"kept"]);

        assert_eq!(*sink.0.borrow(), "kept\n");
    }

    #[test]
    fn stale_guard_leaves_newer_capture() {
        let console = Console::new(String::new());

        let first = console.capture();
        let second = console.capture();
        console.log(&[&"second"]);
        drop(first);
        assert!(console.is_capturing(), "the newer capture is still active");
        console.log(&[&"still second"]);

        assert_eq!(second.finish(), vec!["second", "still second"]);
        assert!(!console.is_capturing());
    }

    #[test]
    fn guard_is_released_on_panic() {
        let console = Console::new(String::new());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = console.capture();
            panic!("test body panicked");
        }));
        assert!(result.is_err());
        assert!(!console.is_capturing());
    }
}
