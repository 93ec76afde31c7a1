// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use owo_colors::Style;
use std::time::Duration;

#[derive(Debug, Default)]
pub(super) struct Styles {
    pub(super) suite: Style,
    pub(super) count: Style,
    pub(super) pass: Style,
    pub(super) fail: Style,
    pub(super) skip: Style,
    pub(super) error: Style,
    pub(super) dimmed: Style,
}

impl Styles {
    pub(super) fn colorize(&mut self) {
        self.suite = Style::new().bold();
        self.count = Style::new().bold();
        self.pass = Style::new().green();
        self.fail = Style::new().red();
        self.skip = Style::new().yellow();
        self.error = Style::new().red().bold();
        self.dimmed = Style::new().dimmed();
    }
}

/// Formats an elapsed time the way the summary shows it: milliseconds below a second, seconds
/// with one decimal above.
pub(super) fn format_elapsed(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;
    use test_case::test_case;

    #[test]
    fn colorize_sets_styles() {
        let mut styles = Styles::default();
        assert_eq!("ok".style(styles.pass).to_string(), "ok");

        styles.colorize();
        assert_eq!("ok".style(styles.pass).to_string(), "\u{1b}[32mok\u{1b}[0m");
    }

    #[test_case(Duration::ZERO => "0ms"; "zero")]
    #[test_case(Duration::from_millis(12) => "12ms"; "millis")]
    #[test_case(Duration::from_millis(999) => "999ms"; "just under a second")]
    #[test_case(Duration::from_millis(1000) => "1.0s"; "one second")]
    #[test_case(Duration::from_millis(65_432) => "65.4s"; "over a minute")]
    fn elapsed(elapsed: Duration) -> String {
        format_elapsed(elapsed)
    }
}
