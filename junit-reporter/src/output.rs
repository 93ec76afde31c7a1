// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration of reporter output, such as colorization and diagnostic logging.

use owo_colors::{OwoColorize, Style, style};
use std::fmt;
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// The environment variable that controls which diagnostics [`Color::init`] shows.
///
/// The value uses the [`Targets`] syntax, for example `junit_reporter=debug`.
pub const LOG_ENV: &str = "JUNIT_REPORTER_LOG";

/// Specifies whether to colorize output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub enum Color {
    /// Colorize if the stream supports it and `NO_COLOR` is not set.
    #[default]
    Auto,

    /// Always try to colorize.
    Always,

    /// Never try to colorize.
    Never,
}

impl Color {
    /// Installs a global `tracing` subscriber that prints diagnostics to stderr.
    ///
    /// This is meant for hosts that have no subscriber of their own. Calling it more than once is
    /// a no-op.
    pub fn init(self) {
        let mut log_styles = LogStyles::default();
        if self.should_colorize(supports_color::Stream::Stderr) {
            log_styles.colorize();
        }

        INIT_LOGGER.call_once(|| {
            let level_str = std::env::var(LOG_ENV).unwrap_or_default();

            // If the level string is empty or unparseable, use the standard level filter instead.
            let (targets, parse_error) = if level_str.is_empty() {
                (Targets::new().with_default(LevelFilter::INFO), None)
            } else {
                match level_str.parse::<Targets>() {
                    Ok(targets) => (targets, None),
                    Err(error) => (Targets::new().with_default(LevelFilter::INFO), Some(error)),
                }
            };

            let layer = tracing_subscriber::fmt::layer()
                .event_format(SimpleFormatter { styles: log_styles })
                .with_writer(std::io::stderr)
                .with_filter(targets);

            // Another subscriber may already be installed; leave it in place.
            if tracing_subscriber::registry().with(layer).try_init().is_err() {
                return;
            }

            if let Some(error) = parse_error {
                tracing::warn!("ignoring invalid {LOG_ENV} value `{level_str}`: {error}");
            }
        });
    }

    /// Determines whether output should be colorized based on whether the given stream supports
    /// this.
    pub fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Color::Auto => supports_color::on_cached(stream).is_some(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

struct SimpleFormatter {
    styles: LogStyles,
}

impl<S, N> FormatEvent<S, N> for SimpleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        match *metadata.level() {
            Level::ERROR => write!(writer, "{}: ", "error".style(self.styles.error))?,
            Level::WARN => write!(writer, "{}: ", "warning".style(self.styles.warning))?,
            Level::INFO => write!(writer, "{}: ", "info".style(self.styles.info))?,
            Level::DEBUG => write!(writer, "{}: ", "debug".style(self.styles.debug))?,
            Level::TRACE => write!(writer, "{}: ", "trace".style(self.styles.trace))?,
        }

        let mut visitor = MessageVisitor {
            writer: &mut writer,
            // Show other fields for debug or trace output.
            show_other: *metadata.level() >= Level::DEBUG,
            error: None,
        };

        event.record(&mut visitor);

        if let Some(error) = visitor.error {
            return Err(error);
        }

        writeln!(writer)
    }
}

static MESSAGE_FIELD: &str = "message";

struct MessageVisitor<'writer, 'a> {
    writer: &'a mut format::Writer<'writer>,
    show_other: bool,
    error: Option<fmt::Error>,
}

impl Visit for MessageVisitor<'_, '_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            if let Err(error) = write!(self.writer, "{value:?}") {
                self.error = Some(error);
            }
        } else if self.show_other
            && let Err(error) = write!(self.writer, "; {} = {:?}", field.name(), value)
        {
            self.error = Some(error);
        }
    }
}

static INIT_LOGGER: std::sync::Once = std::sync::Once::new();

#[derive(Debug, Default)]
struct LogStyles {
    error: Style,
    warning: Style,
    info: Style,
    debug: Style,
    trace: Style,
}

impl LogStyles {
    fn colorize(&mut self) {
        self.error = style().red().bold();
        self.warning = style().yellow().bold();
        self.info = style().bold();
        self.debug = style().bold();
        self.trace = style().dimmed();
    }
}
