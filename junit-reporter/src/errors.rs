// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the reporter.

use camino::{FromPathBufError, Utf8PathBuf};
use config::ConfigError;
use std::{error, fmt};
use stream_junit::SerializeError;
use thiserror::Error;

/// An error that occurred while reading the reporter configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigReadError {
    /// The configuration could not be parsed or deserialized.
    #[error(
        "failed to parse reporter config{}",
        .config_file.as_ref().map_or_else(String::new, |file| format!(" at `{file}`"))
    )]
    Parse {
        /// The config file that was layered on top of the defaults, if any.
        config_file: Option<Utf8PathBuf>,

        /// The underlying error.
        #[source]
        error: ConfigError,
    },

    /// The working directory could not be determined.
    #[error("failed to retrieve current directory")]
    WorkingDir(#[source] std::io::Error),

    /// The working directory was not valid UTF-8.
    #[error("current directory is invalid UTF-8")]
    NonUtf8WorkingDir(#[source] FromPathBufError),
}

/// An error that occurs while writing an event.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteEventError {
    /// An error occurred while writing the event to the status output.
    #[error("error writing to output")]
    Io(#[source] std::io::Error),

    /// An error occurred while operating on the file system.
    #[error("error operating on path {file}")]
    Fs {
        /// The file being operated on.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// An error occurred while producing JUnit XML.
    #[error(
        "error writing JUnit output{}",
        .file.as_ref().map_or_else(String::new, |file| format!(" to {file}"))
    )]
    Junit {
        /// The output file, or `None` if output is being discarded.
        file: Option<Utf8PathBuf>,

        /// The underlying error.
        #[source]
        error: SerializeError,
    },
}

/// An error that occurred while looking up screenshots for failed tests.
#[derive(Debug, Error)]
#[error("failed to list screenshots in `{dir}`")]
pub struct ScreenshotError {
    dir: Utf8PathBuf,
    #[source]
    error: std::io::Error,
}

impl ScreenshotError {
    pub(crate) fn new(dir: impl Into<Utf8PathBuf>, error: std::io::Error) -> Self {
        Self {
            dir: dir.into(),
            error,
        }
    }

    /// The directory that could not be listed.
    pub fn dir(&self) -> &Utf8PathBuf {
        &self.dir
    }
}

/// Displays an error along with the chain of errors that caused it.
///
/// ```text
/// error writing JUnit output to target/junit.xml
///   caused by:
///   - error writing JUnit XML to sink
///   - No space left on device (os error 28)
/// ```
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: error::Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: error::Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let Some(mut cause) = self.error.source() else {
            return Ok(());
        };
        write!(f, "\n  caused by:")?;
        loop {
            // Multi-line causes are indented to line up under the bullet.
            let message = cause.to_string();
            write!(f, "\n  - {}", message.replace('\n', "\n    "))?;
            match cause.source() {
                Some(next) => cause = next,
                None => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_chain_lists_causes() {
        let error = WriteEventError::Fs {
            file: "target/junit.xml".into(),
            error: std::io::Error::other("disk full\nretry later"),
        };
        assert_eq!(
            DisplayErrorChain::new(&error).to_string(),
            indoc! {"
                error operating on path target/junit.xml
                  caused by:
                  - disk full
                    retry later"
            }
        );
    }

    #[test]
    fn error_without_source() {
        let error = std::io::Error::other("plain");
        assert_eq!(DisplayErrorChain::new(&error).to_string(), "plain");
    }

    #[test]
    fn junit_error_without_file() {
        let error = WriteEventError::Junit {
            file: None,
            error: SerializeError::Io(std::io::Error::other("broken pipe")),
        };
        assert_eq!(error.to_string(), "error writing JUnit output");
    }
}
