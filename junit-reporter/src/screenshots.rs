// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attaching screenshots to failed tests.
//!
//! Jenkins shows files referenced by `[[ATTACHMENT|path]]` markers next to a test case. This
//! module decides which file, if any, each failed test in a suite gets.

use crate::{config::ScreenshotMode, errors::ScreenshotError};
use camino::{Utf8Path, Utf8PathBuf};
use stream_junit::{SuiteReport, TestResult, TestState};

/// Assigns screenshots to the failed tests of a suite.
#[derive(Clone, Debug)]
pub struct Screenshots {
    mode: ScreenshotMode,
    dir: Utf8PathBuf,
    prefix: Option<String>,
    extension: String,
}

impl Screenshots {
    /// Creates a new `Screenshots` that looks for files in `dir`.
    ///
    /// If `prefix` is `None`, the full title of each suite is used as its prefix.
    pub fn new(
        mode: ScreenshotMode,
        dir: impl Into<Utf8PathBuf>,
        prefix: Option<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            dir: dir.into(),
            prefix,
            extension: extension.into(),
        }
    }

    /// Returns the directory screenshots are looked up in.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Sets the attachment of every failed test in `report`.
    ///
    /// In loop mode, the directory is listed once per call. If it cannot be listed, no
    /// attachments are set and the error is returned.
    pub fn attach(&self, report: &mut SuiteReport) -> Result<(), ScreenshotError> {
        let prefix = self.prefix.as_deref().unwrap_or(&report.name).to_owned();

        match self.mode {
            ScreenshotMode::Off => {}
            ScreenshotMode::Loop => {
                let mut available = self.list(&prefix)?.into_iter();
                for test in failed_tests(report) {
                    let Some(file_name) = available.next() else {
                        tracing::warn!(
                            "ran out of screenshots matching `{prefix}` in `{}` at test `{}`",
                            self.dir,
                            test.title,
                        );
                        break;
                    };
                    test.set_attachment(self.dir.join(file_name));
                }
            }
            ScreenshotMode::Named => {
                for test in failed_tests(report) {
                    let file_name = format!(
                        "{prefix}{}{}.{}",
                        test.classname, test.title, self.extension
                    );
                    test.set_attachment(self.dir.join(file_name));
                }
            }
        }

        Ok(())
    }

    // Lists file names in the screenshot directory that contain `prefix`, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>, ScreenshotError> {
        let entries = self
            .dir
            .read_dir_utf8()
            .map_err(|error| ScreenshotError::new(&self.dir, error))?;

        let mut file_names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|error| ScreenshotError::new(&self.dir, error))?;
            if entry.file_name().contains(prefix) {
                file_names.push(entry.file_name().to_owned());
            }
        }
        file_names.sort_unstable();
        Ok(file_names)
    }
}

fn failed_tests(report: &mut SuiteReport) -> impl Iterator<Item = &mut TestResult> {
    report
        .tests
        .iter_mut()
        .filter(|test| test.state == TestState::Failed)
}
