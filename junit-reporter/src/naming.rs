// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JUnit class names for test results.

use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;

/// How the `classname` attribute of a test case is derived.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClassNaming {
    /// The full title of the enclosing suite.
    SuiteTitle,

    /// The directory of the test file relative to `test_root`, with components joined by `.`,
    /// followed by `.` and the suite title.
    Package {
        /// The directory test files are relative to.
        test_root: Utf8PathBuf,
    },

    /// The path of the test file relative to `test_root`, without its extension.
    Path {
        /// The directory test files are relative to.
        test_root: Utf8PathBuf,
    },
}

impl ClassNaming {
    /// Returns the class name for a test in the suite `suite_title`, defined in `file`.
    ///
    /// Tests without a file, or whose file cannot be expressed relative to the test root, are
    /// named after their suite.
    pub fn classname(&self, suite_title: &str, file: Option<&Utf8Path>) -> String {
        let (test_root, file) = match (self, file) {
            (Self::SuiteTitle, _) | (_, None) => return suite_title.to_owned(),
            (Self::Package { test_root } | Self::Path { test_root }, Some(file)) => {
                (test_root, file)
            }
        };

        let Some(relative) = pathdiff::diff_utf8_paths(file, test_root) else {
            tracing::debug!("`{file}` is not relative to `{test_root}`, using suite title");
            return suite_title.to_owned();
        };

        match self {
            Self::Path { .. } => relative
                .with_extension("")
                .components()
                .map(|component| component.as_str())
                .join("/"),
            _ => {
                let package = relative
                    .parent()
                    .map(|dir| dir.components().map(|component| component.as_str()).join("."))
                    .unwrap_or_default();
                if package.is_empty() {
                    suite_title.to_owned()
                } else {
                    format!("{package}.{suite_title}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn package(root: &str) -> ClassNaming {
        ClassNaming::Package {
            test_root: root.into(),
        }
    }

    fn path(root: &str) -> ClassNaming {
        ClassNaming::Path {
            test_root: root.into(),
        }
    }

    #[test_case(ClassNaming::SuiteTitle, Some("unit/math/add.test") => "Math adds"; "suite title")]
    #[test_case(package("unit"), Some("unit/math/add.test") => "math.Math adds"; "package")]
    #[test_case(package("/work/test"), Some("/work/test/a/b/c.js") => "a.b.Math adds"; "nested package")]
    #[test_case(package("/work/test"), Some("/work/test/top.js") => "Math adds"; "package at root")]
    #[test_case(package("unit"), None => "Math adds"; "package without file")]
    #[test_case(path("/work/test"), Some("/work/test/math/add.test.js") => "math/add.test"; "path")]
    #[test_case(path("/work/test"), Some("/work/other/add.js") => "../other/add"; "path outside root")]
    #[test_case(path("/work/test"), Some("relative/add.js") => "Math adds"; "path not relative to root")]
    #[test_case(path("/work/test"), None => "Math adds"; "path without file")]
    fn classnames(naming: ClassNaming, file: Option<&str>) -> String {
        naming.classname("Math adds", file.map(Utf8Path::new))
    }
}
