// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporter configuration.
//!
//! Configuration is read in layers, each overriding the one before:
//!
//! 1. the built-in defaults in [`ReporterConfig::DEFAULT_CONFIG`];
//! 2. an optional TOML file;
//! 3. environment variables, listed in [`ReporterConfig::ENV_VARS`].

use crate::{errors::ConfigReadError, naming::ClassNaming};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Configuration for a [`JunitReporter`](crate::reporter::JunitReporter).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReporterConfig {
    #[serde(default)]
    report_path: Option<Utf8PathBuf>,
    report_name: String,
    include_stack: bool,
    package_naming: bool,
    sonar_naming: bool,
    test_root_dir: Utf8PathBuf,
    screenshots: ScreenshotMode,
    #[serde(default)]
    image_prefix: Option<String>,
    image_extension: String,
    #[serde(skip)]
    working_dir: Utf8PathBuf,
}

impl ReporterConfig {
    /// The default configuration, as TOML.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Environment variables that override configuration keys.
    ///
    /// Variables that are set to an empty string are ignored.
    pub const ENV_VARS: &'static [(&'static str, &'static str)] = &[
        ("JUNIT_REPORT_PATH", "report-path"),
        ("JUNIT_REPORT_NAME", "report-name"),
        ("JUNIT_REPORT_STACK", "include-stack"),
        ("JUNIT_REPORT_PACKAGES", "package-naming"),
        ("JENKINS_REPORTER_ENABLE_SONAR", "sonar-naming"),
        ("JENKINS_REPORTER_TEST_DIR", "test-root-dir"),
    ];

    const BOOL_KEYS: &'static [&'static str] = &["include-stack", "package-naming", "sonar-naming"];

    /// Reads configuration from the defaults, an optional file, and the given environment.
    ///
    /// `env_vars` is usually [`std::env::vars`]; it is passed in so that the process environment
    /// is not consulted implicitly.
    pub fn from_sources<K, V>(
        config_file: Option<&Utf8Path>,
        env_vars: impl IntoIterator<Item = (K, V)>,
        working_dir: impl Into<Utf8PathBuf>,
    ) -> Result<Self, ConfigReadError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let parse_error = |error| ConfigReadError::Parse {
            config_file: config_file.map(Utf8Path::to_path_buf),
            error,
        };

        let mut builder = Self::make_default_config();
        if let Some(config_file) = config_file {
            builder = builder.add_source(File::new(config_file.as_str(), FileFormat::Toml));
        }
        for (name, value) in env_vars {
            let (name, value) = (name.as_ref(), value.as_ref());
            if value.is_empty() {
                continue;
            }
            let Some(&(_, key)) = Self::ENV_VARS.iter().find(|(var, _)| *var == name) else {
                continue;
            };
            tracing::debug!("config key `{key}` overridden by {name}");
            let overridden = if Self::BOOL_KEYS.contains(&key) {
                builder.set_override(key, env_flag(value))
            } else {
                builder.set_override(key, value)
            };
            builder = overridden.map_err(parse_error)?;
        }

        let config = builder.build().map_err(parse_error)?;

        let mut unknown = BTreeSet::new();
        let mut this: Self = serde_ignored::deserialize(config, |path: serde_ignored::Path| {
            unknown.insert(path.to_string());
        })
        .map_err(parse_error)?;

        if !unknown.is_empty() {
            tracing::warn!(
                "ignoring unknown reporter config keys: {}",
                itertools::join(&unknown, ", ")
            );
        }

        this.working_dir = working_dir.into();
        Ok(this)
    }

    /// Reads configuration from the defaults, an optional file, and the process environment,
    /// rooted at the current directory.
    pub fn from_env(config_file: Option<&Utf8Path>) -> Result<Self, ConfigReadError> {
        let working_dir = std::env::current_dir().map_err(ConfigReadError::WorkingDir)?;
        let working_dir =
            Utf8PathBuf::try_from(working_dir).map_err(ConfigReadError::NonUtf8WorkingDir)?;
        Self::from_sources(config_file, std::env::vars(), working_dir)
    }

    /// Returns the configured report path, if any.
    ///
    /// Relative paths are resolved against the working directory.
    pub fn report_path(&self) -> Option<Utf8PathBuf> {
        self.report_path
            .as_ref()
            .map(|path| self.working_dir.join(path))
    }

    /// Returns the name of the top-level `<testsuites>` element.
    pub fn report_name(&self) -> &str {
        &self.report_name
    }

    /// Returns whether stack traces are appended to failure bodies.
    pub fn include_stack(&self) -> bool {
        self.include_stack
    }

    /// Returns the screenshot attachment mode.
    pub fn screenshots(&self) -> ScreenshotMode {
        self.screenshots
    }

    /// Returns the screenshot file name prefix, if one is configured.
    pub fn image_prefix(&self) -> Option<&str> {
        self.image_prefix.as_deref()
    }

    /// Returns the screenshot file extension for named mode.
    pub fn image_extension(&self) -> &str {
        &self.image_extension
    }

    /// Returns the working directory that relative paths are resolved against.
    pub fn working_dir(&self) -> &Utf8Path {
        &self.working_dir
    }

    /// Returns the class naming scheme described by this configuration.
    pub fn class_naming(&self) -> ClassNaming {
        let test_root = self.working_dir.join(&self.test_root_dir);
        if self.sonar_naming {
            ClassNaming::Path { test_root }
        } else if self.package_naming {
            ClassNaming::Package { test_root }
        } else {
            ClassNaming::SuiteTitle
        }
    }

    /// Sets the working directory.
    pub fn with_working_dir(mut self, working_dir: impl Into<Utf8PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    /// Sets the report path.
    pub fn with_report_path(mut self, report_path: impl Into<Utf8PathBuf>) -> Self {
        self.report_path = Some(report_path.into());
        self
    }

    /// Sets the screenshot attachment mode.
    pub fn with_screenshots(mut self, screenshots: ScreenshotMode) -> Self {
        self.screenshots = screenshots;
        self
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }
}

/// How screenshots are attached to failed tests.
#[derive(Copy, Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenshotMode {
    /// No screenshots are attached.
    #[default]
    Off,

    /// Screenshots in the report directory are handed out to failed tests in sorted order.
    Loop,

    /// Each failed test gets the screenshot named after its class name and title.
    Named,
}

// Environment flags are on unless explicitly turned off.
fn env_flag(value: &str) -> bool {
    !matches!(
        value.to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
