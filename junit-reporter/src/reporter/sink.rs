// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::WriteEventError;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

/// Where the JUnit document is written.
#[derive(Debug)]
pub(super) enum ReportSink {
    File {
        path: Utf8PathBuf,
        writer: BufWriter<File>,
    },
    Discard,
}

impl ReportSink {
    /// Opens the report file for `report_path`, creating parent directories as needed.
    ///
    /// If `report_path` is an existing directory, the report is written to
    /// `<epoch-millis>.xml` inside it.
    pub(super) fn open(
        report_path: &Utf8Path,
        started_at: DateTime<Utc>,
    ) -> Result<Self, WriteEventError> {
        let path = if report_path.is_dir() {
            report_path.join(format!("{}.xml", started_at.timestamp_millis()))
        } else {
            if let Some(parent) = report_path.parent()
                && !parent.as_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|error| WriteEventError::Fs {
                    file: parent.to_path_buf(),
                    error,
                })?;
            }
            report_path.to_path_buf()
        };

        let file = File::create(&path).map_err(|error| WriteEventError::Fs {
            file: path.clone(),
            error,
        })?;
        tracing::debug!("writing JUnit report to {path}");
        Ok(Self::File {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Returns the path being written to, if any.
    pub(super) fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Discard => None,
        }
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File { writer, .. } => writer.write(buf),
            Self::Discard => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File { writer, .. } => writer.flush(),
            Self::Discard => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use chrono::TimeZone;

    fn started_at() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_792_411_200_123)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn creates_parent_directories() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let report_path = dir.path().join("nested/reports/junit.xml");
        let mut sink = ReportSink::open(&report_path, started_at()).expect("sink opens");
        assert_eq!(sink.path(), Some(report_path.as_path()));

        sink.write_all(b"<testsuites/>\n").expect("write succeeds");
        sink.flush().expect("flush succeeds");
        assert_eq!(
            std::fs::read_to_string(&report_path).expect("report exists"),
            "<testsuites/>\n"
        );
    }

    #[test]
    fn existing_directory_gets_timestamped_file() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let sink = ReportSink::open(dir.path(), started_at()).expect("sink opens");
        assert_eq!(
            sink.path(),
            Some(dir.path().join("1792411200123.xml").as_path())
        );
    }

    #[test]
    fn unwritable_parent() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").expect("wrote file");

        let error = ReportSink::open(&blocker.join("junit.xml"), started_at())
            .expect_err("parent is a file");
        assert!(
            matches!(&error, WriteEventError::Fs { file, .. } if *file == blocker),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn discard() {
        let mut sink = ReportSink::Discard;
        assert_eq!(sink.path(), None);
        sink.write_all(b"ignored").expect("discarding never fails");
    }
}
