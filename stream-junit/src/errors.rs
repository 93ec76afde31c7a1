// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// An error that occurs while writing part of a JUnit document.
///
/// Returned by the methods on [`JunitWriter`](crate::JunitWriter).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    /// The XML writer rejected an event.
    #[error("error serializing JUnit XML")]
    Xml(#[from] quick_xml::Error),

    /// The underlying sink failed.
    #[error("error writing JUnit XML to sink")]
    Io(#[from] std::io::Error),
}
