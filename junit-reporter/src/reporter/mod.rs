// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report the events of a test run as JUnit XML, with progress on a status stream.
//!
//! The main type here is [`JunitReporter`], which is constructed via a [`ReporterBuilder`].

mod displayer;
mod events;
mod helpers;
mod imp;
mod sink;

pub use displayer::*;
pub use events::*;
pub use imp::*;
