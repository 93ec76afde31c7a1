// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for streaming JUnit reports out of test runner events.
//!
//! A [`JunitReporter`](reporter::JunitReporter) consumes [`RunnerEvent`](reporter::RunnerEvent)s,
//! groups test results by suite with a [`SuiteAggregator`](aggregator::SuiteAggregator), and
//! writes each suite out as soon as it is complete.
//!
//! For the data model and the XML writer, see the [`stream_junit`] crate.

pub mod aggregator;
pub mod config;
pub mod console;
pub mod errors;
pub mod naming;
pub mod output;
pub mod reporter;
pub mod screenshots;
pub mod write_str;
