// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stream JUnit XML reports one test suite at a time.
//!
//! A [`JunitWriter`] writes the `<testsuites>` document incrementally: each
//! [`SuiteReport`] is serialized and flushed as soon as it is complete, so only
//! one suite is ever held in memory and a report that is cut short is still
//! readable up to its last complete suite.

pub mod diff;
mod errors;
mod report;
mod serialize;
pub mod text;

pub use errors::*;
pub use report::*;
pub use serialize::*;
