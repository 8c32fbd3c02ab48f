// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console output for test run summaries.
//!
//! The main type here is [`SummaryReporter`], which is constructed via a
//! [`SummaryReporterBuilder`].

mod duration;
mod helpers;
mod imp;

pub use imp::*;
