// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [visualizo](https://crates.io/crates/visualizo): turning the flat list of
//! tests in an xUnit report into trees grouped by trait, and printing them.
//!
//! The basic flow is:
//!
//! 1. [`input::load_report`] reads a report into a [`input::RunSummary`].
//! 2. [`group::group_by_trait`] splits an assembly's tests into one [`tree::TestTree`] for tests
//!    without traits, and one per distinct trait.
//! 3. [`reporter::SummaryReporter`] walks the trees in pre-order and prints them.

pub mod config;
pub mod errors;
pub mod friendly;
pub mod group;
pub mod input;
pub mod qualified;
pub mod record;
pub mod reporter;
#[cfg(test)]
mod test_helpers;
pub mod traits;
pub mod tree;
