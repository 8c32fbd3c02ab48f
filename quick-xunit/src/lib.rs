// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read xUnit v2+ XML test reports in Rust.
//!
//! The format is documented at <https://xunit.net/docs/format-xml-v2>. Only reading is supported:
//! the reader is lenient about elements and attributes it does not know about, and strict about
//! numeric attributes it does.

#![warn(missing_docs)]

mod deserialize;
mod errors;
mod report;

pub use errors::*;
pub use report::*;
