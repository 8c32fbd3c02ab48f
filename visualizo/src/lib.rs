// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Render xUnit v2 test reports as trees in the terminal.
//!
//! This crate contains the `visualizo` command-line interface. The work of grouping and rendering
//! tests is done by [`visualizer_core`].

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::{OutputContext, OutputWriter};
