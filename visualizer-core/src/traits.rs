// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deduplicating the traits carried by a set of tests.

use crate::record::{TestRecord, Trait};
use indexmap::IndexSet;

/// Returns the distinct traits carried by `tests`.
///
/// Traits are returned in the order they are first seen: tests in iteration order, and within a
/// test its traits in document order.
pub fn unique_traits<'a, I>(tests: I) -> Vec<&'a Trait>
where
    I: IntoIterator<Item = &'a TestRecord>,
{
    let unique: IndexSet<&'a Trait> = tests
        .into_iter()
        .flat_map(|test| test.traits.iter())
        .collect();
    unique.into_iter().collect()
}
