// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers shared by unit tests.

use crate::record::{TestOutcome, TestRecord};
use proptest::prelude::*;
use std::time::Duration;

/// A passing record with the given name and no traits.
pub(crate) fn record(name: &str) -> TestRecord {
    TestRecord::new(name, TestOutcome::Passed, Duration::ZERO)
}

/// Names drawn from a small pool so that generated tests share nesting path segments.
fn arb_name() -> impl Strategy<Value = String> {
    let ty = prop::sample::select(vec!["Outer", "Inner", "Cart", "WhenEmpty", "X"]);
    prop_oneof![
        // Plain qualified name.
        (ty.clone(), "[A-Z][a-z]{0,6}").prop_map(|(ty, method)| format!("Ns.{ty}.{method}")),
        // Nested, one or two levels deep.
        (ty.clone(), prop::collection::vec(ty.clone(), 1..=2), "[A-Z][a-z]{0,6}").prop_map(
            |(outer, nested, method)| format!("Ns.{outer}+{}.{method}", nested.join("+"))
        ),
        // Nested without the namespace.
        (ty.clone(), ty).prop_map(|(outer, inner)| format!("{outer}+{inner}.Method")),
        // Display names.
        "[a-z]{1,6} [a-z+]{1,6}",
    ]
}

fn arb_outcome() -> impl Strategy<Value = TestOutcome> {
    prop_oneof![
        Just(TestOutcome::Passed),
        Just(TestOutcome::Failed),
        Just(TestOutcome::Other("Skip".to_owned())),
    ]
}

/// A single record with up to three traits drawn from a small pool.
pub(crate) fn arb_record() -> impl Strategy<Value = TestRecord> {
    let test_trait = (
        prop::sample::select(vec!["Category", "Owner"]),
        prop::sample::select(vec!["Unit", "Math", "Slow"]),
    );
    (
        arb_name(),
        arb_outcome(),
        0..5_000u64,
        prop::collection::vec(test_trait, 0..=3),
    )
        .prop_map(|(name, outcome, millis, traits)| {
            traits.into_iter().fold(
                TestRecord::new(name, outcome, Duration::from_millis(millis)),
                |record, (name, value)| record.with_trait(name, value),
            )
        })
}

/// Up to 24 records.
pub(crate) fn arb_records() -> impl Strategy<Value = Vec<TestRecord>> {
    prop::collection::vec(arb_record(), 0..24)
}
