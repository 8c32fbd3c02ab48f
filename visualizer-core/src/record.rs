// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core value types for test results.
//!
//! These types carry no knowledge of the report format they were read from. See
//! [`input`](crate::input) for the mapping from xUnit documents.

use crate::{friendly, qualified};
use std::{fmt, time::Duration};

/// A name/value tag attached to a test.
///
/// Two traits are the same if and only if both the name and the value match exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Trait {
    /// The trait name, for example `Category`.
    pub name: String,

    /// The trait value, for example `Integration`.
    pub value: String,
}

impl Trait {
    /// Creates a new trait.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.value)
    }
}

/// The outcome of a single test.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TestOutcome {
    /// The test passed.
    Passed,

    /// The test failed.
    Failed,

    /// Any other result, such as `Skip` or `NotRun`, kept verbatim.
    Other(String),
}

impl TestOutcome {
    /// Maps a result string as written by the test runner.
    pub fn from_result(result: &str) -> Self {
        match result {
            "Pass" => Self::Passed,
            "Fail" => Self::Failed,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns true if the test passed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns true if the test failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "Pass"),
            Self::Failed => write!(f, "Fail"),
            Self::Other(result) => write!(f, "{result}"),
        }
    }
}

/// The result of a single test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRecord {
    /// The qualified name: dot-separated namespaces and types, `+` between nested types.
    ///
    /// Names containing a space are display names and are never decomposed.
    pub name: String,

    /// The outcome.
    pub outcome: TestOutcome,

    /// How long the test took.
    pub time: Duration,

    /// The traits attached to this test, in document order.
    pub traits: Vec<Trait>,
}

impl TestRecord {
    /// Creates a new record without any traits.
    pub fn new(name: impl Into<String>, outcome: TestOutcome, time: Duration) -> Self {
        Self {
            name: name.into(),
            outcome,
            time,
            traits: Vec::new(),
        }
    }

    /// Adds a trait to this record.
    pub fn with_trait(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.traits.push(Trait::new(name, value));
        self
    }

    /// Returns true if this record carries `test_trait`.
    pub fn has_trait(&self, test_trait: &Trait) -> bool {
        self.traits.contains(test_trait)
    }

    /// Returns the label shown for this test.
    ///
    /// Display names are returned unchanged. Otherwise the method name (the part after the last
    /// `.`) is split into words.
    pub fn friendly_name(&self) -> String {
        if qualified::has_display_name(&self.name) {
            return self.name.clone();
        }
        let method = self
            .name
            .rsplit_once('.')
            .map_or(self.name.as_str(), |(_, method)| method);
        friendly::friendly_name(method)
    }
}
