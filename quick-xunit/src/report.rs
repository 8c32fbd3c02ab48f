// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{deserialize::deserialize_report, DeserializeError};
use std::{io, str::FromStr};

/// The root element of an xUnit v2+ report: `<assemblies>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assemblies {
    /// The name of the computer the tests were run on.
    pub computer: Option<String>,

    /// The user the tests were run as.
    pub user: Option<String>,

    /// The time the first assembly started running, in RFC 3339 format.
    pub start_rtf: Option<String>,

    /// The time the last assembly finished running, in RFC 3339 format.
    pub finish_rtf: Option<String>,

    /// The time the report was written.
    ///
    /// Older runners emit this instead of `finish-rtf`.
    pub timestamp: Option<String>,

    /// A unique identifier for this run.
    pub id: Option<String>,

    /// The version of the report schema.
    pub schema_version: Option<String>,

    /// The test assemblies contained in this report.
    pub assemblies: Vec<Assembly>,
}

impl Assemblies {
    /// Reads a report from the given reader.
    pub fn from_reader(mut reader: impl io::BufRead) -> Result<Self, DeserializeError> {
        let mut contents = String::new();
        reader
            .read_to_string(&mut contents)
            .map_err(|err| DeserializeError::Xml {
                err: quick_xml::Error::from(err),
            })?;
        contents.parse()
    }

    /// Returns the total number of tests across all assemblies.
    pub fn total(&self) -> usize {
        self.assemblies.iter().map(|assembly| assembly.total).sum()
    }

    /// Returns the total number of failed tests across all assemblies.
    pub fn failed(&self) -> usize {
        self.assemblies.iter().map(|assembly| assembly.failed).sum()
    }
}

impl FromStr for Assemblies {
    type Err = DeserializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        deserialize_report(s)
    }
}

/// A single test assembly: `<assembly>`.
///
/// An assembly corresponds to one compiled test binary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assembly {
    /// The full path to the assembly.
    pub name: String,

    /// The configuration file used for the run, if any.
    pub config_file: Option<String>,

    /// A description of the runtime environment (bitness, app domain support).
    pub environment: Option<String>,

    /// A unique identifier for this assembly within the run.
    pub id: Option<String>,

    /// The date the assembly started running.
    pub run_date: Option<String>,

    /// The time of day the assembly started running.
    pub run_time: Option<String>,

    /// The target framework the assembly was compiled for.
    pub target_framework: Option<String>,

    /// The display name of the test framework.
    pub test_framework: Option<String>,

    /// The time the assembly started running, in RFC 3339 format.
    pub start_rtf: Option<String>,

    /// The time the assembly finished running, in RFC 3339 format.
    pub finish_rtf: Option<String>,

    /// The duration of the assembly run, in RFC 3339 format.
    pub time_rtf: Option<String>,

    /// The number of seconds the assembly took to run.
    pub time: Option<f64>,

    /// The total number of tests in this assembly.
    pub total: usize,

    /// The number of passed tests.
    pub passed: usize,

    /// The number of failed tests.
    pub failed: usize,

    /// The number of skipped tests.
    pub skipped: usize,

    /// The number of tests that were not run.
    pub not_run: usize,

    /// The number of environment errors.
    pub error_count: usize,

    /// The test collections in this assembly.
    pub collections: Vec<Collection>,

    /// Errors that happened outside the scope of a single test.
    pub errors: Vec<AssemblyError>,
}

/// A group of tests run together: `<collection>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collection {
    /// A unique identifier for this collection within the assembly.
    pub id: Option<String>,

    /// The display name of the collection.
    pub name: String,

    /// The number of seconds the collection took to run.
    pub time: Option<f64>,

    /// The total number of tests in this collection.
    pub total: usize,

    /// The number of passed tests.
    pub passed: usize,

    /// The number of failed tests.
    pub failed: usize,

    /// The number of skipped tests.
    pub skipped: usize,

    /// The number of tests that were not run.
    pub not_run: usize,

    /// The tests in this collection, in document order.
    pub tests: Vec<Test>,
}

/// A single test result: `<test>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Test {
    /// A unique identifier for this test within the collection.
    pub id: Option<String>,

    /// The display name of the test.
    ///
    /// For most tests this is the fully qualified method name, with `+` separating nested types.
    /// Tests may also supply a free-form display name.
    pub name: String,

    /// The name of the test method.
    pub method: Option<String>,

    /// The fully qualified name of the class containing the test method.
    pub type_name: Option<String>,

    /// The result of the test, usually one of `Pass`, `Fail`, `Skip` or `NotRun`.
    pub result: String,

    /// The number of seconds the test took to run.
    pub time: f64,

    /// The duration of the test, in RFC 3339 format.
    pub time_rtf: Option<String>,

    /// The source file the test is defined in, if known.
    pub source_file: Option<String>,

    /// The line in the source file the test is defined on, if known.
    pub source_line: Option<String>,

    /// Information about the failure, if the test failed.
    pub failure: Option<Failure>,

    /// Output captured while the test ran.
    pub output: Option<String>,

    /// The reason a test was skipped.
    pub reason: Option<String>,

    /// The traits attached to this test, in document order.
    pub traits: Vec<Trait>,

    /// Warnings reported while running the test.
    pub warnings: Vec<String>,
}

/// Information about a failure: `<failure>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Failure {
    /// The type of the exception that was thrown.
    pub exception_type: Option<String>,

    /// The exception message.
    pub message: Option<String>,

    /// The stack trace of the exception.
    pub stack_trace: Option<String>,
}

/// A name/value pair attached to a test: `<trait>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Trait {
    /// The name of the trait.
    pub name: String,

    /// The value of the trait.
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

/// An environment failure outside the scope of a single test: `<error>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssemblyError {
    /// The name of the item that failed, such as a fixture type.
    pub name: Option<String>,

    /// The kind of error, such as `assembly-cleanup` or `test-class-cleanup`.
    pub error_type: Option<String>,

    /// Information about the failure.
    pub failure: Option<Failure>,
}
