// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading xUnit reports and mapping them onto core types.

use crate::{
    errors::LoadReportError,
    group::{GroupedForest, group_by_trait},
    record::{TestOutcome, TestRecord, Trait},
    traits::unique_traits,
};
use camino::Utf8Path;
use quick_xunit::Assemblies;
use std::time::Duration;
use tracing::debug;

/// A summary of a single test run, as read from one report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// The computer the tests were run on.
    pub computer: Option<String>,

    /// The user the tests were run as.
    pub user: Option<String>,

    /// When the run started.
    pub start_time: Option<String>,

    /// When the run finished. Older reports only record when the report was written.
    pub end_time: Option<String>,

    /// The assemblies in this run, in document order.
    pub assemblies: Vec<AssemblySummary>,
}

impl RunSummary {
    /// Maps a deserialized report.
    pub fn from_report(report: Assemblies) -> Self {
        Self {
            computer: report.computer,
            user: report.user,
            start_time: report.start_rtf,
            end_time: report.finish_rtf.or(report.timestamp),
            assemblies: report
                .assemblies
                .into_iter()
                .map(AssemblySummary::from_assembly)
                .collect(),
        }
    }

    /// Returns the number of failed tests across all assemblies.
    pub fn failed(&self) -> usize {
        self.assemblies.iter().map(|assembly| assembly.failed).sum()
    }
}

/// Reads and maps the xUnit report at `path`.
pub fn load_report(path: &Utf8Path) -> Result<RunSummary, LoadReportError> {
    debug!("loading xUnit report from {path}");
    let contents = std::fs::read_to_string(path).map_err(|error| LoadReportError::Read {
        path: path.to_owned(),
        error,
    })?;
    let report: Assemblies = contents.parse().map_err(|error| LoadReportError::Parse {
        path: path.to_owned(),
        error,
    })?;

    let summary = RunSummary::from_report(report);
    debug!(
        "loaded {} assemblies from {path}",
        summary.assemblies.len()
    );
    Ok(summary)
}

/// A summary of a single test assembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblySummary {
    /// The full path to the assembly.
    pub name: String,

    /// The file name of the assembly.
    pub short_name: String,

    /// The date the assembly started running.
    pub run_date: Option<String>,

    /// The time of day the assembly started running.
    pub run_time: Option<String>,

    /// How long the assembly took to run.
    pub time: Option<Duration>,

    /// The total number of tests.
    pub total: usize,

    /// The number of passed tests.
    pub passed: usize,

    /// The number of failed tests.
    pub failed: usize,

    /// The number of skipped tests.
    pub skipped: usize,

    /// The number of environment errors.
    pub errors: usize,

    /// The test collections, in document order.
    pub collections: Vec<CollectionSummary>,
}

impl AssemblySummary {
    fn from_assembly(assembly: quick_xunit::Assembly) -> Self {
        let short_name = short_name(&assembly.name).to_owned();
        Self {
            short_name,
            name: assembly.name,
            run_date: assembly.run_date,
            run_time: assembly.run_time,
            time: assembly.time.map(seconds_to_duration),
            total: assembly.total,
            passed: assembly.passed,
            failed: assembly.failed,
            skipped: assembly.skipped,
            errors: assembly.error_count,
            collections: assembly
                .collections
                .into_iter()
                .map(CollectionSummary::from_collection)
                .collect(),
        }
    }

    /// Returns true if no tests failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Iterates over all tests in this assembly, collection by collection.
    pub fn tests(&self) -> impl Iterator<Item = &TestRecord> {
        self.collections
            .iter()
            .flat_map(|collection| collection.tests.iter())
    }

    /// Returns the distinct traits across all tests in this assembly, in first-seen order.
    pub fn unique_traits(&self) -> Vec<&Trait> {
        unique_traits(self.tests())
    }

    /// Groups the tests in this assembly by trait.
    pub fn group_by_trait(&self) -> GroupedForest<'_> {
        group_by_trait(self.tests())
    }
}

/// A summary of a single test collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionSummary {
    /// The name of the collection.
    pub name: String,

    /// The tests in this collection, in document order.
    pub tests: Vec<TestRecord>,
}

impl CollectionSummary {
    fn from_collection(collection: quick_xunit::Collection) -> Self {
        Self {
            name: collection.name,
            tests: collection.tests.into_iter().map(record_from_test).collect(),
        }
    }

    /// Returns the distinct traits across the tests in this collection, in first-seen order.
    pub fn unique_traits(&self) -> Vec<&Trait> {
        unique_traits(&self.tests)
    }
}

fn record_from_test(test: quick_xunit::Test) -> TestRecord {
    TestRecord {
        outcome: TestOutcome::from_result(&test.result),
        time: seconds_to_duration(test.time),
        traits: test
            .traits
            .into_iter()
            .map(|test_trait| Trait::new(test_trait.name, test_trait.value))
            .collect(),
        name: test.name,
    }
}

fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or_else(|error| {
        debug!("clamping test time {seconds} to zero: {error}");
        Duration::ZERO
    })
}

/// Returns the final component of a path written on any platform.
fn short_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
