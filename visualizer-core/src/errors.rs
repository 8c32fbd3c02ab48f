// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by visualizer-core.

use camino::Utf8PathBuf;
use quick_xunit::DeserializeError;
use std::{fmt, io, time::Duration};
use thiserror::Error;

/// A test name that looks nested (contains `+`) but is missing the `.` delimiters the nesting
/// path is extracted from.
///
/// This is never fatal: the tree builder falls back to using the whole substring around the `+`
/// as the segment, records the problem, and logs it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("malformed test name `{name}`: {kind}")]
pub struct MalformedTestName {
    name: String,
    kind: MalformedTestNameKind,
}

impl MalformedTestName {
    pub(crate) fn new(name: impl Into<String>, kind: MalformedTestNameKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Returns the full test name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns what was wrong with the name.
    pub fn kind(&self) -> MalformedTestNameKind {
        self.kind
    }
}

/// The way in which a [`MalformedTestName`] is malformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MalformedTestNameKind {
    /// The name does not contain a `+` at all.
    NotNested,

    /// There is no `.` before the first `+`, so the enclosing type has no namespace.
    NoNamespace,

    /// There is no `.` after the last `+`, so the nested type has no member name.
    NoMember,

    /// Neither of the `.` delimiters is present.
    NoDelimiters,
}

impl fmt::Display for MalformedTestNameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNested => write!(f, "no `+` nesting delimiter"),
            Self::NoNamespace => write!(f, "no `.` before the first `+`"),
            Self::NoMember => write!(f, "no `.` after the last `+`"),
            Self::NoDelimiters => write!(f, "no `.` before the first `+` or after the last `+`"),
        }
    }
}

/// An error that occurred while loading an xUnit report from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadReportError {
    /// The report could not be read.
    #[error("failed to read xUnit report at `{path}`")]
    Read {
        /// The path to the report.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The report could not be parsed.
    #[error("failed to parse xUnit report at `{path}`")]
    Parse {
        /// The path to the report.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: DeserializeError,
    },
}

impl LoadReportError {
    /// Returns the path of the report that failed to load.
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

/// An error that occurred while loading the visualizer configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// An explicitly specified config file does not exist.
    #[error("config file not found at `{path}`")]
    FileNotFound {
        /// The path that was specified.
        path: Utf8PathBuf,
    },

    /// The config file could not be read.
    #[error("failed to read config file at `{path}`")]
    Read {
        /// The path to the config file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The config file could not be parsed.
    #[error("failed to parse config file at `{path}`")]
    Parse {
        /// The path to the config file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: toml::de::Error,
    },

    /// The fast threshold is greater than the normal threshold.
    #[error("fast threshold ({fast:?}) must not exceed normal threshold ({normal:?})")]
    InvalidThresholds {
        /// The resolved fast threshold.
        fast: Duration,

        /// The resolved normal threshold.
        normal: Duration,
    },
}

/// An error that occurred while writing a summary to the output.
#[derive(Debug, Error)]
#[error("error writing test summary")]
pub struct WriteSummaryError {
    #[from]
    err: io::Error,
}
