// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;
use tracing::error;
use visualizer_core::errors::{ConfigError, LoadReportError, WriteSummaryError};

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

/// Exit codes returned by visualizo.
pub enum VisualizoExitCode {}

impl VisualizoExitCode {
    /// Every rendered test passed.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up a visualizo invocation.
    pub const SETUP_ERROR: i32 = 96;

    /// One or more rendered tests failed.
    pub const TESTS_FAILED: i32 = 100;

    /// An input report could not be read or parsed.
    pub const LOAD_REPORT_FAILED: i32 = 104;

    /// Writing data to stdout produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that visualizo knows how to report.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine the current directory")]
    CurrentDirFailed {
        #[source]
        error: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 {
        #[source]
        error: camino::FromPathBufError,
    },
    #[error("config error")]
    ConfigError {
        #[from]
        error: ConfigError,
    },
    #[error("error loading report")]
    LoadReportError {
        #[from]
        error: LoadReportError,
    },
    #[error("error writing output")]
    WriteSummaryError {
        #[from]
        error: WriteSummaryError,
    },
    #[error("test run failed")]
    TestsFailed { failed: usize },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigError { .. } => VisualizoExitCode::SETUP_ERROR,
            Self::LoadReportError { .. } => VisualizoExitCode::LOAD_REPORT_FAILED,
            Self::WriteSummaryError { .. } => VisualizoExitCode::WRITE_OUTPUT_ERROR,
            Self::TestsFailed { .. } => VisualizoExitCode::TESTS_FAILED,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::CurrentDirFailed { error } => {
                error!("could not determine the current directory");
                Some(error as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { error } => {
                error!(
                    "current directory `{}` is not valid UTF-8",
                    error.as_path().display().style(styles.emphasis)
                );
                None
            }
            Self::ConfigError { error } => match error {
                ConfigError::InvalidThresholds { fast, normal } => {
                    error!(
                        "fast threshold ({}) must not exceed normal threshold ({})",
                        format!("{fast:?}").style(styles.value),
                        format!("{normal:?}").style(styles.value),
                    );
                    None
                }
                other => {
                    error!("{other}");
                    other.source()
                }
            },
            Self::LoadReportError { error } => {
                error!("failed to load report at `{}`", error.path().style(styles.emphasis));
                error.source()
            }
            Self::WriteSummaryError { error } => {
                error!("failed to write test summary");
                error.source()
            }
            Self::TestsFailed { failed } => {
                let noun = if *failed == 1 { "test" } else { "tests" };
                error!("{} {noun} failed", failed.style(styles.emphasis));
                None
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
