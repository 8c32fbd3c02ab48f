// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ExpectedError, Result, VisualizoExitCode},
    output::{OutputContext, OutputOpts, OutputWriter},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, ValueEnum};
use std::time::Duration;
use tracing::debug;
use visualizer_core::{
    config::{ConfigLocation, ConfigOverrides, VisualizerConfig},
    group::GroupOrder,
    input::load_report,
    reporter::SummaryReporterBuilder,
};

/// Render xUnit v2 test reports as trees in the terminal.
///
/// Tests are grouped by trait. Within each group, tests are arranged by the nested types encoded in
/// their names.
#[derive(Debug, Parser)]
#[command(
    version,
    styles = crate::output::clap_styles(),
    max_term_width = 100,
)]
pub struct VisualizoApp {
    /// Path to an xUnit v2 XML report
    ///
    /// This argument may be specified multiple times. Reports are rendered in the order given.
    #[arg(long = "input", short = 'i', value_name = "PATH", required = true)]
    inputs: Vec<Utf8PathBuf>,

    /// Do not print the banner
    #[arg(long)]
    no_banner: bool,

    #[clap(flatten)]
    config_opts: ConfigOpts,

    #[clap(flatten)]
    display_opts: DisplayOpts,

    #[clap(flatten)]
    output: OutputOpts,
}

impl VisualizoApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the exit code on success.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let current_dir = current_dir()?;
        let config = self.config_opts.make_config(
            &current_dir,
            &self.display_opts.to_overrides(),
        )?;

        let mut builder = SummaryReporterBuilder::new(config);
        builder
            .set_colorize(output.color.should_colorize(supports_color::Stream::Stdout))
            .set_unicode(supports_unicode::on(supports_unicode::Stream::Stdout))
            .set_verbose(output.verbose);
        let reporter = builder.build();

        if !self.no_banner {
            reporter.write_banner(output_writer)?;
        }

        let mut failed = 0;
        for input in &self.inputs {
            let run = load_report(input)?;
            reporter.write_run(&run, output_writer)?;
            failed += run.failed();
        }

        if failed > 0 {
            Err(ExpectedError::TestsFailed { failed })
        } else {
            Ok(VisualizoExitCode::OK)
        }
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let current_dir =
        std::env::current_dir().map_err(|error| ExpectedError::CurrentDirFailed { error })?;
    Utf8PathBuf::try_from(current_dir)
        .map_err(|error| ExpectedError::CurrentDirInvalidUtf8 { error })
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Config options")]
struct ConfigOpts {
    /// Config file [default: .config/visualizo.toml]
    #[arg(long, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,
}

impl ConfigOpts {
    fn make_config(
        &self,
        current_dir: &Utf8Path,
        overrides: &ConfigOverrides,
    ) -> Result<VisualizerConfig> {
        let location = match &self.config_file {
            Some(path) => ConfigLocation::Explicit(path),
            None => ConfigLocation::Default(current_dir),
        };
        debug!("loading config from {location:?}");
        Ok(VisualizerConfig::load(location, overrides)?)
    }
}

#[derive(Debug, Default, Args)]
#[command(next_help_heading = "Display options")]
struct DisplayOpts {
    /// Tests at or below this duration are marked fast [default: 50ms]
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    fast_threshold: Option<Duration>,

    /// Tests at or below this duration are marked normal, and slow above it [default: 100ms]
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    normal_threshold: Option<Duration>,

    /// Order in which trait groups are shown [default: sorted]
    #[arg(long, value_enum, value_name = "ORDER")]
    group_order: Option<GroupOrderOpt>,
}

impl DisplayOpts {
    fn to_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            fast_threshold: self.fast_threshold,
            normal_threshold: self.normal_threshold,
            group_order: self.group_order.map(GroupOrder::from),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GroupOrderOpt {
    /// Sorted by trait name and value
    Sorted,

    /// In the order traits first appear in the report
    FirstSeen,
}

impl From<GroupOrderOpt> for GroupOrder {
    fn from(opt: GroupOrderOpt) -> Self {
        match opt {
            GroupOrderOpt::Sorted => Self::Sorted,
            GroupOrderOpt::FirstSeen => Self::FirstSeen,
        }
    }
}

fn parse_duration(input: &str) -> std::result::Result<Duration, String> {
    humantime::parse_duration(input).map_err(|error| error.to_string())
}
