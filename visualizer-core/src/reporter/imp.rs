// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    duration::DisplaySeconds,
    helpers::{Styles, ThemeCharacters},
};
use crate::{
    config::VisualizerConfig,
    errors::WriteSummaryError,
    friendly::friendly_name,
    group::{GroupKey, TestGroup},
    input::{AssemblySummary, RunSummary},
    record::{TestOutcome, TestRecord},
};
use owo_colors::OwoColorize;
use std::io::{self, Write};

const BANNER: &str = r#"
__   _(_)___ _   _  __ _| (_)_______
\ \ / / / __| | | |/ _` | | |_  / _ \
 \ V /| \__ \ |_| | (_| | | |/ / (_) |
  \_/ |_|___/\__,_|\__,_|_|_/___\___/
"#;

/// Indentation added per tree level and per trait group.
const INDENT: &str = "  ";

/// Builder for [`SummaryReporter`].
#[derive(Clone, Debug)]
pub struct SummaryReporterBuilder {
    config: VisualizerConfig,
    should_colorize: bool,
    use_unicode: bool,
    verbose: bool,
}

impl SummaryReporterBuilder {
    /// Creates a new builder with the given configuration.
    ///
    /// Output is not colorized and uses ASCII markers by default.
    pub fn new(config: VisualizerConfig) -> Self {
        Self {
            config,
            should_colorize: false,
            use_unicode: false,
            verbose: false,
        }
    }

    /// Sets whether output should be colorized.
    pub fn set_colorize(&mut self, should_colorize: bool) -> &mut Self {
        self.should_colorize = should_colorize;
        self
    }

    /// Sets whether unicode markers should be used.
    pub fn set_unicode(&mut self, use_unicode: bool) -> &mut Self {
        self.use_unicode = use_unicode;
        self
    }

    /// Sets whether collections and their traits should be listed.
    pub fn set_verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }

    /// Builds the reporter.
    pub fn build(&self) -> SummaryReporter {
        let mut styles = Styles::default();
        if self.should_colorize {
            styles.colorize();
        }
        let mut theme_characters = ThemeCharacters::default();
        if self.use_unicode {
            theme_characters.use_unicode();
        }

        SummaryReporter {
            config: self.config,
            styles,
            theme_characters,
            verbose: self.verbose,
        }
    }
}

/// Writes human-readable summaries of test runs.
#[derive(Clone, Debug)]
pub struct SummaryReporter {
    config: VisualizerConfig,
    styles: Styles,
    theme_characters: ThemeCharacters,
    verbose: bool,
}

impl SummaryReporter {
    /// Writes the banner shown at startup.
    pub fn write_banner(&self, writer: &mut dyn Write) -> Result<(), WriteSummaryError> {
        writeln!(writer, "{}", BANNER.style(self.styles.heading))?;
        Ok(())
    }

    /// Writes a summary of `run`: the run header, then every assembly with its trait groups.
    pub fn write_run(
        &self,
        run: &RunSummary,
        writer: &mut dyn Write,
    ) -> Result<(), WriteSummaryError> {
        self.write_run_header(run, writer)?;
        for assembly in &run.assemblies {
            writeln!(writer)?;
            self.write_assembly(assembly, writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_run_header(&self, run: &RunSummary, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(
            writer,
            "Amount of assemblies: {}",
            run.assemblies.len().style(self.styles.count)
        )?;
        let fields = [
            ("Computer:", &run.computer),
            ("User:", &run.user),
            ("Start time:", &run.start_time),
            ("End time:", &run.end_time),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                writeln!(writer, "{label:<22}{value}")?;
            }
        }
        Ok(())
    }

    fn write_assembly(&self, assembly: &AssemblySummary, writer: &mut dyn Write) -> io::Result<()> {
        write!(writer, "{:<18}{} - ", "Assembly:", assembly.short_name)?;
        if assembly.is_success() {
            let verdict = format!(
                "{} Passed ({} of {} passed).",
                self.theme_characters.outcome(&TestOutcome::Passed),
                assembly.passed,
                assembly.total,
            );
            writeln!(writer, "{}", verdict.style(self.styles.pass))?;
        } else {
            let verdict = format!(
                "{} Failed ({} of {} failed).",
                self.theme_characters.outcome(&TestOutcome::Failed),
                assembly.failed,
                assembly.total,
            );
            writeln!(writer, "{}", verdict.style(self.styles.fail))?;
        }

        let date_time: Vec<&str> = [&assembly.run_date, &assembly.run_time]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        if !date_time.is_empty() {
            writeln!(writer, "{:<18}{}", "Date / time:", date_time.join(" "))?;
        }
        if let Some(time) = assembly.time {
            writeln!(writer, "{:<18}{}.", "Total time:", DisplaySeconds(time))?;
        }

        writeln!(writer)?;
        let counts = [
            ("# tests:", assembly.total),
            ("# Passed tests:", assembly.passed),
            ("# Failed tests:", assembly.failed),
            ("# Errors:", assembly.errors),
        ];
        for (label, count) in counts {
            writeln!(writer, "{INDENT}{label:<16}{}", count.style(self.styles.count))?;
        }
        writeln!(writer)?;

        if self.verbose {
            self.write_collections(assembly, writer)?;
        }

        let forest = assembly.group_by_trait();
        for group in forest.ordered(self.config.group_order()) {
            self.write_group(group, writer)?;
        }
        Ok(())
    }

    fn write_collections(
        &self,
        assembly: &AssemblySummary,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        writeln!(writer, "{INDENT}{}", "Collections:".style(self.styles.heading))?;
        for collection in &assembly.collections {
            writeln!(
                writer,
                "{INDENT}{INDENT}{} ({} tests)",
                collection.name,
                collection.tests.len().style(self.styles.count),
            )?;
            let traits = collection.unique_traits();
            if !traits.is_empty() {
                let traits: Vec<String> = traits.iter().map(ToString::to_string).collect();
                writeln!(writer, "{INDENT}{INDENT}{INDENT}Traits: {}", traits.join(", "))?;
            }
        }
        writeln!(writer)?;
        Ok(())
    }

    fn write_group(&self, group: &TestGroup<'_>, writer: &mut dyn Write) -> io::Result<()> {
        let mut base = INDENT.to_owned();
        if let GroupKey::Trait(_) = group.key() {
            if group.tree().is_empty() {
                return Ok(());
            }
            writeln!(
                writer,
                "{INDENT}{} {}",
                "Trait:".style(self.styles.heading),
                group.key()
            )?;
            base.push_str(INDENT);
        }

        for item in group.tree() {
            if !item.node.is_root() {
                let indent = INDENT.repeat(item.depth - 1);
                writeln!(
                    writer,
                    "{base}{indent}{}",
                    friendly_name(item.node.label()).style(self.styles.heading)
                )?;
            }
            let indent = INDENT.repeat(item.depth);
            for test in item.node.tests() {
                write!(writer, "{base}{indent}")?;
                self.write_test(test, writer)?;
            }
        }
        Ok(())
    }

    fn write_test(&self, test: &TestRecord, writer: &mut dyn Write) -> io::Result<()> {
        let speed = self.config.thresholds().classify(test.time);
        writeln!(
            writer,
            "{} {} {} ({})",
            self.theme_characters.speed(speed),
            self.theme_characters
                .outcome(&test.outcome)
                .style(self.styles.outcome(&test.outcome)),
            test.friendly_name(),
            DisplaySeconds(test.time),
        )
    }
}
