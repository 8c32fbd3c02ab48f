// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal output: colors, logging and the stdout writer.

use clap::{Args, ValueEnum};
use owo_colors::{OwoColorize, Style, style};
use std::{
    fmt,
    io::{self, BufWriter, Stdout, Write},
    sync::Once,
};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
    warn,
};
use tracing_subscriber::{
    Layer,
    filter::{ParseError, Targets},
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Events with this target are printed as continuation lines, without a level prefix.
pub(crate) const NO_HEADING_TARGET: &str = "visualizo::no_heading";

/// The environment variable holding the log filter.
pub(crate) const LOG_ENV: &str = "VISUALIZO_LOG";

pub(crate) fn clap_styles() -> clap::builder::Styles {
    use clap::builder::styling::{AnsiColor, Effects};

    let bold = |color: AnsiColor| color.on_default().effects(Effects::BOLD);
    clap::builder::Styles::styled()
        .header(bold(AnsiColor::Green))
        .usage(bold(AnsiColor::Green))
        .literal(bold(AnsiColor::Cyan))
        .placeholder(AnsiColor::Cyan.on_default())
        .error(bold(AnsiColor::Red))
        .valid(bold(AnsiColor::Cyan))
        .invalid(bold(AnsiColor::Yellow))
}

#[derive(Copy, Clone, Debug, Args)]
#[command(next_help_heading = "Output options")]
pub(crate) struct OutputOpts {
    /// Also list collections and their traits
    #[arg(long, short, env = "VISUALIZO_VERBOSE")]
    pub(crate) verbose: bool,

    /// Produce color output: auto, always, never
    #[arg(
        long,
        value_enum,
        default_value_t,
        hide_possible_values = true,
        value_name = "WHEN",
        env = "CARGO_TERM_COLOR"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    /// Installs the logger and returns the resolved output settings.
    pub(crate) fn init(self) -> OutputContext {
        init_logger(self.color.should_colorize(supports_color::Stream::Stderr));
        OutputContext {
            verbose: self.verbose,
            color: self.color,
        }
    }
}

/// Output settings, resolved once at startup.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    pub(crate) verbose: bool,
    pub(crate) color: Color,
}

impl OutputContext {
    /// Returns the styles used for error messages.
    pub fn stderr_styles(&self) -> StderrStyles {
        if self.color.should_colorize(supports_color::Stream::Stderr) {
            StderrStyles::colorized()
        } else {
            StderrStyles::default()
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

impl Color {
    pub(crate) fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Self::Auto => supports_color::on_cached(stream).is_some(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Styles for error messages written to stderr.
#[derive(Debug, Default)]
pub struct StderrStyles {
    /// Paths and counts.
    pub(crate) emphasis: Style,

    /// Values the user supplied, such as thresholds.
    pub(crate) value: Style,
}

impl StderrStyles {
    fn colorized() -> Self {
        Self {
            emphasis: style().bold(),
            value: style().yellow(),
        }
    }
}

static INIT_LOGGER: Once = Once::new();

/// Installs a stderr logger filtered by `VISUALIZO_LOG`.
///
/// An invalid filter falls back to the default level, with a warning once the logger is up.
fn init_logger(colorize: bool) {
    INIT_LOGGER.call_once(|| {
        let filter = std::env::var(LOG_ENV).unwrap_or_default();
        let (targets, parse_error) = match log_targets(&filter) {
            Ok(targets) => (targets, None),
            Err(error) => (default_targets(), Some(error)),
        };

        let layer = tracing_subscriber::fmt::layer()
            .event_format(LogFormatter {
                styles: LevelStyles::new(colorize),
            })
            .with_writer(io::stderr)
            .with_filter(targets);
        tracing_subscriber::registry().with(layer).init();

        if let Some(error) = parse_error {
            warn!("ignoring invalid {LOG_ENV} `{filter}`: {error}");
        }
    });
}

fn log_targets(filter: &str) -> Result<Targets, ParseError> {
    if filter.trim().is_empty() {
        Ok(default_targets())
    } else {
        filter.parse()
    }
}

fn default_targets() -> Targets {
    Targets::new().with_default(LevelFilter::INFO)
}

/// Styles for the level prefix of each log line.
#[derive(Debug, Default)]
struct LevelStyles {
    error: Style,
    warning: Style,
    info: Style,
    debug: Style,
}

impl LevelStyles {
    fn new(colorize: bool) -> Self {
        if !colorize {
            return Self::default();
        }
        Self {
            error: style().red().bold(),
            warning: style().yellow().bold(),
            info: style().bold(),
            debug: style().dimmed(),
        }
    }

    /// Returns the prefix for `level`. Trace events share the debug prefix.
    fn prefix(&self, level: Level) -> (&'static str, Style) {
        match level {
            Level::ERROR => ("error", self.error),
            Level::WARN => ("warning", self.warning),
            Level::INFO => ("info", self.info),
            Level::DEBUG | Level::TRACE => ("debug", self.debug),
        }
    }
}

/// Writes `{level}: {message}`, dropping span context and event fields other than the message.
struct LogFormatter {
    styles: LevelStyles,
}

impl<S, N> FormatEvent<S, N> for LogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        if metadata.target() != NO_HEADING_TARGET {
            let (prefix, style) = self.styles.prefix(*metadata.level());
            write!(writer, "{}: ", prefix.style(style))?;
        }

        let mut message = MessageField::default();
        event.record(&mut message);
        writeln!(writer, "{}", message.0)
    }
}

#[derive(Default)]
struct MessageField(String);

impl Visit for MessageField {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Where rendered summaries go: buffered stdout, or a buffer in tests.
pub enum OutputWriter {
    /// Buffered standard output.
    Stdout(BufWriter<Stdout>),

    /// Captured output.
    #[cfg(test)]
    Buffer(Vec<u8>),
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::Stdout(BufWriter::new(io::stdout()))
    }
}

impl Write for OutputWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(buf) => buf.write(data),
            #[cfg(test)]
            Self::Buffer(buf) => buf.write(data),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(buf) => buf.flush(),
            #[cfg(test)]
            Self::Buffer(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("", Level::INFO, true ; "empty shows info")]
    #[test_case("", Level::DEBUG, false ; "empty hides debug")]
    #[test_case("   ", Level::INFO, true ; "whitespace is empty")]
    #[test_case("debug", Level::DEBUG, true ; "debug shows debug")]
    #[test_case("warn", Level::INFO, false ; "warn hides info")]
    #[test_case("visualizer_core=trace", Level::TRACE, true ; "per-target filter")]
    fn log_filters(filter: &str, level: Level, enabled: bool) {
        let targets = log_targets(filter).expect("filter is valid");
        assert_eq!(targets.would_enable("visualizer_core::tree", &level), enabled);
    }

    #[test]
    fn invalid_log_filter() {
        log_targets("visualizer_core=loud").expect_err("`loud` is not a level");
    }

    #[test]
    fn level_prefixes() {
        let plain = LevelStyles::new(false);
        let prefixes: Vec<_> = [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE]
            .into_iter()
            .map(|level| plain.prefix(level).0)
            .collect();
        assert_eq!(prefixes, ["error", "warning", "info", "debug", "debug"]);
        assert_eq!(plain.prefix(Level::ERROR).1, Style::new());

        let colorized = LevelStyles::new(true);
        assert_ne!(colorized.prefix(Level::ERROR).1, Style::new());
    }

    #[test]
    fn explicit_color_choices() {
        assert!(Color::Always.should_colorize(supports_color::Stream::Stdout));
        assert!(!Color::Never.should_colorize(supports_color::Stream::Stdout));
    }

    #[test]
    fn buffer_captures_output() {
        let mut writer = OutputWriter::Buffer(Vec::new());
        write!(writer, "Amount of assemblies: {}", 2).expect("writing to a buffer succeeds");
        writer.flush().expect("flushing a buffer succeeds");
        let OutputWriter::Buffer(buf) = writer else {
            unreachable!("buffer writer was created");
        };
        assert_eq!(buf, b"Amount of assemblies: 2");
    }
}
