use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

use crate::cli::inspect::InspectArgs;
use crate::cli::merge::MergeArgs;

/// Command-line options for the GIF frame merger.
#[derive(Debug, Parser)]
#[command(
    name = "gif-merge",
    about = "Merge single-frame GIFs into one looping animation without re-encoding."
)]
pub struct Args {
    /// Log verbosity; overrides `RUST_LOG` when set.
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
    /// Output format; defaults to `pretty` on a terminal and `json` otherwise.
    #[arg(long, global = true, value_enum)]
    output_format: Option<OutputFormat>,
    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// Creates argument values directly without CLI parsing.
    ///
    /// ```
    /// use gif_merge::{Args, Command, InspectArgs};
    ///
    /// let args = Args::new(Command::Inspect(InspectArgs::new("animation.gif")));
    /// assert_eq!(None, args.log_level());
    /// ```
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            log_level: None,
            output_format: None,
            command,
        }
    }

    /// Sets an explicit log level.
    #[must_use]
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = Some(log_level);
        self
    }

    /// Sets an explicit output format.
    #[must_use]
    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = Some(output_format);
        self
    }

    /// Returns the requested log level, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
    }

    /// Returns the requested output format, if any.
    #[must_use]
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output_format
    }

    /// Consumes the arguments and returns the selected command.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Supported CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge single-frame GIF files into one animated GIF.
    Merge(MergeArgs),
    /// Decode a GIF file and print its frames, delays and loop behaviour.
    Inspect(InspectArgs),
}

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub(crate) fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::OFF,
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

/// Output rendering accepted by `--output-format`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, coloured when stdout is a terminal.
    Pretty,
    /// One pretty-printed JSON document per command.
    Json,
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use assert_matches::assert_matches;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn merge_requires_output_path() {
        let result = Args::try_parse_from(["gif-merge", "merge", "a.gif"]);

        let error = result.expect_err("missing --output should fail argument parsing");
        assert_eq!(ErrorKind::MissingRequiredArgument, error.kind());
    }

    #[test]
    fn merge_requires_at_least_one_frame() {
        let result = Args::try_parse_from(["gif-merge", "merge", "-o", "out.gif"]);

        let error = result.expect_err("missing frames should fail argument parsing");
        assert_eq!(ErrorKind::MissingRequiredArgument, error.kind());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let args = Args::try_parse_from([
            "gif-merge",
            "inspect",
            "animation.gif",
            "--log-level",
            "debug",
            "--output-format",
            "json",
        ])
        .expect("global flags should parse after the subcommand");

        assert_eq!(Some(LogLevel::Debug), args.log_level());
        assert_eq!(Some(OutputFormat::Json), args.output_format());
        assert_matches!(
            args.into_command(),
            Command::Inspect(inspect) if inspect.path() == Path::new("animation.gif")
        );
    }

    #[rstest]
    #[case::off(LogLevel::Off, LevelFilter::OFF)]
    #[case::warn(LogLevel::Warn, LevelFilter::WARN)]
    #[case::trace(LogLevel::Trace, LevelFilter::TRACE)]
    fn log_level_maps_to_filter(#[case] level: LogLevel, #[case] expected: LevelFilter) {
        assert_eq!(expected, level.as_level_filter());
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        let result =
            Args::try_parse_from(["gif-merge", "--output-format", "xml", "inspect", "a.gif"]);

        let error = result.expect_err("unknown output format should fail");
        assert_eq!(ErrorKind::InvalidValue, error.kind());
    }
}
