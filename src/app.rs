use std::io;

use anyhow::Result;
use tracing::instrument;

use crate::cli::{Command, LogLevel, OutputFormat};
use crate::telemetry;
use crate::terminal::{SystemTerminalClient, TerminalClient};

/// Runs a CLI command against the real terminal.
///
/// ```no_run
/// use clap::Parser;
///
/// let args = gif_merge::Args::try_parse_from([
///     "gif-merge",
///     "merge",
///     "frame-0.gif",
///     "frame-1.gif",
///     "-o",
///     "animation.gif",
/// ])?;
/// let mut out = Vec::new();
/// gif_merge::run(args.into_command(), &mut out, gif_merge::OutputFormat::Json)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, the command fails, or
/// output writing fails.
pub fn run<W>(command: Command, out: &mut W, output_format: OutputFormat) -> Result<()>
where
    W: io::Write,
{
    run_with_log_level(command, out, None, output_format)
}

/// Runs a CLI command with an explicit telemetry log-level override.
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, the command fails, or
/// output writing fails.
pub fn run_with_log_level<W>(
    command: Command,
    out: &mut W,
    log_level: Option<LogLevel>,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    run_with_clients(
        command,
        out,
        &SystemTerminalClient,
        log_level,
        output_format,
    )
}

/// Runs a CLI command with an injected terminal client.
///
/// ```
/// use gif_merge::{Command, InspectArgs, OutputFormat, TerminalClient};
///
/// struct FakeTerminal;
/// impl TerminalClient for FakeTerminal {
///     fn stdout_is_terminal(&self) -> bool { false }
///     fn stderr_is_terminal(&self) -> bool { false }
/// }
///
/// let command = Command::Inspect(InspectArgs::new("missing.gif"));
/// let mut out = Vec::new();
/// let result = gif_merge::run_with_clients(
///     command,
///     &mut out,
///     &FakeTerminal,
///     None,
///     OutputFormat::Pretty,
/// );
/// assert!(result.is_err());
/// ```
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, the command fails, or
/// output writing fails.
#[instrument(
    skip(command, out, terminal_client),
    level = "info",
    fields(command = %command_name(&command), ?log_level, ?output_format)
)]
pub fn run_with_clients<W>(
    command: Command,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    log_level: Option<LogLevel>,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    telemetry::initialise_tracing(
        "gif-merge",
        terminal_client.stderr_is_terminal(),
        log_level.map(LogLevel::as_level_filter),
    )?;

    match command {
        Command::Merge(args) => {
            crate::cli::merge::run(&args, out, terminal_client, output_format)
        }
        Command::Inspect(args) => {
            crate::cli::inspect::run(&args, out, terminal_client, output_format)
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Merge(_args) => "merge",
        Command::Inspect(_args) => "inspect",
    }
}
