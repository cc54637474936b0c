use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, instrument};

use crate::GifSummary;
use crate::cli::OutputFormat;
use crate::terminal::TerminalClient;

use super::ui::{GifSummaryView, Painter};
use super::write_json_line;

/// Arguments for the `inspect` command.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Path to a GIF file.
    gif_file: PathBuf,
}

impl InspectArgs {
    /// Creates inspect arguments.
    ///
    /// ```
    /// use std::path::Path;
    ///
    /// use gif_merge::InspectArgs;
    ///
    /// let args = InspectArgs::new("animation.gif");
    /// assert_eq!(Path::new("animation.gif"), args.path());
    /// ```
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            gif_file: path.into(),
        }
    }

    /// Returns the GIF file to inspect.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.gif_file
    }
}

/// Executes the `inspect` command.
#[instrument(
    skip(args, out, terminal_client),
    level = "info",
    fields(path = %args.gif_file.display(), ?output_format)
)]
pub(crate) fn run<W>(
    args: &InspectArgs,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    let bytes = std::fs::read(args.path())
        .with_context(|| format!("failed to read GIF file `{}`", args.path().display()))?;
    let summary = GifSummary::from_bytes(&bytes)
        .with_context(|| format!("failed to decode GIF file `{}`", args.path().display()))?;
    debug!(frames = summary.frames().len(), "decoded gif");

    match output_format {
        OutputFormat::Pretty => {
            let painter = Painter::for_stdout(terminal_client);
            writeln!(out, "{}", GifSummaryView::new(&summary, &painter))?;
        }
        OutputFormat::Json => write_json_line(out, &summary)?,
    }

    Ok(())
}
