use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::instrument;

use crate::cli::OutputFormat;
use crate::error::CliConfigError;
use crate::terminal::TerminalClient;
use crate::{
    CompatibilityMode, DisposalMethod, FrameDelay, FrameSource, GifMerger, MergeConfig,
    NoTransparency, Rgb, SentinelColour, TransparencyMatcher,
};

use super::ui::Painter;
use super::write_json_line;

/// JSON result emitted by the `merge` command.
#[derive(Serialize)]
struct MergeResult<'a> {
    output: &'a Path,
    frames: usize,
    bytes_written: usize,
    delays: &'a [u16],
    loop_count: u16,
    disposal: DisposalMethod,
    compatibility: String,
}

/// Arguments for the `merge` command.
#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Single-frame GIF files, in animation order.
    #[arg(required = true)]
    frames: Vec<PathBuf>,
    /// Path of the animated GIF to write.
    #[arg(short, long)]
    output: PathBuf,
    /// Frame delays as hundredths (`25`) or durations (`250ms`); one value applies to every frame.
    #[arg(long = "delay", value_delimiter = ',', default_value = "10")]
    delays: Vec<FrameDelay>,
    /// Number of repetitions; `0` loops forever.
    #[arg(long, default_value_t = 0)]
    loop_count: u16,
    /// Disposal method as a number (0-3) or name (`keep`, `background`, `previous`).
    #[arg(long, default_value = "background", value_parser = parse_disposal)]
    disposal: DisposalMethod,
    /// Give retained local colour tables their own size and always write the loop extension.
    #[arg(long)]
    strict: bool,
    /// Never mark a palette entry as transparent.
    #[arg(long, conflicts_with = "transparent_colour")]
    no_transparency: bool,
    /// Palette colour treated as transparent, as `RRGGBB` hex.
    #[arg(long)]
    transparent_colour: Option<Rgb>,
}

impl MergeArgs {
    /// Creates merge arguments with default delay, loop and disposal settings.
    ///
    /// ```
    /// use std::path::Path;
    ///
    /// use gif_merge::MergeArgs;
    ///
    /// let args = MergeArgs::new(["a.gif", "b.gif"], "out.gif");
    /// assert_eq!(2, args.frames().len());
    /// assert_eq!(Path::new("out.gif"), args.output());
    /// ```
    #[must_use]
    pub fn new(
        frames: impl IntoIterator<Item = impl Into<PathBuf>>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
            output: output.into(),
            delays: vec![FrameDelay::from_hundredths(10)],
            loop_count: 0,
            disposal: DisposalMethod::Background,
            strict: false,
            no_transparency: false,
            transparent_colour: None,
        }
    }

    /// Replaces the frame delays.
    #[must_use]
    pub fn with_delays(mut self, delays: impl IntoIterator<Item = FrameDelay>) -> Self {
        self.delays = delays.into_iter().collect();
        self
    }

    /// Sets the loop count.
    #[must_use]
    pub fn with_loop_count(mut self, loop_count: u16) -> Self {
        self.loop_count = loop_count;
        self
    }

    /// Sets the disposal method.
    #[must_use]
    pub fn with_disposal(mut self, disposal: DisposalMethod) -> Self {
        self.disposal = disposal;
        self
    }

    /// Enables strict output layout.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Disables transparency detection.
    #[must_use]
    pub fn without_transparency(mut self) -> Self {
        self.no_transparency = true;
        self.transparent_colour = None;
        self
    }

    /// Returns the input frame paths.
    #[must_use]
    pub fn frames(&self) -> &[PathBuf] {
        &self.frames
    }

    /// Returns the output path.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Builds the merge configuration these arguments describe.
    pub(crate) fn merge_config(&self) -> MergeConfig {
        MergeConfig::builder()
            .delays(self.expanded_delays())
            .loop_count(self.loop_count)
            .disposal(self.disposal)
            .compatibility(if self.strict {
                CompatibilityMode::Strict
            } else {
                CompatibilityMode::Legacy
            })
            .transparency(self.transparency())
            .build()
    }

    fn expanded_delays(&self) -> Vec<u16> {
        match self.delays.as_slice() {
            [single] => vec![single.hundredths(); self.frames.len()],
            delays => delays.iter().map(|delay| delay.hundredths()).collect(),
        }
    }

    fn transparency(&self) -> Arc<dyn TransparencyMatcher> {
        if self.no_transparency {
            return Arc::new(NoTransparency);
        }
        match self.transparent_colour {
            Some(colour) => Arc::new(SentinelColour::new(colour)),
            None => Arc::new(SentinelColour::WHITE),
        }
    }

    fn check_output_path(&self) -> Result<(), CliConfigError> {
        let output = resolved_path(&self.output);
        if self
            .frames
            .iter()
            .any(|frame| frame == &self.output || resolved_path(frame) == output)
        {
            return Err(CliConfigError::OutputOverwritesFrame {
                path: self.output.clone(),
            });
        }
        Ok(())
    }
}

/// Canonical form of `path`, or the path as given when it does not exist yet.
fn resolved_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_error| path.to_path_buf())
}

/// Executes the `merge` command.
#[instrument(
    skip(args, out, terminal_client),
    level = "info",
    fields(frames = args.frames.len(), output = %args.output.display(), ?output_format)
)]
pub(crate) fn run<W>(
    args: &MergeArgs,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    args.check_output_path()?;

    let config = args.merge_config();
    let merger = GifMerger::new(config);
    let sources = args.frames.iter().cloned().map(FrameSource::from).collect();
    let animation = merger
        .merge_sources(sources)
        .context("failed to merge frames")?;
    let written_to = animation
        .write_to_path(&args.output)
        .context("failed to write merged animation")?;

    match output_format {
        OutputFormat::Pretty => {
            let painter = Painter::for_stdout(terminal_client);
            writeln!(
                out,
                "{} Merged {} frame(s) into {} ({} bytes)",
                painter.success("✓"),
                painter.value(animation.frame_count().to_string()),
                painter.value(written_to.display().to_string()),
                animation.len(),
            )?;
        }
        OutputFormat::Json => {
            let config = merger.config();
            write_json_line(
                out,
                &MergeResult {
                    output: &written_to,
                    frames: animation.frame_count(),
                    bytes_written: animation.len(),
                    delays: config.delays(),
                    loop_count: config.loop_count(),
                    disposal: config.disposal(),
                    compatibility: config.compatibility().to_string(),
                },
            )?;
        }
    }

    Ok(())
}

fn parse_disposal(value: &str) -> Result<DisposalMethod, String> {
    DisposalMethod::parse_lenient(value).ok_or_else(|| {
        format!("invalid disposal `{value}`; use 0-3 or unspecified, keep, background, previous")
    })
}
