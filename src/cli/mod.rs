use std::io;

use serde::Serialize;

pub(crate) mod command;
pub(crate) mod inspect;
pub(crate) mod merge;
pub(crate) mod ui;

pub use self::command::{Args, Command, LogLevel, OutputFormat};
pub use self::inspect::InspectArgs;
pub use self::merge::MergeArgs;

/// Writes one pretty-printed JSON document followed by a newline.
pub(crate) fn write_json_line(
    out: &mut impl io::Write,
    value: &impl Serialize,
) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
