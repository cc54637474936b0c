use std::fmt::{self, Display, Formatter};

use crate::utils::format_optional;
use crate::{FrameSummary, GifSummary, LoopBehaviour};

use super::painter::Painter;
use super::table::Table;

/// Renders a decoded GIF as an animation table followed by a per-frame table.
pub(crate) struct GifSummaryView<'a> {
    summary: &'a GifSummary,
    painter: &'a Painter,
}

impl<'a> GifSummaryView<'a> {
    pub(crate) fn new(summary: &'a GifSummary, painter: &'a Painter) -> Self {
        Self { summary, painter }
    }

    fn animation_table(&self) -> Table {
        let (width, height) = self.summary.size();
        let global_palette = match self.summary.global_palette_entries() {
            Some(entries) => self.painter.value(format!("{entries} entries")),
            None => self.painter.warning("<none>"),
        };
        let looping = match self.summary.loop_behaviour() {
            LoopBehaviour::Infinite => self.painter.success("forever"),
            finite @ LoopBehaviour::Finite { .. } => self.painter.value(finite.to_string()),
        };

        Table::key_value(
            self.painter,
            vec![
                ("Logical screen", self.painter.value(format!("{width}x{height}"))),
                ("Global palette", global_palette),
                ("Loop", looping),
                (
                    "Frames",
                    self.painter.value(self.summary.frames().len().to_string()),
                ),
            ],
        )
    }

    fn frames_table(&self) -> Table {
        let rows = self
            .summary
            .frames()
            .iter()
            .map(|frame| self.frame_row(frame))
            .collect();
        Table::grid(
            [
                "frame",
                "origin",
                "size",
                "delay",
                "disposal",
                "transparent",
                "local_palette",
            ],
            rows,
        )
    }

    fn frame_row(&self, frame: &FrameSummary) -> Vec<String> {
        let (left, top) = frame.origin();
        let (width, height) = frame.size();
        vec![
            self.painter.value(frame.index().to_string()),
            self.painter.muted(format!("{left},{top}")),
            self.painter.value(format!("{width}x{height}")),
            self.painter
                .value(format!("{}ms", u32::from(frame.delay_hundredths()) * 10)),
            self.painter.value(frame.disposal().to_string()),
            self.painter.value(format_optional(frame.transparent_index())),
            self.painter
                .value(format_optional(frame.local_palette_entries())),
        ]
    }
}

impl Display for GifSummaryView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.painter.heading("Animation:"))?;
        write!(f, "\n{}", self.animation_table())?;
        writeln!(f)?;
        write!(f, "\n{}", self.painter.heading("Frames:"))?;
        write!(f, "\n{}", self.frames_table())
    }
}
