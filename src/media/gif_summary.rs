use std::fmt;
use std::io::Cursor;

use serde::Serialize;
use thiserror::Error;

use crate::handlers::DisposalMethod;

const RGB_LEN: usize = 3;

/// Errors returned when summarising an encoded GIF.
#[derive(Debug, Error)]
pub enum GifSummaryError {
    /// The payload cannot be decoded as a GIF stream.
    #[error("invalid gif payload")]
    InvalidGif { source: gif::DecodingError },
}

/// Loop behaviour announced by the Netscape application extension.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoopBehaviour {
    /// Repeats forever (loop count `0`).
    Infinite,
    /// Repeats a fixed number of times; `0` also covers streams without a loop block.
    Finite { count: u16 },
}

impl From<gif::Repeat> for LoopBehaviour {
    fn from(repeat: gif::Repeat) -> Self {
        match repeat {
            gif::Repeat::Infinite => Self::Infinite,
            gif::Repeat::Finite(count) => Self::Finite { count },
        }
    }
}

impl fmt::Display for LoopBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infinite => write!(f, "forever"),
            Self::Finite { count } => write!(f, "{count} time(s)"),
        }
    }
}

/// Decoded control data of one frame.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FrameSummary {
    index: usize,
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    delay_hundredths: u16,
    disposal: DisposalMethod,
    transparent_index: Option<u8>,
    local_palette_entries: Option<usize>,
}

impl FrameSummary {
    fn from_frame(index: usize, frame: &gif::Frame<'_>) -> Self {
        Self {
            index,
            left: frame.left,
            top: frame.top,
            width: frame.width,
            height: frame.height,
            delay_hundredths: frame.delay,
            disposal: DisposalMethod::from(frame.dispose),
            transparent_index: frame.transparent,
            local_palette_entries: frame.palette.as_ref().map(|palette| palette.len() / RGB_LEN),
        }
    }

    /// Returns the zero-based frame position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the frame origin as `(left, top)`.
    #[must_use]
    pub fn origin(&self) -> (u16, u16) {
        (self.left, self.top)
    }

    /// Returns the frame size as `(width, height)`.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Returns the frame delay in hundredths of a second.
    #[must_use]
    pub fn delay_hundredths(&self) -> u16 {
        self.delay_hundredths
    }

    /// Returns the disposal method.
    #[must_use]
    pub fn disposal(&self) -> DisposalMethod {
        self.disposal
    }

    /// Returns the transparent palette index, if any.
    #[must_use]
    pub fn transparent_index(&self) -> Option<u8> {
        self.transparent_index
    }

    /// Returns the local palette size when the frame carries one.
    #[must_use]
    pub fn local_palette_entries(&self) -> Option<usize> {
        self.local_palette_entries
    }
}

/// Structure of an encoded GIF as seen by a standard decoder.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GifSummary {
    width: u16,
    height: u16,
    global_palette_entries: Option<usize>,
    loop_behaviour: LoopBehaviour,
    frames: Vec<FrameSummary>,
}

impl GifSummary {
    /// Decodes every frame of `bytes` and collects their control data.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a decodable GIF stream.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GifSummaryError> {
        let invalid = |source| GifSummaryError::InvalidGif { source };
        let mut options = gif::DecodeOptions::new();
        options.check_frame_consistency(true);
        let mut decoder = options.read_info(Cursor::new(bytes)).map_err(invalid)?;
        let width = decoder.width();
        let height = decoder.height();
        let global_palette_entries = decoder
            .global_palette()
            .map(|palette| palette.len() / RGB_LEN);

        let mut frames = Vec::new();
        while let Some(frame) = decoder.read_next_frame().map_err(invalid)? {
            frames.push(FrameSummary::from_frame(frames.len(), frame));
        }

        Ok(Self {
            width,
            height,
            global_palette_entries,
            loop_behaviour: decoder.repeat().into(),
            frames,
        })
    }

    /// Returns the logical screen size as `(width, height)`.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Returns the global palette size, if the stream has one.
    #[must_use]
    pub fn global_palette_entries(&self) -> Option<usize> {
        self.global_palette_entries
    }

    /// Returns the announced loop behaviour.
    #[must_use]
    pub fn loop_behaviour(&self) -> LoopBehaviour {
        self.loop_behaviour
    }

    /// Returns the decoded frames in stream order.
    #[must_use]
    pub fn frames(&self) -> &[FrameSummary] {
        &self.frames
    }
}
