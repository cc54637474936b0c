use tracing::{debug, instrument};

use super::frame_splicer::SplicedFrame;
use super::header_builder::HeaderBuilder;
use crate::AnimatedGif;

const TRAILER: u8 = 0x3B;

/// Owns the growing animation buffer.
///
/// The header is written once on construction, frames are appended in call
/// order and the trailer is written by [`StreamAssembler::finish`].
#[derive(Debug)]
pub struct StreamAssembler {
    buffer: Vec<u8>,
    frame_count: usize,
}

impl StreamAssembler {
    /// Starts an animation with the header produced by `header`.
    #[must_use]
    #[instrument(skip(header), level = "debug")]
    pub fn new(header: &HeaderBuilder<'_>, capacity_hint: usize) -> Self {
        let mut buffer = Vec::with_capacity(capacity_hint);
        header.write_into(&mut buffer);
        debug!(header_len = buffer.len(), "started animation stream");
        Self {
            buffer,
            frame_count: 0,
        }
    }

    /// Appends one spliced frame after the previously appended ones.
    pub fn push_frame(&mut self, frame: &SplicedFrame<'_>) {
        frame.write_into(&mut self.buffer);
        self.frame_count += 1;
    }

    /// Returns the number of frames appended so far.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns whether nothing has been written, which never holds after construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Writes the trailer and hands the animation to the caller.
    #[must_use]
    #[instrument(skip_all, level = "debug", fields(frames = self.frame_count))]
    pub fn finish(mut self) -> AnimatedGif {
        self.buffer.push(TRAILER);
        debug!(bytes = self.buffer.len(), "closed animation stream");
        AnimatedGif::new(self.buffer, self.frame_count)
    }
}
