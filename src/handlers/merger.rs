use tracing::{debug, info, instrument};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use super::{FrameSplicer, HeaderBuilder, MergeConfig, StreamAssembler};
use crate::error::{ConfigError, MergeError};
use crate::{AnimatedGif, FrameBuffer, FrameSource};

/// Merges single-frame GIFs into one animation without re-encoding pixels.
#[derive(Debug, Clone)]
pub struct GifMerger {
    config: MergeConfig,
}

impl GifMerger {
    /// Creates a merger for a fixed configuration.
    #[must_use]
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// Returns the merge configuration.
    #[must_use]
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Loads every source, validates it and merges the frames in order.
    ///
    /// The frame count is checked against the configured delays before any
    /// source is read.
    ///
    /// # Errors
    ///
    /// Returns an error if the counts disagree, a source cannot be read, or a
    /// source is not a well-formed GIF. The error names the failing frame.
    #[instrument(skip_all, level = "info", fields(frames = sources.len()))]
    pub fn merge_sources(&self, sources: Vec<FrameSource>) -> Result<AnimatedGif, MergeError> {
        self.check_frame_count(sources.len())?;
        let frames = sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| {
                debug!(index, %source, "loading frame");
                let bytes = source
                    .load()
                    .map_err(|source| MergeError::Source { index, source })?;
                validate_frame(index, bytes)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.assemble(&frames))
    }

    /// Validates in-memory GIF buffers and merges them in order.
    ///
    /// ```
    /// use gif_merge::{GifMerger, MergeConfig};
    ///
    /// let frame = vec![
    ///     0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00,
    ///     0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00,
    ///     0x00, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02,
    ///     0x44, 0x01, 0x00, 0x3B,
    /// ];
    /// let merger = GifMerger::new(MergeConfig::builder().delays(vec![10, 20]).build());
    /// let gif = merger.merge_bytes(vec![frame.clone(), frame])?;
    /// assert!(gif.as_bytes().starts_with(b"GIF89a"));
    /// assert_eq!(Some(&0x3B), gif.as_bytes().last());
    /// assert_eq!(2, gif.frame_count());
    /// # Ok::<(), gif_merge::MergeError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the counts disagree or a buffer is not a well-formed GIF.
    #[instrument(skip_all, level = "info", fields(frames = buffers.len()))]
    pub fn merge_bytes(&self, buffers: Vec<Vec<u8>>) -> Result<AnimatedGif, MergeError> {
        self.check_frame_count(buffers.len())?;
        let frames = buffers
            .into_iter()
            .enumerate()
            .map(|(index, bytes)| validate_frame(index, bytes))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.assemble(&frames))
    }

    /// Merges frames that were validated by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame count disagrees with the configured delays.
    pub fn merge_frames(&self, frames: &[FrameBuffer]) -> Result<AnimatedGif, MergeError> {
        self.check_frame_count(frames.len())?;
        Ok(self.assemble(frames))
    }

    fn check_frame_count(&self, sources: usize) -> Result<(), ConfigError> {
        let delays = self.config.delays().len();
        if sources != delays {
            return Err(ConfigError::DelayCountMismatch { sources, delays });
        }
        if sources == 0 {
            return Err(ConfigError::NoFrames);
        }
        Ok(())
    }

    /// Requires a non-empty slice whose length matches the configured delays.
    #[instrument(skip_all, level = "info", fields(frames = frames.len()))]
    fn assemble(&self, frames: &[FrameBuffer]) -> AnimatedGif {
        let span = tracing::Span::current();
        span.pb_set_message(&format!("Merging {} frame(s)", frames.len()));

        let first_frame = &frames[0];
        let header = HeaderBuilder::new(first_frame, self.config.loop_count())
            .with_compatibility(self.config.compatibility());
        let splicer = FrameSplicer::new(first_frame, &self.config);
        let capacity_hint = frames.iter().map(|frame| frame.as_bytes().len()).sum();

        let mut assembler = StreamAssembler::new(&header, capacity_hint);
        for (index, (frame, &delay)) in frames.iter().zip(self.config.delays()).enumerate() {
            let spliced = splicer.splice(frame, delay);
            debug!(
                index,
                delay,
                bytes = spliced.encoded_len(),
                "appending frame"
            );
            assembler.push_frame(&spliced);
        }

        let gif = assembler.finish();
        span.pb_set_finish_message(&format!(
            "Merged {} frame(s) into {} bytes",
            gif.frame_count(),
            gif.len()
        ));
        info!(frames = gif.frame_count(), bytes = gif.len(), "merged animation");
        gif
    }
}

fn validate_frame(index: usize, bytes: Vec<u8>) -> Result<FrameBuffer, MergeError> {
    FrameBuffer::try_from(bytes).map_err(|source| MergeError::from_frame(index, source))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    const MINIMAL_GIF_1X1: [u8; 43] = [
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
        0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
        0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3B,
    ];

    fn merger(delays: Vec<u16>) -> GifMerger {
        GifMerger::new(MergeConfig::builder().delays(delays).build())
    }

    #[test]
    fn merge_sources_checks_counts_before_reading() {
        let sources = vec![
            FrameSource::from(std::path::PathBuf::from("/missing/a.gif")),
            FrameSource::from(std::path::PathBuf::from("/missing/b.gif")),
            FrameSource::from(std::path::PathBuf::from("/missing/c.gif")),
        ];
        let result = merger(vec![10, 20]).merge_sources(sources);
        assert_matches!(
            result,
            Err(MergeError::Configuration(ConfigError::DelayCountMismatch {
                sources: 3,
                delays: 2,
            }))
        );
    }

    #[test]
    fn merge_bytes_rejects_empty_input() {
        assert_matches!(
            merger(Vec::new()).merge_bytes(Vec::new()),
            Err(MergeError::Configuration(ConfigError::NoFrames))
        );
    }

    #[test]
    fn merge_bytes_names_invalid_frame() {
        let result =
            merger(vec![1, 2]).merge_bytes(vec![MINIMAL_GIF_1X1.to_vec(), b"BMP".to_vec()]);
        let error = result.expect_err("second frame is not a gif");
        assert_eq!(Some(1), error.frame_index());
        assert_matches!(error, MergeError::InvalidFormat { index: 1, .. });
    }

    #[test]
    fn merge_bytes_reports_malformed_frame() {
        let truncated = MINIMAL_GIF_1X1[..30].to_vec();
        let result = merger(vec![1]).merge_bytes(vec![truncated]);
        assert_matches!(result, Err(MergeError::MalformedFrame { index: 0, .. }));
    }

    #[test]
    fn merge_sources_reports_unreadable_source() {
        let sources = vec![
            FrameSource::from(MINIMAL_GIF_1X1.to_vec()),
            FrameSource::from(std::path::PathBuf::from("/missing/b.gif")),
        ];
        let result = merger(vec![1, 2]).merge_sources(sources);
        assert_matches!(result, Err(MergeError::Source { index: 1, .. }));
    }

    #[test]
    fn merge_frames_preserves_input_order() -> Result<(), MergeError> {
        let frame = FrameBuffer::try_from(MINIMAL_GIF_1X1.to_vec()).expect("fixture is valid");
        let gif = merger(vec![0x0101, 0x0202, 0x0303]).merge_frames(&[
            frame.clone(),
            frame.clone(),
            frame,
        ])?;

        let control_blocks = gif
            .as_bytes()
            .windows(3)
            .filter(|window| *window == [0x21, 0xF9, 0x04])
            .count();
        assert_eq!(3, control_blocks);

        let positions: Vec<usize> = [0x01_u8, 0x02, 0x03]
            .iter()
            .map(|&delay| {
                gif.as_bytes()
                    .windows(6)
                    .position(|window| {
                        window[..3] == [0x21, 0xF9, 0x04] && window[4..] == [delay, delay]
                    })
                    .expect("every delay should be present")
            })
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        Ok(())
    }
}
