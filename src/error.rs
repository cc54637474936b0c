use thiserror::Error;

use crate::media::{FrameBufferError, SourceError};

/// Errors returned when the merge inputs disagree with the configuration.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ConfigError {
    #[error("sources don't match delays: {sources} source(s) but {delays} delay(s)")]
    DelayCountMismatch { sources: usize, delays: usize },
    #[error("at least one frame is required to build an animation")]
    NoFrames,
    #[error("invalid disposal method {value}; supported values are 0, 1, 2, 3")]
    InvalidDisposal { value: u8 },
}

/// Errors returned by a merge. Any error aborts the whole merge.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("frame {index} is not a gif")]
    InvalidFormat {
        index: usize,
        source: FrameBufferError,
    },
    #[error("frame {index} is malformed")]
    MalformedFrame {
        index: usize,
        source: FrameBufferError,
    },
    #[error("failed to load frame {index}")]
    Source { index: usize, source: SourceError },
}

impl MergeError {
    pub(crate) fn from_frame(index: usize, source: FrameBufferError) -> Self {
        if source.is_format_error() {
            Self::InvalidFormat { index, source }
        } else {
            Self::MalformedFrame { index, source }
        }
    }

    /// Returns the zero-based index of the frame that failed, if a frame did.
    #[must_use]
    pub fn frame_index(&self) -> Option<usize> {
        match self {
            Self::Configuration(_) => None,
            Self::InvalidFormat { index, .. }
            | Self::MalformedFrame { index, .. }
            | Self::Source { index, .. } => Some(*index),
        }
    }
}

/// Errors returned when validating runtime CLI options.
#[derive(Debug, Error)]
pub(crate) enum CliConfigError {
    #[error("output path `{}` is also an input frame", path.display())]
    OutputOverwritesFrame { path: std::path::PathBuf },
}

/// Errors returned by telemetry initialisation.
#[derive(Debug, Error)]
pub(crate) enum TelemetryError {
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}
