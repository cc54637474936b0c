use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::instrument;

/// Errors returned when persisting an animation.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The destination file could not be created or written.
    #[error("failed to write animated gif to `{}`", path.display())]
    WriteFile { path: PathBuf, source: io::Error },
    /// The destination writer failed.
    #[error("failed to write animated gif")]
    Write(#[from] io::Error),
}

/// Finished GIF89a animation produced by the merger.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AnimatedGif {
    frame_count: usize,
    bytes: Vec<u8>,
}

impl AnimatedGif {
    pub(crate) fn new(bytes: Vec<u8>, frame_count: usize) -> Self {
        Self { frame_count, bytes }
    }

    /// Returns the number of frames spliced into the animation.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Returns the encoded animation bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the animation and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the encoded length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns whether the encoded animation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Writes the animation to any byte sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn write_to<W>(&self, out: &mut W) -> Result<(), PersistError>
    where
        W: Write,
    {
        out.write_all(&self.bytes)?;
        out.flush()?;
        Ok(())
    }

    /// Creates or truncates `path` and writes the animation to it, returning the path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    #[instrument(
        skip_all,
        level = "debug",
        fields(path = %path.as_ref().display(), bytes = self.len())
    )]
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, PersistError> {
        let path = path.as_ref();
        let with_path = |source| PersistError::WriteFile {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::create(path).map_err(with_path)?;
        file.write_all(&self.bytes).map_err(with_path)?;
        file.flush().map_err(with_path)?;
        Ok(path.to_path_buf())
    }
}

impl AsRef<[u8]> for AnimatedGif {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<AnimatedGif> for Vec<u8> {
    fn from(gif: AnimatedGif) -> Self {
        gif.bytes
    }
}
