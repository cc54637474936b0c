use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned when reading a frame's raw bytes.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source file could not be read.
    #[error("failed to read gif frame from `{}`", path.display())]
    Read { path: PathBuf, source: io::Error },
}

/// Where a frame's raw GIF bytes come from.
#[derive(Debug, Clone, Eq, PartialEq, derive_more::From)]
pub enum FrameSource {
    /// A GIF file on disk.
    Path(PathBuf),
    /// A GIF already held in memory.
    Bytes(Vec<u8>),
}

impl FrameSource {
    /// Reads the raw bytes of this source.
    ///
    /// ```
    /// use gif_merge::FrameSource;
    ///
    /// let source = FrameSource::from(b"GIF89a".to_vec());
    /// assert_eq!(b"GIF89a".to_vec(), source.load()?);
    /// # Ok::<(), gif_merge::SourceError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if a file source cannot be read.
    pub fn load(self) -> Result<Vec<u8>, SourceError> {
        match self {
            Self::Path(path) => {
                std::fs::read(&path).map_err(|source| SourceError::Read { path, source })
            }
            Self::Bytes(bytes) => Ok(bytes),
        }
    }
}

impl fmt::Display for FrameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Bytes(bytes) => write!(f, "<{} bytes in memory>", bytes.len()),
        }
    }
}
