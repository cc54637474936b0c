use thiserror::Error;

use super::color_table::{
    COLOR_TABLE_FLAG, COLOR_TABLE_SIZE_MASK, ColorTable, has_global_table, table_len_bytes,
    table_size,
};
use crate::utils::format_hex;

const SIGNATURE_LEN: usize = 6;
const GIF87A_SIGNATURE: &[u8; SIGNATURE_LEN] = b"GIF87a";
const GIF89A_SIGNATURE: &[u8; SIGNATURE_LEN] = b"GIF89a";
const LOGICAL_SCREEN_START: usize = SIGNATURE_LEN;
const LOGICAL_SCREEN_END: usize = 13;
const PACKED_FIELDS_OFFSET: usize = 10;
const EXTENSION_INTRODUCER: u8 = 0x21;
const IMAGE_SEPARATOR: u8 = 0x2C;
const TRAILER_LEN: usize = 1;

/// Length of an image descriptor including its `0x2C` separator.
pub(crate) const IMAGE_DESCRIPTOR_LEN: usize = 10;
/// Offset of the packed-fields byte inside an image descriptor.
pub(crate) const DESCRIPTOR_PACKED_OFFSET: usize = 9;

/// Errors returned when validating a single-frame GIF buffer.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum FrameBufferError {
    /// The first six bytes are not `GIF87a` or `GIF89a`.
    #[error("not a gif: expected signature `GIF87a` or `GIF89a`, found {found}")]
    InvalidSignature { found: String },
    /// The buffer ends inside the logical screen descriptor.
    #[error("gif is too short: expected at least 13 bytes, got {actual}")]
    TooShort { actual: usize },
    /// The declared global colour table runs past the end of the buffer.
    #[error(
        "global colour table of {entries} entries ends at byte {end} but the gif has {actual} bytes"
    )]
    TruncatedColorTable {
        entries: u16,
        end: usize,
        actual: usize,
    },
    /// An extension block preceding the image runs past the end of the buffer.
    #[error("extension block at byte {offset} runs past the end of the gif")]
    TruncatedExtension { offset: usize },
    /// Something other than an extension or image separator follows the header.
    #[error("expected an image descriptor (0x2C) at byte {offset}, found {found:#04X}")]
    MissingImageDescriptor { offset: usize, found: u8 },
    /// The image descriptor, its local colour table or the trailer is cut short.
    #[error("image descriptor at byte {offset} is truncated: the gif has {actual} bytes")]
    TruncatedImageDescriptor { offset: usize, actual: usize },
}

impl FrameBufferError {
    /// Returns whether the buffer is not a GIF at all, as opposed to a damaged one.
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::InvalidSignature { .. })
    }
}

/// GIF container version named by the signature.
#[derive(Debug, Clone, Copy, Eq, PartialEq, strum_macros::Display)]
pub enum GifVersion {
    #[strum(to_string = "GIF87a")]
    Gif87a,
    #[strum(to_string = "GIF89a")]
    Gif89a,
}

/// Validated single-frame GIF buffer.
///
/// Validation locates the image descriptor so every structural accessor is an
/// in-bounds slice of the original bytes. The pixel data is never decoded.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FrameBuffer {
    version: GifVersion,
    descriptor_offset: usize,
    bytes: Vec<u8>,
}

impl FrameBuffer {
    /// Returns the signature version of the source frame.
    #[must_use]
    pub fn version(&self) -> GifVersion {
        self.version
    }

    /// Returns the raw source bytes.
    ///
    /// ```
    /// use gif_merge::FrameBuffer;
    ///
    /// let bytes = vec![
    ///     0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00,
    ///     0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00,
    ///     0x00, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02,
    ///     0x44, 0x01, 0x00, 0x3B,
    /// ];
    /// let frame = FrameBuffer::try_from(bytes.clone())?;
    /// assert_eq!(bytes.as_slice(), frame.as_bytes());
    /// # Ok::<(), gif_merge::FrameBufferError>(())
    /// ```
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the frame and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the logical screen width.
    #[must_use]
    pub fn width(&self) -> u16 {
        u16::from_le_bytes([self.bytes[6], self.bytes[7]])
    }

    /// Returns the logical screen height.
    #[must_use]
    pub fn height(&self) -> u16 {
        u16::from_le_bytes([self.bytes[8], self.bytes[9]])
    }

    /// Returns the logical-screen packed-fields byte (byte 10).
    #[must_use]
    pub fn packed_fields(&self) -> u8 {
        self.bytes[PACKED_FIELDS_OFFSET]
    }

    /// Returns the colour-table size exponent (packed-fields bits 0-2).
    #[must_use]
    pub fn size_exponent(&self) -> u8 {
        self.packed_fields() & COLOR_TABLE_SIZE_MASK
    }

    /// Returns the number of entries the packed-fields byte declares.
    #[must_use]
    pub fn table_size(&self) -> u16 {
        table_size(self.packed_fields())
    }

    /// Returns whether the frame carries a global colour table.
    #[must_use]
    pub fn has_global_table(&self) -> bool {
        has_global_table(self.packed_fields())
    }

    /// Returns bytes `6..13`: width, height, packed fields, background index and aspect ratio.
    #[must_use]
    pub fn logical_screen_descriptor(&self) -> &[u8] {
        &self.bytes[LOGICAL_SCREEN_START..LOGICAL_SCREEN_END]
    }

    /// Returns the global colour table, if the frame declares one.
    ///
    /// ```
    /// use gif_merge::{FrameBuffer, Rgb};
    ///
    /// let bytes = vec![
    ///     0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00,
    ///     0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00,
    ///     0x00, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02,
    ///     0x44, 0x01, 0x00, 0x3B,
    /// ];
    /// let frame = FrameBuffer::try_from(bytes)?;
    /// let table = frame.global_color_table().expect("frame declares a table");
    /// assert_eq!(Some(Rgb::WHITE), table.get(1));
    /// # Ok::<(), gif_merge::FrameBufferError>(())
    /// ```
    #[must_use]
    pub fn global_color_table(&self) -> Option<ColorTable<'_>> {
        self.has_global_table().then(|| {
            ColorTable::new(&self.bytes[LOGICAL_SCREEN_END..self.color_table_end()])
        })
    }

    /// Returns the 10-byte image descriptor, starting with its `0x2C` separator.
    #[must_use]
    pub fn image_descriptor(&self) -> &[u8] {
        &self.bytes[self.descriptor_offset..self.descriptor_offset + IMAGE_DESCRIPTOR_LEN]
    }

    /// Returns whether the image descriptor declares its own local colour table.
    #[must_use]
    pub fn has_local_table(&self) -> bool {
        self.image_descriptor()[DESCRIPTOR_PACKED_OFFSET] & COLOR_TABLE_FLAG != 0
    }

    /// Returns the local colour table declared by the image descriptor.
    #[must_use]
    pub fn local_color_table(&self) -> Option<ColorTable<'_>> {
        let packed = self.image_descriptor()[DESCRIPTOR_PACKED_OFFSET];
        self.has_local_table().then(|| {
            let start = self.descriptor_offset + IMAGE_DESCRIPTOR_LEN;
            ColorTable::new(&self.bytes[start..start + table_len_bytes(packed)])
        })
    }

    /// Returns the palette the image is drawn with: the local table if present, else the global one.
    #[must_use]
    pub fn active_color_table(&self) -> Option<ColorTable<'_>> {
        self.local_color_table()
            .or_else(|| self.global_color_table())
    }

    /// Returns everything after the image descriptor up to, but excluding, the final trailer byte.
    ///
    /// This holds any local colour table, the LZW minimum code size, the data
    /// sub-blocks and their terminator, copied verbatim into the animation.
    #[must_use]
    pub fn image_data(&self) -> &[u8] {
        let start = self.descriptor_offset + IMAGE_DESCRIPTOR_LEN;
        &self.bytes[start..self.bytes.len() - TRAILER_LEN]
    }

    fn color_table_end(&self) -> usize {
        color_table_end(self.packed_fields())
    }

    fn validate(bytes: &[u8]) -> Result<(GifVersion, usize), FrameBufferError> {
        let version = match bytes.get(..SIGNATURE_LEN) {
            Some(signature) if signature == GIF87A_SIGNATURE => GifVersion::Gif87a,
            Some(signature) if signature == GIF89A_SIGNATURE => GifVersion::Gif89a,
            _ => {
                let found = &bytes[..bytes.len().min(SIGNATURE_LEN)];
                return Err(FrameBufferError::InvalidSignature {
                    found: format_hex(found),
                });
            }
        };
        if bytes.len() < LOGICAL_SCREEN_END {
            return Err(FrameBufferError::TooShort {
                actual: bytes.len(),
            });
        }

        let packed = bytes[PACKED_FIELDS_OFFSET];
        let table_end = color_table_end(packed);
        if table_end > bytes.len() {
            return Err(FrameBufferError::TruncatedColorTable {
                entries: table_size(packed),
                end: table_end,
                actual: bytes.len(),
            });
        }

        let descriptor_offset = find_image_descriptor(bytes, table_end)?;
        let descriptor_end = descriptor_offset + IMAGE_DESCRIPTOR_LEN;
        let truncated = FrameBufferError::TruncatedImageDescriptor {
            offset: descriptor_offset,
            actual: bytes.len(),
        };
        let Some(descriptor) = bytes.get(descriptor_offset..descriptor_end) else {
            return Err(truncated);
        };
        let local_packed = descriptor[DESCRIPTOR_PACKED_OFFSET];
        let local_table_len = if local_packed & COLOR_TABLE_FLAG != 0 {
            table_len_bytes(local_packed)
        } else {
            0
        };
        if descriptor_end + local_table_len + TRAILER_LEN > bytes.len() {
            return Err(truncated);
        }

        Ok((version, descriptor_offset))
    }
}

impl TryFrom<Vec<u8>> for FrameBuffer {
    type Error = FrameBufferError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        let (version, descriptor_offset) = Self::validate(&bytes)?;
        Ok(Self {
            version,
            descriptor_offset,
            bytes,
        })
    }
}

impl TryFrom<&[u8]> for FrameBuffer {
    type Error = FrameBufferError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from(bytes.to_vec())
    }
}

fn color_table_end(packed: u8) -> usize {
    if has_global_table(packed) {
        LOGICAL_SCREEN_END + table_len_bytes(packed)
    } else {
        LOGICAL_SCREEN_END
    }
}

/// Skips extension blocks starting at `offset` until an image separator.
fn find_image_descriptor(bytes: &[u8], mut offset: usize) -> Result<usize, FrameBufferError> {
    loop {
        match bytes.get(offset) {
            Some(&IMAGE_SEPARATOR) => return Ok(offset),
            Some(&EXTENSION_INTRODUCER) => offset = skip_extension(bytes, offset)?,
            Some(&found) => {
                return Err(FrameBufferError::MissingImageDescriptor { offset, found });
            }
            None => {
                return Err(FrameBufferError::TruncatedImageDescriptor {
                    offset,
                    actual: bytes.len(),
                });
            }
        }
    }
}

/// Returns the offset just past the extension starting at `start`.
fn skip_extension(bytes: &[u8], start: usize) -> Result<usize, FrameBufferError> {
    // introducer and label, then length-prefixed sub-blocks ending with a zero length
    let mut cursor = start + 2;
    loop {
        let Some(&block_len) = bytes.get(cursor) else {
            return Err(FrameBufferError::TruncatedExtension { offset: start });
        };
        cursor += 1 + usize::from(block_len);
        if block_len == 0 {
            return Ok(cursor);
        }
    }
}
