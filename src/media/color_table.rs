use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Packed-fields bit marking a colour table as present.
pub(crate) const COLOR_TABLE_FLAG: u8 = 0x80;
/// Packed-fields bits holding the colour-table size exponent.
pub(crate) const COLOR_TABLE_SIZE_MASK: u8 = 0x07;
const RGB_LEN: usize = 3;

/// Errors returned when parsing an RGB colour from text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RgbParseError {
    #[error("invalid colour `{value}`; expected six hexadecimal digits such as `FFFFFF`")]
    InvalidHex {
        value: String,
        #[source]
        source: hex::FromHexError,
    },
}

/// One RGB palette entry.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure white, the historical "transparent" sentinel.
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);

    /// Creates an RGB colour.
    ///
    /// ```
    /// use gif_merge::Rgb;
    ///
    /// let colour = Rgb::new(255, 127, 0);
    /// assert_eq!(127, colour.g);
    /// ```
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn from_triple(triple: &[u8]) -> Self {
        Self::new(triple[0], triple[1], triple[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = RgbParseError;

    /// Parses `RRGGBB` or `#RRGGBB`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        let mut channels = [0_u8; RGB_LEN];
        hex::decode_to_slice(digits, &mut channels).map_err(|source| {
            RgbParseError::InvalidHex {
                value: value.to_string(),
                source,
            }
        })?;
        Ok(Self::from_triple(&channels))
    }
}

/// Returns the number of RGB entries declared by a packed-fields byte.
///
/// Only the low three bits take part: the table holds `2^(bits + 1)` entries.
///
/// ```
/// use gif_merge::table_size;
///
/// assert_eq!(2, table_size(0x80));
/// assert_eq!(256, table_size(0x87));
/// ```
#[must_use]
pub const fn table_size(packed_fields: u8) -> u16 {
    2 << (packed_fields & COLOR_TABLE_SIZE_MASK)
}

/// Returns whether a logical-screen packed-fields byte declares a global colour table.
///
/// ```
/// use gif_merge::has_global_table;
///
/// assert!(has_global_table(0xF7));
/// assert!(!has_global_table(0x07));
/// ```
#[must_use]
pub const fn has_global_table(packed_fields: u8) -> bool {
    packed_fields & COLOR_TABLE_FLAG != 0
}

/// Byte length of the colour table declared by a packed-fields byte.
pub(crate) const fn table_len_bytes(packed_fields: u8) -> usize {
    RGB_LEN * table_size(packed_fields) as usize
}

/// Compares the first `entry_count` RGB triples of two tables.
///
/// A table holding fewer than `entry_count` entries never compares equal.
///
/// ```
/// use gif_merge::tables_equal;
///
/// let black_white = [0, 0, 0, 255, 255, 255];
/// let black_red = [0, 0, 0, 255, 0, 0];
/// assert!(tables_equal(&black_white, &black_white, 2));
/// assert!(!tables_equal(&black_white, &black_red, 2));
/// assert!(tables_equal(&black_white, &black_red, 1));
/// ```
#[must_use]
pub fn tables_equal(table_a: &[u8], table_b: &[u8], entry_count: usize) -> bool {
    let Some(len) = entry_count.checked_mul(RGB_LEN) else {
        return false;
    };
    match (table_a.get(..len), table_b.get(..len)) {
        (Some(a), Some(b)) => a
            .chunks_exact(RGB_LEN)
            .zip(b.chunks_exact(RGB_LEN))
            .all(|(left, right)| left == right),
        _ => false,
    }
}

/// Borrowed view of a colour table inside a source GIF.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ColorTable<'a> {
    bytes: &'a [u8],
}

impl<'a> ColorTable<'a> {
    /// Wraps raw table bytes; a trailing partial triple is ignored.
    ///
    /// ```
    /// use gif_merge::{ColorTable, Rgb};
    ///
    /// let table = ColorTable::new(&[0, 0, 0, 255, 255, 255]);
    /// assert_eq!(2, table.len());
    /// assert_eq!(Some(Rgb::WHITE), table.get(1));
    /// ```
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        let whole_entries = bytes.len() - bytes.len() % RGB_LEN;
        Self {
            bytes: &bytes[..whole_entries],
        }
    }

    /// Returns the number of RGB entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len() / RGB_LEN
    }

    /// Returns whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the raw table bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Rgb> {
        let start = index.checked_mul(RGB_LEN)?;
        self.bytes.get(start..start + RGB_LEN).map(Rgb::from_triple)
    }

    /// Iterates over the RGB entries in palette order.
    pub fn entries(&self) -> impl Iterator<Item = Rgb> + 'a {
        self.bytes.chunks_exact(RGB_LEN).map(Rgb::from_triple)
    }

    /// Returns the palette index of the first entry equal to `colour`.
    ///
    /// Indexes that cannot be expressed as a GIF palette index (above 255) are ignored.
    #[must_use]
    pub fn position(&self, colour: Rgb) -> Option<u8> {
        self.entries()
            .position(|entry| entry == colour)
            .and_then(|index| u8::try_from(index).ok())
    }

    /// Returns whether both tables hold the same number of identical entries.
    #[must_use]
    pub fn same_entries(&self, other: &ColorTable<'_>) -> bool {
        self.len() == other.len() && tables_equal(self.bytes, other.bytes, self.len())
    }
}
