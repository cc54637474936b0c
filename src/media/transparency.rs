use std::fmt;

use super::color_table::{ColorTable, Rgb};

/// Decides which palette index, if any, a frame renders as transparent.
///
/// The merger calls the matcher once per frame with the frame's own colour
/// table. The returned index is written into the frame's Graphic Control
/// Extension with the transparency flag set.
pub trait TransparencyMatcher: fmt::Debug + Send + Sync {
    /// Returns the transparent palette index for `table`.
    fn transparent_index(&self, table: &ColorTable<'_>) -> Option<u8>;
}

/// Treats the first palette entry equal to a fixed colour as transparent.
///
/// The default colour is white (`FFFFFF`). This mirrors encoders that reserve a
/// "magic" colour for transparency instead of reading the frame's own Graphic
/// Control Extension, so any opaque white in a frame becomes transparent too.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SentinelColour(Rgb);

impl SentinelColour {
    /// Sentinel white, the compatibility default.
    pub const WHITE: Self = Self(Rgb::WHITE);

    /// Creates a matcher for a custom sentinel colour.
    ///
    /// ```
    /// use gif_merge::{ColorTable, Rgb, SentinelColour, TransparencyMatcher};
    ///
    /// let magenta = SentinelColour::new(Rgb::new(255, 0, 255));
    /// let table = ColorTable::new(&[0, 0, 0, 255, 0, 255]);
    /// assert_eq!(Some(1), magenta.transparent_index(&table));
    /// ```
    #[must_use]
    pub const fn new(colour: Rgb) -> Self {
        Self(colour)
    }

    /// Returns the sentinel colour.
    #[must_use]
    pub const fn colour(&self) -> Rgb {
        self.0
    }
}

impl Default for SentinelColour {
    fn default() -> Self {
        Self::WHITE
    }
}

impl TransparencyMatcher for SentinelColour {
    fn transparent_index(&self, table: &ColorTable<'_>) -> Option<u8> {
        table.position(self.0)
    }
}

/// Never marks any palette entry as transparent.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct NoTransparency;

impl TransparencyMatcher for NoTransparency {
    fn transparent_index(&self, _table: &ColorTable<'_>) -> Option<u8> {
        None
    }
}
