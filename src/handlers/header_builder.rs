use tracing::{trace, warn};

use super::CompatibilityMode;
use crate::FrameBuffer;
use crate::utils::format_hex;

const GIF89A_SIGNATURE: &[u8; 6] = b"GIF89a";
const EXTENSION_INTRODUCER: u8 = 0x21;
const APPLICATION_LABEL: u8 = 0xFF;
const NETSCAPE_APPLICATION_ID: &[u8; 11] = b"NETSCAPE2.0";
const LOOP_SUB_BLOCK_LEN: u8 = 0x03;
const LOOP_SUB_BLOCK_ID: u8 = 0x01;
const BLOCK_TERMINATOR: u8 = 0x00;

/// Encoded length of the Netscape looping extension.
pub(crate) const NETSCAPE_EXTENSION_LEN: usize = 19;

/// Netscape 2.0 application extension announcing the animation loop count.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct NetscapeLoopExtension {
    loop_count: u16,
}

impl NetscapeLoopExtension {
    /// Creates the extension; `0` loops forever.
    #[must_use]
    pub fn new(loop_count: u16) -> Self {
        Self { loop_count }
    }

    /// Returns the encoded repetition count.
    #[must_use]
    pub fn loop_count(&self) -> u16 {
        self.loop_count
    }

    /// Encodes `21 FF 0B "NETSCAPE2.0" 03 01 <loop LE> 00`.
    ///
    /// ```
    /// use gif_merge::NetscapeLoopExtension;
    ///
    /// let encoded = NetscapeLoopExtension::new(0x0102).encode();
    /// assert_eq!(&[0x21, 0xFF, 0x0B], &encoded[..3]);
    /// assert_eq!(b"NETSCAPE2.0", &encoded[3..14]);
    /// assert_eq!(&[0x03, 0x01, 0x02, 0x01, 0x00], &encoded[14..]);
    /// ```
    #[must_use]
    pub fn encode(&self) -> [u8; NETSCAPE_EXTENSION_LEN] {
        let [loop_low, loop_high] = self.loop_count.to_le_bytes();
        let mut encoded = [0_u8; NETSCAPE_EXTENSION_LEN];
        encoded[0] = EXTENSION_INTRODUCER;
        encoded[1] = APPLICATION_LABEL;
        encoded[2] = NETSCAPE_APPLICATION_ID.len() as u8;
        encoded[3..14].copy_from_slice(NETSCAPE_APPLICATION_ID);
        encoded[14..].copy_from_slice(&[
            LOOP_SUB_BLOCK_LEN,
            LOOP_SUB_BLOCK_ID,
            loop_low,
            loop_high,
            BLOCK_TERMINATOR,
        ]);
        encoded
    }
}

/// Builds the animation header from the first frame.
#[derive(Debug, Clone, Copy)]
pub struct HeaderBuilder<'a> {
    first_frame: &'a FrameBuffer,
    loop_extension: NetscapeLoopExtension,
    compatibility: CompatibilityMode,
}

impl<'a> HeaderBuilder<'a> {
    /// Creates a builder for `first_frame` with the legacy header layout.
    #[must_use]
    pub fn new(first_frame: &'a FrameBuffer, loop_count: u16) -> Self {
        Self {
            first_frame,
            loop_extension: NetscapeLoopExtension::new(loop_count),
            compatibility: CompatibilityMode::default(),
        }
    }

    /// Selects how a first frame without a global colour table is handled.
    #[must_use]
    pub fn with_compatibility(mut self, compatibility: CompatibilityMode) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// Returns the header bytes.
    ///
    /// The header is `GIF89a`, the first frame's logical screen descriptor and
    /// global colour table, then the Netscape loop extension. In legacy mode a
    /// first frame without a global colour table yields the bare signature.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut header = Vec::new();
        self.write_into(&mut header);
        header
    }

    /// Appends the header bytes to `out`.
    pub fn write_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(GIF89A_SIGNATURE);

        let table = self.first_frame.global_color_table();
        if table.is_none() && self.compatibility == CompatibilityMode::Legacy {
            warn!(
                "first frame has no global colour table; omitting screen descriptor and loop extension"
            );
            return;
        }

        out.extend_from_slice(self.first_frame.logical_screen_descriptor());
        if let Some(table) = table {
            out.extend_from_slice(table.as_bytes());
        }
        out.extend_from_slice(&self.loop_extension.encode());
        trace!(
            screen = %format_hex(self.first_frame.logical_screen_descriptor()),
            loop_count = self.loop_extension.loop_count(),
            "wrote animation header"
        );
    }
}
