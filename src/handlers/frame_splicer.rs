use tracing::trace;

use super::graphic_control::{GRAPHIC_CONTROL_LEN, GraphicControlExtension};
use super::{CompatibilityMode, DisposalMethod, MergeConfig};
use crate::media::{
    COLOR_TABLE_FLAG, COLOR_TABLE_SIZE_MASK, DESCRIPTOR_PACKED_OFFSET, IMAGE_DESCRIPTOR_LEN,
};
use crate::{FrameBuffer, TransparencyMatcher};

/// Frame block ready to append to the animation.
///
/// Borrows the optional local colour table and the image data from the source
/// frame; only the control block and the descriptor are rewritten.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SplicedFrame<'a> {
    control: GraphicControlExtension,
    descriptor: [u8; IMAGE_DESCRIPTOR_LEN],
    local_color_table: Option<&'a [u8]>,
    image_data: &'a [u8],
}

impl SplicedFrame<'_> {
    /// Returns the synthesized Graphic Control Extension.
    #[must_use]
    pub fn control(&self) -> GraphicControlExtension {
        self.control
    }

    /// Returns the (possibly rewritten) image descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &[u8] {
        &self.descriptor
    }

    /// Returns the colour table inserted as a local table, if the frame keeps one.
    #[must_use]
    pub fn local_color_table(&self) -> Option<&[u8]> {
        self.local_color_table
    }

    /// Returns the verbatim image data following the descriptor.
    #[must_use]
    pub fn image_data(&self) -> &[u8] {
        self.image_data
    }

    /// Returns the number of bytes this block occupies in the animation.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        GRAPHIC_CONTROL_LEN
            + IMAGE_DESCRIPTOR_LEN
            + self.local_color_table.map_or(0, <[u8]>::len)
            + self.image_data.len()
    }

    /// Appends control block, descriptor, local table and image data to `out`.
    pub fn write_into(&self, out: &mut Vec<u8>) {
        out.reserve(self.encoded_len());
        out.extend_from_slice(&self.control.encode());
        out.extend_from_slice(&self.descriptor);
        if let Some(table) = self.local_color_table {
            out.extend_from_slice(table);
        }
        out.extend_from_slice(self.image_data);
    }
}

/// Rewrites the container structure of each frame relative to the first frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameSplicer<'a> {
    first_frame: &'a FrameBuffer,
    disposal: DisposalMethod,
    compatibility: CompatibilityMode,
    transparency: &'a dyn TransparencyMatcher,
}

impl<'a> FrameSplicer<'a> {
    /// Creates a splicer comparing every frame against `first_frame`.
    #[must_use]
    pub fn new(first_frame: &'a FrameBuffer, config: &'a MergeConfig) -> Self {
        Self {
            first_frame,
            disposal: config.disposal(),
            compatibility: config.compatibility(),
            transparency: config.transparency(),
        }
    }

    /// Produces the animation block for `frame` shown for `delay_hundredths`.
    ///
    /// When the frame's global colour table differs from the first frame's, it
    /// is kept as a local table and the descriptor's packed byte is rewritten
    /// to declare it. Identical tables are dropped so the decoder reuses the
    /// animation's global table.
    #[must_use]
    pub fn splice<'f>(&self, frame: &'f FrameBuffer, delay_hundredths: u16) -> SplicedFrame<'f> {
        let transparent_index = frame
            .active_color_table()
            .and_then(|table| self.transparency.transparent_index(&table));
        let control = GraphicControlExtension::new(self.disposal, delay_hundredths)
            .with_transparent_index(transparent_index);

        let mut descriptor = [0_u8; IMAGE_DESCRIPTOR_LEN];
        descriptor.copy_from_slice(frame.image_descriptor());

        let local_color_table = match frame.global_color_table() {
            // a descriptor-level table already travels inside the image data
            Some(_) if frame.has_local_table() => None,
            Some(table) if !self.matches_first_frame(frame) => {
                let packed = &mut descriptor[DESCRIPTOR_PACKED_OFFSET];
                *packed = ((*packed | COLOR_TABLE_FLAG) & !COLOR_TABLE_SIZE_MASK)
                    | self.local_size_exponent(frame);
                Some(table.as_bytes())
            }
            _ => None,
        };

        trace!(
            transparent_index,
            keeps_local_table = local_color_table.is_some(),
            "spliced frame"
        );

        SplicedFrame {
            control,
            descriptor,
            local_color_table,
            image_data: frame.image_data(),
        }
    }

    fn matches_first_frame(&self, frame: &FrameBuffer) -> bool {
        match (
            self.first_frame.global_color_table(),
            frame.global_color_table(),
        ) {
            (Some(first), Some(table)) => first.same_entries(&table),
            _ => false,
        }
    }

    /// Legacy output declares the first frame's table size on every retained local table.
    fn local_size_exponent(&self, frame: &FrameBuffer) -> u8 {
        match self.compatibility {
            CompatibilityMode::Legacy => self.first_frame.size_exponent(),
            CompatibilityMode::Strict => frame.size_exponent(),
        }
    }
}
