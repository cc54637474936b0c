mod animated_gif;
mod color_table;
mod frame_buffer;
mod frame_source;
mod gif_summary;
mod transparency;

pub(crate) use self::color_table::{COLOR_TABLE_FLAG, COLOR_TABLE_SIZE_MASK};
pub(crate) use self::frame_buffer::{DESCRIPTOR_PACKED_OFFSET, IMAGE_DESCRIPTOR_LEN};

pub use self::animated_gif::{AnimatedGif, PersistError};
pub use self::color_table::{
    ColorTable, Rgb, RgbParseError, has_global_table, table_size, tables_equal,
};
pub use self::frame_buffer::{FrameBuffer, FrameBufferError, GifVersion};
pub use self::frame_source::{FrameSource, SourceError};
pub use self::gif_summary::{FrameSummary, GifSummary, GifSummaryError, LoopBehaviour};
pub use self::transparency::{NoTransparency, SentinelColour, TransparencyMatcher};
