mod frame_splicer;
mod graphic_control;
mod header_builder;
mod merge_config;
mod merger;
mod stream_assembler;

pub use self::frame_splicer::{FrameSplicer, SplicedFrame};
pub use self::graphic_control::{
    DisposalMethod, FrameDelay, FrameDelayError, GraphicControlExtension,
};
pub use self::header_builder::{HeaderBuilder, NetscapeLoopExtension};
pub use self::merge_config::{CompatibilityMode, MergeConfig};
pub use self::merger::GifMerger;
pub use self::stream_assembler::StreamAssembler;
