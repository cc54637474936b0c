mod app;
mod cli;
mod error;
mod handlers;
mod media;
mod telemetry;
mod terminal;
mod utils;

pub use app::{run, run_with_clients, run_with_log_level};
pub use cli::{Args, Command, InspectArgs, LogLevel, MergeArgs, OutputFormat};
pub use error::{ConfigError, MergeError};
pub use handlers::{
    CompatibilityMode, DisposalMethod, FrameDelay, FrameDelayError, FrameSplicer, GifMerger,
    GraphicControlExtension, HeaderBuilder, MergeConfig, NetscapeLoopExtension, SplicedFrame,
    StreamAssembler,
};
pub use media::{
    AnimatedGif, ColorTable, FrameBuffer, FrameBufferError, FrameSource, FrameSummary,
    GifSummary, GifSummaryError, GifVersion, LoopBehaviour, NoTransparency, PersistError, Rgb,
    RgbParseError, SentinelColour, SourceError, TransparencyMatcher, has_global_table,
    table_size, tables_equal,
};
pub use terminal::TerminalClient;
