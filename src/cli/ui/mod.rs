mod inspect_view;
mod painter;
mod table;

pub(crate) use self::inspect_view::GifSummaryView;
pub(crate) use self::painter::Painter;
