// Layout: font metrics, word wrap and page flow for rendered documents.
// The PDF exporter paints the flow output as-is; CPU-bound, so async callers
// run it inside tokio::task::spawn_blocking.

pub mod embedded_font;
pub mod flow;
pub mod font_metrics;
pub mod glyphs;
pub mod page_fill;
pub mod wrap;

pub use flow::{layout_document, LaidOutPage, Placed};
pub use font_metrics::{
    default_page_config, get_metrics, metrics_for, FontFamily, FontWeight, Orientation,
    PageConfig, PageFormat, TextMetrics, Typeface,
};
pub use glyphs::{select_typeface, unsupported_chars};
pub use page_fill::{analyze_page_fill, PageFillAnalysis, PageFillVerdict};
