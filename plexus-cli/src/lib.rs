//! Headless previewer for the particle background.

pub mod preview;
pub mod svg;

pub use preview::{parse_point, run, Preview, PreviewOptions};
pub use svg::SvgSurface;
