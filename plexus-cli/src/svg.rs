use plexus_core::{Rgba, Surface, Vector2D};
use std::fmt::{self, Write};

/// Renders a particle frame as a standalone SVG document
#[derive(Debug, Default)]
pub struct SvgSurface {
    width: f32,
    height: f32,
    body: String,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last frame drawn, as a complete SVG document.
    pub fn to_document(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

impl Surface for SvgSurface {
    type Error = fmt::Error;

    fn clear(&mut self, width: f32, height: f32) -> Result<(), fmt::Error> {
        self.width = width;
        self.height = height;
        self.body.clear();
        Ok(())
    }

    fn fill_circle(&mut self, center: Vector2D, radius: f32, color: Rgba) -> Result<(), fmt::Error> {
        writeln!(
            self.body,
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"rgb({},{},{})\" fill-opacity=\"{:.3}\"/>",
            center.x, center.y, radius, color.r, color.g, color.b, color.a
        )
    }

    fn stroke_line(
        &mut self,
        from: Vector2D,
        to: Vector2D,
        width: f32,
        color: Rgba,
    ) -> Result<(), fmt::Error> {
        writeln!(
            self.body,
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"rgb({},{},{})\" stroke-opacity=\"{:.3}\" stroke-width=\"{}\"/>",
            from.x, from.y, to.x, to.y, color.r, color.g, color.b, color.a, width
        )
    }
}
