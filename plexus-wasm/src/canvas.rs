use plexus_core::{Rgba, Surface, Vector2D};
use std::f64::consts::TAU;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// A 2D canvas context as a particle drawing surface
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Self { context }
    }
}

impl Surface for CanvasSurface {
    type Error = JsValue;

    fn clear(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.context
            .clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
        Ok(())
    }

    fn fill_circle(&mut self, center: Vector2D, radius: f32, color: Rgba) -> Result<(), JsValue> {
        self.context.set_fill_style_str(&color.to_css());
        self.context.begin_path();
        self.context.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius),
            0.0,
            TAU,
        )?;
        self.context.close_path();
        self.context.fill();
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: Vector2D,
        to: Vector2D,
        width: f32,
        color: Rgba,
    ) -> Result<(), JsValue> {
        self.context.set_stroke_style_str(&color.to_css());
        self.context.set_line_width(f64::from(width));
        self.context.begin_path();
        self.context.move_to(f64::from(from.x), f64::from(from.y));
        self.context.line_to(f64::from(to.x), f64::from(to.y));
        self.context.stroke();
        Ok(())
    }
}
