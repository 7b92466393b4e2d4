use plexus_core::{ParticleConfig, ParticleField, RenderLoop, Rgb};
use plexus_shared::ParticleSettings;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, TouchEvent, Window,
};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (crate::log(&format_args!($($t)*).to_string()))
}

pub mod canvas;
pub mod scheduler;

use canvas::CanvasSurface;
use scheduler::AnimationFrameScheduler;

type BackgroundLoop = RenderLoop<StdRng, CanvasSurface, AnimationFrameScheduler>;

/// Custom property a theme publishes its particle color through
const THEME_COLOR_PROPERTY: &str = "--particle-color";

/// Animated particle network drawn on a `<canvas>`
#[wasm_bindgen]
pub struct ParticleBackground {
    render_loop: BackgroundLoop,
    canvas: HtmlCanvasElement,
    window: Window,
}

#[wasm_bindgen]
impl ParticleBackground {
    /// Attach to the canvas with id `canvas_id`.
    ///
    /// `settings_json` is an optional JSON object of particle settings.
    /// Resolves to `undefined` when the page has no such canvas or it has no
    /// 2D context, so pages without the background keep working.
    pub fn mount(
        canvas_id: &str,
        settings_json: Option<String>,
    ) -> Result<Option<ParticleBackground>, JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;

        let Some(element) = document.get_element_by_id(canvas_id) else {
            console_log!("canvas #{} not found, particle background disabled", canvas_id);
            return Ok(None);
        };
        let canvas = element.dyn_into::<HtmlCanvasElement>()?;

        let settings = match settings_json {
            Some(json) => ParticleSettings::from_json(&json)
                .map_err(|err| JsValue::from_str(&format!("invalid particle settings: {}", err)))?,
            None => ParticleSettings::default(),
        };

        let surface = canvas
            .get_context("2d")?
            .map(|context| context.dyn_into::<CanvasRenderingContext2d>())
            .transpose()?
            .map(CanvasSurface::new);

        let (width, height) = displayed_size(&window, &canvas);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let mut field = ParticleField::new(ParticleConfig::from(&settings), StdRng::from_entropy());
        field.resize(width as f32, height as f32);

        let scheduler = AnimationFrameScheduler::new(window.clone());
        let Some(render_loop) = RenderLoop::attach(field, surface, scheduler) else {
            console_log!("canvas #{} has no 2d context, particle background disabled", canvas_id);
            return Ok(None);
        };

        console_log!(
            "Particle background mounted on #{} with {} particles",
            canvas_id,
            render_loop.with_field(|field| field.particles().len())
        );

        Ok(Some(ParticleBackground {
            render_loop,
            canvas,
            window,
        }))
    }

    pub fn start(&self) {
        self.render_loop.start();
    }

    pub fn stop(&self) {
        self.render_loop.stop();
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    /// Completed animation frames, saturating at `u32::MAX`.
    pub fn frames(&self) -> u32 {
        u32::try_from(self.render_loop.frames()).unwrap_or(u32::MAX)
    }

    /// Resize the canvas and regenerate the particles for the new area.
    pub fn resize(&self, width: f64, height: f64) {
        self.canvas.set_width(pixels(width));
        self.canvas.set_height(pixels(height));
        self.render_loop
            .with_field(|field| field.resize(width as f32, height as f32));
        console_log!("Resized to {}x{}", width, height);
    }

    /// Resize to the canvas' current on-screen size.
    pub fn fit(&self) {
        let (width, height) = displayed_size(&self.window, &self.canvas);
        self.resize(width, height);
    }

    /// Report the pointer position in canvas coordinates.
    pub fn pointer_move(&self, x: f64, y: f64) {
        self.render_loop.pointer().set(x as f32, y as f32);
    }

    pub fn handle_pointer_move(&self, event: MouseEvent) {
        self.client_pointer_move(event.client_x() as f64, event.client_y() as f64);
    }

    /// Track the first active touch; with no touches left the pointer is gone.
    pub fn handle_touch_move(&self, event: TouchEvent) {
        match event.touches().item(0) {
            Some(touch) => {
                self.client_pointer_move(touch.client_x() as f64, touch.client_y() as f64)
            }
            None => self.pointer_leave(),
        }
    }

    pub fn has_pointer(&self) -> bool {
        self.render_loop.pointer().get().is_some()
    }

    /// The pointer left the tracked area.
    pub fn pointer_leave(&self) {
        self.render_loop.pointer().clear();
    }

    /// Set the particle color from a CSS `rgb()`/`rgba()` value.
    pub fn set_base_color(&self, css: &str) -> Result<(), JsValue> {
        let color = Rgb::from_css(css).map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.render_loop
            .with_field(|field| field.set_base_color(color));
        Ok(())
    }

    /// Re-read the particle color from the theme's `--particle-color`
    /// property on `<body>`. Returns whether the color changed.
    pub fn sync_theme_color(&self) -> Result<bool, JsValue> {
        let document = self.window.document().ok_or("no document")?;
        let body = document.body().ok_or("no body")?;
        let Some(style) = self.window.get_computed_style(&body)? else {
            return Ok(false);
        };

        let value = style.get_property_value(THEME_COLOR_PROPERTY)?;
        match Rgb::from_css(&value) {
            Ok(color) => {
                self.render_loop
                    .with_field(|field| field.set_base_color(color));
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    pub fn particle_count(&self) -> usize {
        self.render_loop.with_field(|field| field.particles().len())
    }

    pub fn connection_count(&self) -> usize {
        self.render_loop.with_field(|field| field.connections().len())
    }
}

impl ParticleBackground {
    fn client_pointer_move(&self, client_x: f64, client_y: f64) {
        let canvas_element: &Element = self.canvas.as_ref();
        let rect = canvas_element.get_bounding_client_rect();
        self.pointer_move(client_x - rect.left(), client_y - rect.top());
    }
}

/// Canvas backing-store size for a CSS length; unusable lengths are empty.
fn pixels(length: f64) -> u32 {
    if length.is_finite() {
        length.max(0.0) as u32
    } else {
        0
    }
}

/// The canvas' on-screen size, falling back to the viewport when it has not
/// been laid out yet.
fn displayed_size(window: &Window, canvas: &HtmlCanvasElement) -> (f64, f64) {
    let width = match canvas.client_width() {
        w if w > 0 => w as f64,
        _ => window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0),
    };
    let height = match canvas.client_height() {
        h if h > 0 => h as f64,
        _ => window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0),
    };
    (width, height)
}
