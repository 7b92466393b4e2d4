use plexus_core::{FrameCallback, FrameScheduler};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

/// Schedules frames with `window.requestAnimationFrame`
pub struct AnimationFrameScheduler {
    window: Window,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    type Error = JsValue;

    fn request_frame(&self, callback: FrameCallback) -> Result<(), JsValue> {
        let closure = Closure::once_into_js(move || callback());
        self.window
            .request_animation_frame(closure.unchecked_ref())
            .map(|_handle| ())
            .map_err(|err| {
                console_log!("requestAnimationFrame failed: {:?}", err);
                err
            })
    }
}
