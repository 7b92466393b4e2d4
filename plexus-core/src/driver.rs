use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt::Debug;
use std::rc::Rc;

use rand::Rng;

use crate::field::ParticleField;
use crate::render::Surface;
use crate::Vector2D;

pub type FrameCallback = Box<dyn FnOnce()>;

/// Runs a callback once, on the next display frame
pub trait FrameScheduler {
    type Error;

    /// Queue `callback` for the next frame. An error means it will never run.
    fn request_frame(&self, callback: FrameCallback) -> Result<(), Self::Error>;
}

/// Headless scheduler: callbacks wait in a queue until the host pumps a frame
#[derive(Clone, Default)]
pub struct FrameQueue {
    pending: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run every callback queued before this call and return how many ran.
    /// Callbacks they queue in turn wait for the next frame.
    pub fn run_frame(&self) -> usize {
        let due: Vec<FrameCallback> = self.pending.borrow_mut().drain(..).collect();
        let count = due.len();
        for callback in due {
            callback();
        }
        count
    }
}

impl FrameScheduler for FrameQueue {
    type Error = Infallible;

    fn request_frame(&self, callback: FrameCallback) -> Result<(), Infallible> {
        self.pending.borrow_mut().push_back(callback);
        Ok(())
    }
}

/// Latest pointer position, shared between input handlers and the render loop
///
/// The coordinates are stored as one value, so a reader never sees x from one
/// event paired with y from another.
#[derive(Debug, Clone, Default)]
pub struct SharedPointer(Rc<Cell<Option<Vector2D>>>);

impl SharedPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, x: f32, y: f32) {
        self.0.set(Some(Vector2D::new(x, y)));
    }

    pub fn clear(&self) {
        self.0.set(None);
    }

    pub fn get(&self) -> Option<Vector2D> {
        self.0.get()
    }
}

struct LoopState<R, S, F> {
    field: RefCell<ParticleField<R>>,
    surface: RefCell<S>,
    scheduler: F,
    pointer: SharedPointer,
    running: Cell<bool>,
    generation: Cell<u64>,
    frames: Cell<u64>,
}

/// Drives a particle field: one `step()` + `render()` per frame while running
///
/// Cloning yields another handle to the same loop.
pub struct RenderLoop<R, S, F> {
    state: Rc<LoopState<R, S, F>>,
}

impl<R, S, F> Clone for RenderLoop<R, S, F> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<R, S, F> RenderLoop<R, S, F>
where
    R: Rng + 'static,
    S: Surface + 'static,
    S::Error: Debug,
    F: FrameScheduler + 'static,
    F::Error: Debug,
{
    /// Bind a field to a drawing surface and a scheduler.
    ///
    /// Returns `None` when there is no surface to draw on; the background is
    /// then simply absent.
    pub fn attach(field: ParticleField<R>, surface: Option<S>, scheduler: F) -> Option<Self> {
        let Some(surface) = surface else {
            log::debug!("no drawing surface, particle background disabled");
            return None;
        };

        log::debug!(
            "attached particle field with {} particles ({}x{})",
            field.particles().len(),
            field.width(),
            field.height()
        );

        Some(Self {
            state: Rc::new(LoopState {
                field: RefCell::new(field),
                surface: RefCell::new(surface),
                scheduler,
                pointer: SharedPointer::new(),
                running: Cell::new(false),
                generation: Cell::new(0),
                frames: Cell::new(0),
            }),
        })
    }

    pub fn start(&self) {
        if self.state.running.get() {
            return;
        }
        self.state.running.set(true);
        // Frames queued by an earlier run must not resume alongside this one.
        self.state.generation.set(self.state.generation.get() + 1);
        log::debug!("render loop started");
        Self::schedule(&self.state);
    }

    /// Stop after the frame in progress, if any. A frame already queued with
    /// the scheduler becomes a no-op.
    pub fn stop(&self) {
        if self.state.running.replace(false) {
            log::debug!(
                "render loop stopped after {} frames",
                self.state.frames.get()
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Number of completed step + render pairs.
    pub fn frames(&self) -> u64 {
        self.state.frames.get()
    }

    /// Handle for input handlers to report the pointer position.
    pub fn pointer(&self) -> SharedPointer {
        self.state.pointer.clone()
    }

    pub fn with_field<T>(&self, f: impl FnOnce(&mut ParticleField<R>) -> T) -> T {
        f(&mut self.state.field.borrow_mut())
    }

    pub fn with_surface<T>(&self, f: impl FnOnce(&mut S) -> T) -> T {
        f(&mut self.state.surface.borrow_mut())
    }

    fn schedule(state: &Rc<LoopState<R, S, F>>) {
        let generation = state.generation.get();
        let next = Rc::clone(state);
        let requested = state
            .scheduler
            .request_frame(Box::new(move || Self::tick(&next, generation)));

        if let Err(err) = requested {
            log::warn!("frame request failed, stopping render loop: {:?}", err);
            state.running.set(false);
        }
    }

    fn tick(state: &Rc<LoopState<R, S, F>>, generation: u64) {
        if !state.running.get() || state.generation.get() != generation {
            return;
        }

        {
            let mut field = state.field.borrow_mut();
            field.set_pointer(state.pointer.get());
            field.step();

            let mut surface = state.surface.borrow_mut();
            if let Err(err) = field.render(&mut *surface) {
                log::warn!("particle render failed, stopping render loop: {:?}", err);
                state.running.set(false);
                return;
            }
        }

        state.frames.set(state.frames.get() + 1);

        if state.running.get() {
            Self::schedule(state);
        }
    }
}
