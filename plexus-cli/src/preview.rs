use anyhow::{bail, Context, Result};
use plexus_core::{FrameQueue, ParticleConfig, ParticleField, RenderLoop, Vector2D};
use plexus_shared::{FrameSummary, ParticleSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::svg::SvgSurface;

/// What to simulate in a headless preview run
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub width: f32,
    pub height: f32,
    pub frames: u32,
    pub seed: u64,
    pub settings: ParticleSettings,
    /// Pointer held still at this position for the whole run
    pub pointer: Option<Vector2D>,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            frames: 120,
            seed: 0,
            settings: ParticleSettings::default(),
            pointer: None,
        }
    }
}

/// Result of a preview run
#[derive(Debug, Clone)]
pub struct Preview {
    /// The last frame as an SVG document
    pub svg: String,
    /// One summary per frame, in order
    pub summaries: Vec<FrameSummary>,
}

impl Preview {
    pub fn last_summary(&self) -> Option<&FrameSummary> {
        self.summaries.last()
    }
}

/// Run the particle field for `options.frames` frames without a display.
pub fn run(options: &PreviewOptions) -> Result<Preview> {
    if options.frames == 0 {
        bail!("at least one frame is required");
    }
    if !(options.width > 0.0 && options.height > 0.0) {
        bail!(
            "surface must have a positive size, got {}x{}",
            options.width,
            options.height
        );
    }
    if !(options.width.is_finite() && options.height.is_finite()) {
        bail!(
            "surface must have a finite size, got {}x{}",
            options.width,
            options.height
        );
    }

    let config = ParticleConfig::from(&options.settings);
    let mut field = ParticleField::new(config, StdRng::seed_from_u64(options.seed));
    field.resize(options.width, options.height);
    log::info!(
        "Simulating {} particles on {}x{} for {} frames (seed {})",
        field.particles().len(),
        options.width,
        options.height,
        options.frames,
        options.seed
    );

    let queue = FrameQueue::new();
    let render_loop = RenderLoop::attach(field, Some(SvgSurface::new()), queue.clone())
        .context("Failed to attach SVG surface")?;

    if let Some(pointer) = options.pointer {
        render_loop.pointer().set(pointer.x, pointer.y);
    }

    render_loop.start();
    let mut summaries = Vec::new();

    for _ in 0..options.frames {
        queue.run_frame();
        if !render_loop.is_running() {
            bail!("render loop stopped after {} frames", render_loop.frames());
        }

        let summary = render_loop.with_field(|field| FrameSummary {
            frame: render_loop.frames(),
            particles: field.particles().len(),
            connections: field.connections().len(),
            mean_speed: field.mean_speed(),
        });
        log::debug!(
            "frame {}: {} connections, mean speed {:.3}",
            summary.frame,
            summary.connections,
            summary.mean_speed
        );
        summaries.push(summary);
    }

    render_loop.stop();
    // The frame queued before stop() is now a no-op; running it releases the loop.
    queue.run_frame();

    let svg = render_loop.with_surface(|surface| surface.to_document());
    Ok(Preview { svg, summaries })
}

/// Parse a pointer position given as `x,y`.
pub fn parse_point(value: &str) -> Result<Vector2D> {
    let (x, y) = value
        .split_once(',')
        .context("expected a position of the form x,y")?;
    let x: f32 = x.trim().parse().context("invalid x coordinate")?;
    let y: f32 = y.trim().parse().context("invalid y coordinate")?;
    Ok(Vector2D::new(x, y))
}
