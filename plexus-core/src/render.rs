use alloc::vec::Vec;
use core::convert::Infallible;

use crate::config::ParticleConfig;
use crate::particle::Particle;
use crate::{Rgba, Vector2D};

/// Drawing primitives a particle field renders through
///
/// Implemented by the host's rendering context: a 2D canvas in the browser,
/// an SVG document in the previewer.
pub trait Surface {
    type Error;

    fn clear(&mut self, width: f32, height: f32) -> Result<(), Self::Error>;

    fn fill_circle(&mut self, center: Vector2D, radius: f32, color: Rgba)
        -> Result<(), Self::Error>;

    fn stroke_line(
        &mut self,
        from: Vector2D,
        to: Vector2D,
        width: f32,
        color: Rgba,
    ) -> Result<(), Self::Error>;
}

/// A line drawn between two nearby particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from: Vector2D,
    pub to: Vector2D,
    pub distance: f32,
    pub opacity: f32,
}

/// Opacity of the line joining two particles `distance` apart.
///
/// Fades linearly from `base` at distance zero to nothing at `threshold`.
/// Pairs at or beyond the threshold are not connected at all.
pub fn connection_opacity(distance: f32, threshold: f32, base: f32) -> Option<f32> {
    if distance < threshold {
        Some(base * (1.0 - distance / threshold))
    } else {
        None
    }
}

/// All connections between distinct pairs of particles.
///
/// Pairwise, so quadratic in the particle count; the count clamp keeps this
/// affordable.
pub fn connections(particles: &[Particle], config: &ParticleConfig) -> Vec<Connection> {
    let mut lines = Vec::new();

    for (index, a) in particles.iter().enumerate() {
        for b in &particles[index + 1..] {
            let distance = a.position.distance(&b.position);
            if let Some(opacity) = connection_opacity(
                distance,
                config.connection_distance,
                config.connection_opacity,
            ) {
                lines.push(Connection {
                    from: a.position,
                    to: b.position,
                    distance,
                    opacity,
                });
            }
        }
    }

    lines
}

/// Clear `surface`, then draw every particle followed by every connection.
pub fn draw<S: Surface + ?Sized>(
    particles: &[Particle],
    width: f32,
    height: f32,
    config: &ParticleConfig,
    surface: &mut S,
) -> Result<(), S::Error> {
    surface.clear(width, height)?;

    for particle in particles {
        surface.fill_circle(
            particle.position,
            particle.radius,
            config.base_color.with_alpha(particle.opacity),
        )?;
    }

    for line in connections(particles, config) {
        surface.stroke_line(
            line.from,
            line.to,
            config.line_width,
            config.base_color.with_alpha(line.opacity),
        )?;
    }

    Ok(())
}

/// A single primitive captured by [`Recording`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
    },
    Circle {
        center: Vector2D,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Vector2D,
        to: Vector2D,
        width: f32,
        color: Rgba,
    },
}

/// In-memory surface that records what was drawn
#[derive(Debug, Clone, Default)]
pub struct Recording {
    pub commands: Vec<DrawCommand>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn lines(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Line { .. }))
            .count()
    }
}

impl Surface for Recording {
    type Error = Infallible;

    fn clear(&mut self, width: f32, height: f32) -> Result<(), Self::Error> {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { width, height });
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Vector2D,
        radius: f32,
        color: Rgba,
    ) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: Vector2D,
        to: Vector2D,
        width: f32,
        color: Rgba,
    ) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
        Ok(())
    }
}
