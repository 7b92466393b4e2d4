use rand::Rng;

use crate::config::ParticleConfig;
use crate::{PointerMode, Vector2D};

const MIN_DENSITY: f32 = 1.0;
const MAX_DENSITY: f32 = 31.0;

/// A single particle of the field
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub radius: f32,
    pub opacity: f32,
    /// Scales how far the pointer displaces this particle
    pub density: f32,
}

impl Particle {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            position,
            velocity,
            radius: 2.0,
            opacity: 0.8,
            density: MIN_DENSITY,
        }
    }

    /// A particle placed uniformly within `[0, width) × [0, height)`.
    ///
    /// Each velocity component is uniform in
    /// `[-max_velocity / 2, max_velocity / 2)`.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        width: f32,
        height: f32,
        config: &ParticleConfig,
    ) -> Self {
        let position = Vector2D::new(sample(rng, 0.0, width), sample(rng, 0.0, height));
        let velocity = Vector2D::new(
            (rng.gen::<f32>() - 0.5) * config.max_velocity,
            (rng.gen::<f32>() - 0.5) * config.max_velocity,
        );

        Self {
            position,
            velocity,
            radius: sample(rng, config.min_radius, config.max_radius),
            opacity: config.particle_opacity,
            density: sample(rng, MIN_DENSITY, MAX_DENSITY),
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }
}

// `gen_range` panics on an empty or unbounded range, which a zero-sized or
// infinite canvas produces.
fn sample<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low && (high - low).is_finite() {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// Push (or pull) `particle` away from the pointer.
///
/// Only particles strictly inside `repel_distance` are affected. The
/// displacement falls off linearly with distance and is scaled by the
/// particle's density and the configured force.
pub fn apply_pointer(particle: &mut Particle, pointer: Vector2D, config: &ParticleConfig) {
    let reach = config.repel_distance;
    if reach <= 0.0 {
        return;
    }

    let offset = particle.position - pointer;
    let distance = offset.magnitude();
    // No direction to push along when the pointer sits on the particle.
    if distance <= 0.0 || distance >= reach {
        return;
    }

    let falloff = 1.0 - distance / reach;
    let strength = falloff * particle.density * config.repel_force;
    let direction = offset / distance;

    match config.pointer_mode {
        PointerMode::Repel => particle.position += direction * strength,
        // Never pull a particle past the pointer.
        PointerMode::Attract => particle.position += direction * -strength.min(distance),
    }
}

pub fn advance(particle: &mut Particle) {
    particle.position += particle.velocity;
}

/// Bounce `particle` off the edges of a `width × height` surface.
///
/// `previous` is the position at the start of the frame. A particle that
/// crossed an edge this frame is mirrored back inside; one that was already
/// outside only has its velocity turned inwards.
pub fn reflect(particle: &mut Particle, previous: Vector2D, width: f32, height: f32) {
    reflect_axis(
        &mut particle.position.x,
        &mut particle.velocity.x,
        previous.x,
        width,
    );
    reflect_axis(
        &mut particle.position.y,
        &mut particle.velocity.y,
        previous.y,
        height,
    );
}

fn reflect_axis(position: &mut f32, velocity: &mut f32, previous: f32, extent: f32) {
    let was_inside = (0.0..=extent).contains(&previous);

    if *position < 0.0 {
        *velocity = positive(*velocity);
        if was_inside {
            *position = (-*position).min(extent);
        }
    } else if *position > extent {
        *velocity = -positive(*velocity);
        if was_inside {
            *position = (2.0 * extent - *position).max(0.0);
        }
    }
}

fn positive(value: f32) -> f32 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_particle_advance() {
        let mut particle = Particle::new(Vector2D::new(0.0, 0.0), Vector2D::new(1.0, 1.0));

        advance(&mut particle);

        assert_eq!(particle.position, Vector2D::new(1.0, 1.0));
    }

    #[test]
    fn test_random_particle_within_ranges() {
        let config = ParticleConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let particle = Particle::random(&mut rng, 300.0, 200.0, &config);
            assert!((0.0..300.0).contains(&particle.position.x));
            assert!((0.0..200.0).contains(&particle.position.y));
            assert!(particle.velocity.x.abs() <= config.max_velocity / 2.0);
            assert!(particle.velocity.y.abs() <= config.max_velocity / 2.0);
            assert!((config.min_radius..config.max_radius).contains(&particle.radius));
            assert!((MIN_DENSITY..MAX_DENSITY).contains(&particle.density));
            assert_eq!(particle.opacity, config.particle_opacity);
        }
    }

    #[test]
    fn test_random_particle_on_empty_surface() {
        let config = ParticleConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        let particle = Particle::random(&mut rng, 0.0, 0.0, &config);

        assert_eq!(particle.position, Vector2D::zero());
    }

    #[test]
    fn test_random_particle_on_unbounded_surface() {
        let config = ParticleConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        let particle = Particle::random(&mut rng, f32::INFINITY, 50.0, &config);

        assert_eq!(particle.position.x, 0.0);
        assert!((0.0..50.0).contains(&particle.position.y));
        assert!((config.min_radius..config.max_radius).contains(&particle.radius));
    }

    #[test]
    fn test_reflect_mirrors_across_edge() {
        let previous = Vector2D::new(1.0, 99.0);
        let mut particle = Particle::new(Vector2D::new(-2.0, 103.0), Vector2D::new(-3.0, 4.0));

        reflect(&mut particle, previous, 100.0, 100.0);

        assert_eq!(particle.position, Vector2D::new(2.0, 97.0));
        assert_eq!(particle.velocity, Vector2D::new(3.0, -4.0));
    }

    #[test]
    fn test_reflect_leaves_outside_particle_in_place() {
        let previous = Vector2D::new(1000.0, 1000.0);
        let mut particle = Particle::new(previous, Vector2D::new(2.0, 0.0));

        reflect(&mut particle, previous, 100.0, 100.0);

        assert_eq!(particle.position, previous);
        assert_eq!(particle.velocity.x, -2.0);
        assert_eq!(particle.velocity.y, 0.0);
    }

    #[test]
    fn test_reflect_never_leaves_tiny_surface() {
        let previous = Vector2D::new(1.0, 1.0);
        let mut particle = Particle::new(Vector2D::new(-5.0, 6.0), Vector2D::new(-6.0, 5.0));

        reflect(&mut particle, previous, 2.0, 2.0);

        assert_eq!(particle.position, Vector2D::new(2.0, 0.0));
    }

    #[test]
    fn test_pointer_repels_with_falloff() {
        let config = ParticleConfig::default();
        let mut particle = Particle::new(Vector2D::new(50.0, 0.0), Vector2D::zero());
        particle.density = 10.0;

        apply_pointer(&mut particle, Vector2D::zero(), &config);

        // (1 - 50/100) * 10 * 0.05
        assert!((particle.position.x - 50.25).abs() < 1e-5);
        assert_eq!(particle.position.y, 0.0);
    }

    #[test]
    fn test_pointer_out_of_reach_ignored() {
        let config = ParticleConfig::default();
        let mut particle = Particle::new(Vector2D::new(100.0, 0.0), Vector2D::zero());

        apply_pointer(&mut particle, Vector2D::zero(), &config);

        assert_eq!(particle.position, Vector2D::new(100.0, 0.0));
    }

    #[test]
    fn test_pointer_on_particle_ignored() {
        let config = ParticleConfig::default();
        let mut particle = Particle::new(Vector2D::new(10.0, 10.0), Vector2D::zero());

        apply_pointer(&mut particle, Vector2D::new(10.0, 10.0), &config);

        assert_eq!(particle.position, Vector2D::new(10.0, 10.0));
    }

    #[test]
    fn test_pointer_attract_does_not_overshoot() {
        let config = ParticleConfig {
            pointer_mode: PointerMode::Attract,
            repel_force: 10.0,
            ..ParticleConfig::default()
        };
        let mut particle = Particle::new(Vector2D::new(2.0, 0.0), Vector2D::zero());
        particle.density = 30.0;

        apply_pointer(&mut particle, Vector2D::zero(), &config);

        assert_eq!(particle.position, Vector2D::zero());
    }
}
