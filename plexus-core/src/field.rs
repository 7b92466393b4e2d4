use alloc::vec::Vec;
use rand::Rng;

use crate::config::ParticleConfig;
use crate::particle::{self, Particle};
use crate::render::{self, Connection, Surface};
use crate::{Rgb, Vector2D};

/// The particle field: owns the particles and the surface dimensions
///
/// Randomness is injected so a seeded generator reproduces a field exactly.
pub struct ParticleField<R> {
    particles: Vec<Particle>,
    config: ParticleConfig,
    width: f32,
    height: f32,
    pointer: Option<Vector2D>,
    rng: R,
}

impl<R: Rng> ParticleField<R> {
    /// An empty, zero-sized field. Call [`initialize`](Self::initialize) or
    /// [`resize`](Self::resize) to populate it.
    pub fn new(config: ParticleConfig, rng: R) -> Self {
        Self {
            particles: Vec::new(),
            config,
            width: 0.0,
            height: 0.0,
            pointer: None,
            rng,
        }
    }

    /// A field of `width × height` populated with `count` random particles,
    /// clamped to the configured range.
    pub fn with_count(
        width: f32,
        height: f32,
        count: usize,
        config: ParticleConfig,
        rng: R,
    ) -> Self {
        let mut field = Self::new(config, rng);
        field.initialize(width, height, count);
        field
    }

    /// Replace every particle with `count` fresh random ones on a
    /// `width × height` surface.
    pub fn initialize(&mut self, width: f32, height: f32, count: usize) {
        self.width = extent(width);
        self.height = extent(height);

        let count = self.config.clamp_count(count);
        let (width, height, config) = (self.width, self.height, self.config);
        let rng = &mut self.rng;
        self.particles = (0..count)
            .map(|_| Particle::random(&mut *rng, width, height, &config))
            .collect();
    }

    /// Adopt new surface dimensions and regenerate the whole field.
    pub fn resize(&mut self, width: f32, height: f32) {
        let (width, height) = (extent(width), extent(height));
        let count = self.config.target_count(width, height);
        self.initialize(width, height, count);
    }
}

/// A usable surface dimension: negative, NaN and infinite sizes are empty.
fn extent(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

impl<R> ParticleField<R> {
    /// A field with exactly the given particles, bypassing the count clamp.
    pub fn from_particles(
        width: f32,
        height: f32,
        config: ParticleConfig,
        rng: R,
        particles: Vec<Particle>,
    ) -> Self {
        Self {
            particles,
            config,
            width: extent(width),
            height: extent(height),
            pointer: None,
            rng,
        }
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self) {
        let pointer = self.pointer;
        let (width, height) = (self.width, self.height);

        for particle in self.particles.iter_mut() {
            let previous = particle.position;
            if let Some(pointer) = pointer {
                particle::apply_pointer(particle, pointer, &self.config);
            }
            particle::advance(particle);
            particle::reflect(particle, previous, width, height);
        }
    }

    /// Draw the current frame onto `surface`.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), S::Error> {
        render::draw(
            &self.particles,
            self.width,
            self.height,
            &self.config,
            surface,
        )
    }

    /// The connections the next [`render`](Self::render) would draw.
    pub fn connections(&self) -> Vec<Connection> {
        render::connections(&self.particles, &self.config)
    }

    pub fn set_pointer(&mut self, pointer: Option<Vector2D>) {
        self.pointer = pointer;
    }

    pub fn pointer(&self) -> Option<Vector2D> {
        self.pointer
    }

    pub fn set_base_color(&mut self, color: Rgb) {
        self.config = self.config.with_base_color(color);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn mean_speed(&self) -> f32 {
        if self.particles.is_empty() {
            return 0.0;
        }
        let total: f32 = self.particles.iter().map(Particle::speed).sum();
        total / self.particles.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Recording;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn scenario_field() -> ParticleField<StdRng> {
        ParticleField::from_particles(
            100.0,
            100.0,
            ParticleConfig::default(),
            seeded(1),
            vec![
                Particle::new(Vector2D::new(0.0, 0.0), Vector2D::new(1.0, 1.0)),
                Particle::new(Vector2D::new(5.0, 5.0), Vector2D::new(-1.0, -1.0)),
                Particle::new(Vector2D::new(1000.0, 1000.0), Vector2D::zero()),
            ],
        )
    }

    #[test]
    fn test_field_creation() {
        let field = ParticleField::with_count(800.0, 600.0, 50, ParticleConfig::default(), seeded(1));
        assert_eq!(field.particles().len(), 50);
        assert_eq!(field.width(), 800.0);
        assert_eq!(field.height(), 600.0);
        assert_eq!(field.pointer(), None);
    }

    #[test]
    fn test_initialize_clamps_count() {
        let mut field = ParticleField::new(ParticleConfig::default(), seeded(1));

        field.initialize(800.0, 600.0, 3);
        assert_eq!(field.particles().len(), 30);

        field.initialize(800.0, 600.0, 10_000);
        assert_eq!(field.particles().len(), 150);
    }

    #[test]
    fn test_resize_count_always_in_range() {
        let mut field = ParticleField::new(ParticleConfig::default(), seeded(2));

        for (width, height) in [
            (0.0, 0.0),
            (1.0, 1.0),
            (320.0, 480.0),
            (1500.0, 1000.0),
            (1920.0, 1080.0),
            (8000.0, 8000.0),
            (-50.0, 200.0),
        ] {
            field.resize(width, height);
            let count = field.particles().len();
            assert!((30..=150).contains(&count), "{count} particles for {width}x{height}");
        }
    }

    #[test]
    fn test_resize_non_finite_surface_is_empty() {
        let mut field = ParticleField::new(ParticleConfig::default(), seeded(4));

        for (width, height) in [
            (f32::INFINITY, 100.0),
            (100.0, f32::INFINITY),
            (f32::NEG_INFINITY, f32::INFINITY),
            (f32::NAN, 600.0),
        ] {
            field.resize(width, height);
            assert_eq!(field.particles().len(), 30, "{width}x{height}");
            assert_eq!(field.width(), if width.is_finite() { width } else { 0.0 });
            assert_eq!(field.height(), if height.is_finite() { height } else { 0.0 });

            field.step();
            for particle in field.particles() {
                assert!(particle.position.x.is_finite() && particle.position.y.is_finite());
                assert!((0.0..=field.width()).contains(&particle.position.x));
                assert!((0.0..=field.height()).contains(&particle.position.y));
            }
        }
    }

    #[test]
    fn test_resize_regenerates_particles() {
        let mut field = ParticleField::new(ParticleConfig::default(), seeded(3));
        field.resize(1500.0, 1000.0);
        let before: Vec<_> = field.particles().iter().map(|p| p.position).collect();

        field.resize(1500.0, 1000.0);
        let after: Vec<_> = field.particles().iter().map(|p| p.position).collect();

        assert_eq!(after.len(), 100);
        assert_ne!(before, after);
    }

    #[test]
    fn test_same_seed_same_field() {
        let mut a = ParticleField::with_count(640.0, 480.0, 60, ParticleConfig::default(), seeded(9));
        let mut b = ParticleField::with_count(640.0, 480.0, 60, ParticleConfig::default(), seeded(9));

        for _ in 0..50 {
            a.set_pointer(Some(Vector2D::new(320.0, 240.0)));
            b.set_pointer(Some(Vector2D::new(320.0, 240.0)));
            a.step();
            b.step();
        }

        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_particles_stay_on_surface() {
        let config = ParticleConfig {
            max_velocity: 40.0,
            repel_force: 2.0,
            ..ParticleConfig::default()
        };
        let mut field = ParticleField::with_count(200.0, 150.0, 150, config, seeded(4));

        for frame in 0..1_000 {
            let pointer = if frame % 3 == 0 {
                None
            } else {
                Some(Vector2D::new((frame % 200) as f32, (frame % 150) as f32))
            };
            field.set_pointer(pointer);
            field.step();

            for particle in field.particles() {
                assert!((0.0..=200.0).contains(&particle.position.x), "{particle:?}");
                assert!((0.0..=150.0).contains(&particle.position.y), "{particle:?}");
            }
        }
    }

    #[test]
    fn test_speed_invariant_without_pointer() {
        let config = ParticleConfig {
            max_velocity: 12.0,
            ..ParticleConfig::default()
        };
        let mut field = ParticleField::with_count(100.0, 100.0, 80, config, seeded(5));
        let speeds: Vec<f32> = field.particles().iter().map(Particle::speed).collect();

        for _ in 0..500 {
            field.step();
        }

        for (particle, speed) in field.particles().iter().zip(speeds) {
            assert_eq!(particle.speed(), speed);
        }
    }

    #[test]
    fn test_scenario_single_step() {
        let mut field = scenario_field();

        field.step();

        let particles = field.particles();
        assert_eq!(particles[0].position, Vector2D::new(1.0, 1.0));
        assert_eq!(particles[1].position, Vector2D::new(4.0, 4.0));
        assert_eq!(particles[2].position, Vector2D::new(1000.0, 1000.0));
    }

    #[test]
    fn test_pointer_displaces_nearby_particle() {
        let mut field = ParticleField::from_particles(
            100.0,
            100.0,
            ParticleConfig::default(),
            seeded(1),
            vec![Particle::new(Vector2D::new(60.0, 50.0), Vector2D::zero())],
        );

        field.set_pointer(Some(Vector2D::new(50.0, 50.0)));
        field.step();
        assert!(field.particles()[0].position.x > 60.0);

        let x = field.particles()[0].position.x;
        field.set_pointer(None);
        field.step();
        assert_eq!(field.particles()[0].position.x, x);
    }

    #[test]
    fn test_render_draws_particles_and_connections() {
        let field = scenario_field();
        let mut surface = Recording::new();

        field.render(&mut surface).unwrap();

        assert_eq!(surface.circles(), 3);
        assert_eq!(surface.lines(), 1);
        assert_eq!(field.connections().len(), 1);
    }

    #[test]
    fn test_render_does_not_mutate_field() {
        let field = scenario_field();
        let before = field.particles().to_vec();

        field.render(&mut Recording::new()).unwrap();

        assert_eq!(field.particles(), &before[..]);
    }

    #[test]
    fn test_set_base_color_keeps_particles() {
        let mut field = scenario_field();
        let before = field.particles().to_vec();

        field.set_base_color(Rgb::new(255, 0, 0));

        assert_eq!(field.config().base_color, Rgb::new(255, 0, 0));
        assert_eq!(field.particles(), &before[..]);
    }

    #[test]
    fn test_mean_speed() {
        let field = scenario_field();
        let expected = (2.0_f32.sqrt() * 2.0) / 3.0;
        assert!((field.mean_speed() - expected).abs() < 1e-6);

        let empty = ParticleField::new(ParticleConfig::default(), seeded(1));
        assert_eq!(empty.mean_speed(), 0.0);
    }
}
