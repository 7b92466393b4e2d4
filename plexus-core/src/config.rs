use plexus_shared::{ParticleSettings, PointerMode, Rgb};

/// Immutable configuration for a particle field
///
/// Built once, usually from [`ParticleSettings`], and handed to the field at
/// construction. A theme change swaps in a new value via
/// [`ParticleConfig::with_base_color`] rather than mutating this one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleConfig {
    pub particle_count: Option<usize>,
    pub min_particles: usize,
    pub max_particles: usize,
    pub area_per_particle: f32,
    pub max_velocity: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub particle_opacity: f32,
    pub connection_distance: f32,
    pub connection_opacity: f32,
    pub line_width: f32,
    pub repel_distance: f32,
    pub repel_force: f32,
    pub pointer_mode: PointerMode,
    pub base_color: Rgb,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self::from(&ParticleSettings::default())
    }
}

impl From<&ParticleSettings> for ParticleConfig {
    fn from(settings: &ParticleSettings) -> Self {
        Self {
            particle_count: settings.particle_count,
            min_particles: settings.min_particles,
            max_particles: settings.max_particles,
            area_per_particle: settings.area_per_particle,
            max_velocity: settings.max_velocity,
            min_radius: settings.min_radius,
            max_radius: settings.max_radius,
            particle_opacity: settings.particle_opacity,
            connection_distance: settings.connection_distance,
            connection_opacity: settings.connection_opacity,
            line_width: settings.line_width,
            repel_distance: settings.repel_distance,
            repel_force: settings.repel_force,
            pointer_mode: settings.pointer_mode,
            base_color: settings.base_color,
        }
    }
}

impl ParticleConfig {
    /// Clamp a requested particle count into `[min_particles, max_particles]`.
    ///
    /// A misconfigured range (min above max) resolves to `max_particles`.
    pub fn clamp_count(&self, count: usize) -> usize {
        count.max(self.min_particles).min(self.max_particles)
    }

    /// Unclamped particle count for a canvas of the given size.
    pub fn count_for_area(&self, width: f32, height: f32) -> usize {
        if self.area_per_particle <= 0.0 {
            return self.max_particles;
        }
        let area = width.max(0.0) * height.max(0.0);
        // Float to int casts saturate, so huge canvases cannot overflow here.
        (area / self.area_per_particle) as usize
    }

    /// Particle count used when the field is regenerated for a new size.
    pub fn target_count(&self, width: f32, height: f32) -> usize {
        let requested = self
            .particle_count
            .unwrap_or_else(|| self.count_for_area(width, height));
        self.clamp_count(requested)
    }

    pub fn with_base_color(self, base_color: Rgb) -> Self {
        Self { base_color, ..self }
    }
}
