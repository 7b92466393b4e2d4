#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::format;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// An opaque RGB color, the base color every particle and connection is drawn in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha channel. Alpha is clamped to `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        let a = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Parse a CSS `rgb(r, g, b)` or `rgba(r, g, b, a)` value.
    ///
    /// This is the format a theme exposes its particle color in through a CSS
    /// custom property. The alpha component is validated but discarded, since
    /// particle and line opacity come from the simulation.
    pub fn from_css(input: &str) -> Result<Self, ColorParseError> {
        let value = input.trim();
        let body = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(ColorParseError::UnknownFormat)?;

        let mut parts = body.split(',').map(str::trim);
        let r = parse_channel(parts.next())?;
        let g = parse_channel(parts.next())?;
        let b = parse_channel(parts.next())?;

        if let Some(alpha) = parts.next() {
            alpha
                .parse::<f32>()
                .map_err(|_| ColorParseError::InvalidAlpha)?;
        }

        if parts.next().is_some() {
            return Err(ColorParseError::TrailingComponents);
        }

        Ok(Self { r, g, b })
    }
}

fn parse_channel(part: Option<&str>) -> Result<u8, ColorParseError> {
    let part = part.ok_or(ColorParseError::MissingComponent)?;
    part.parse::<u8>()
        .map_err(|_| ColorParseError::InvalidChannel)
}

impl Default for Rgb {
    fn default() -> Self {
        Self::new(150, 150, 150)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_css(s)
    }
}

/// An RGB color with an alpha channel in `0.0..=1.0`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// Format as a CSS color usable by canvas `fillStyle`/`strokeStyle` and SVG.
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Reasons a CSS color string could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorParseError {
    /// Not of the form `rgb(...)` or `rgba(...)`
    UnknownFormat,
    /// Fewer than three color channels
    MissingComponent,
    /// A channel is not an integer in `0..=255`
    InvalidChannel,
    /// The alpha component is not a number
    InvalidAlpha,
    /// More than four components
    TrailingComponents,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::UnknownFormat => "expected rgb(r, g, b) or rgba(r, g, b, a)",
            Self::MissingComponent => "missing color channel",
            Self::InvalidChannel => "color channel must be an integer between 0 and 255",
            Self::InvalidAlpha => "alpha must be a number",
            Self::TrailingComponents => "too many color components",
        };
        f.write_str(message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ColorParseError {}

/// How particles react to a nearby pointer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PointerMode {
    #[default]
    Repel,
    Attract,
}

/// Particle background configuration, as read from JSON
///
/// Keys are camelCase and every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleSettings {
    /// Fixed particle count; derived from the canvas area when absent
    pub particle_count: Option<usize>,
    pub min_particles: usize,
    pub max_particles: usize,
    /// Canvas area (px²) allotted to each particle when deriving the count
    pub area_per_particle: f32,
    /// Spread of each initial velocity component, centred on zero
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

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            particle_count: None,
            min_particles: 30,
            max_particles: 150,
            area_per_particle: 15_000.0,
            max_velocity: 0.5,
            min_radius: 1.0,
            max_radius: 3.0,
            particle_opacity: 0.8,
            connection_distance: 120.0,
            connection_opacity: 1.0,
            line_width: 0.5,
            repel_distance: 100.0,
            repel_force: 0.05,
            pointer_mode: PointerMode::Repel,
            base_color: Rgb::default(),
        }
    }
}

#[cfg(feature = "std")]
impl ParticleSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Per-frame statistics reported by the headless previewer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameSummary {
    pub frame: u64,
    pub particles: usize,
    pub connections: usize,
    pub mean_speed: f32,
}
