//! Shimmer Sky - a procedural, rotating, twinkling star field
//!
//! Core modules:
//! - `random`: Parametric random variables over an injectable seeded RNG
//! - `color`: HSV and B-V color index conversion
//! - `sim`: Deterministic star field core (polar bucket grid, culling, shimmer, comets)
//! - `renderer`: Backend seam and GPU-ready instance types
//! - `config`: Closed, validated tunables

pub mod color;
pub mod config;
pub mod error;
pub mod random;
pub mod renderer;
pub mod sim;

pub use config::{CometConfig, ShimmerMode, StarfieldConfig};
pub use error::ConfigError;
pub use random::{Random, SkyRng, seeded_rng};

use glam::Vec2;
use std::f32::consts::TAU;

/// Default tunables
pub mod consts {
    /// Mean on-screen spacing between stars (pixels)
    pub const STAR_DISTANCE: f32 = 20.0;
    /// Hard cap on the star population
    pub const MAX_STARS: usize = 20_000 * 100;

    /// Polar grid partition
    pub const RADIAL_BUCKETS: u32 = 16;
    pub const ANGULAR_BUCKETS: u32 = 64;

    /// Shimmer leak rate (1/s)
    pub const SHIMMER_RATE: f32 = 10.0;

    /// Pole height above the bottom edge (pixels)
    pub const HORIZON_OFFSET: f32 = 200.0;
    /// Pole x position as a fraction of the screen width
    pub const NORTH_OFFSET: f32 = 0.8;
    /// Sky rotation about the pole (radians/s)
    pub const ROTATION_RATE: f32 = 0.02;

    /// Galaxy band
    pub const GALAXY_PROPORTION: f32 = 0.3;
    pub const GALAXY_ANGLE_DEG: f32 = 63.0;
    pub const GALAXY_SPREAD: f32 = 0.1;
    pub const GALAXY_LENGTH: f32 = std::f32::consts::PI / 6.0;

    /// Star sizing (pixels) and magnitude model
    pub const MIN_STAR_RADIUS: f32 = 2.0;
    pub const MAX_STAR_RADIUS: f32 = 5.0;
    pub const REFERENCE_MAGNITUDE: f32 = 2.0;
    /// Pogson's ratio: one magnitude step in brightness
    pub const POGSON_RATIO: f32 = 2.512;

    /// Comets
    pub const COMET_RATE: f32 = 0.05;
    pub const COMET_SPEED: f32 = 2.0;
    pub const COMET_TAIL_SECONDS: f32 = 1.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta), theta in [0, 2π)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), wrap_angle(pos.y.atan2(pos.x)))
}
