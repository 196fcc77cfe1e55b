//! Star records and the factory that synthesizes them

use glam::{Vec2, Vec3};

use crate::color::bv_to_rgb;
use crate::config::StarfieldConfig;
use crate::consts::POGSON_RATIO;
use crate::random::{self, Random, SkyRng};
use crate::{polar_to_cartesian, wrap_angle};

/// A single star in the unit sky disc.
///
/// Immutable after creation. The animated shimmer state is kept by the
/// owning bucket in a parallel buffer so batched updates can double-buffer it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Distance from the pole, in [0, 1)
    pub r: f32,
    /// Angle about the pole, in [0, 2π)
    pub theta: f32,
    /// Cartesian position in the unit disc
    pub pos: Vec2,
    /// Point radius in pixels
    pub size: f32,
    /// Linear RGB, already dimmed for sub-minimum sizes
    pub color: [f32; 3],
    /// How strongly shimmer dims this star, in [0, 1]
    pub shimmer_amount: f32,
}

/// Map a point on the unit sphere to the unit disc with the Lambert
/// azimuthal equal-area projection about the +z pole.
///
/// Returns (r, theta) with r in [0, 1] and theta in [0, 2π).
pub fn sphere_to_disc(p: Vec3) -> (f32, f32) {
    let r = ((1.0 - p.z) * 0.5).clamp(0.0, 1.0).sqrt();
    (r, wrap_angle(p.y.atan2(p.x)))
}

/// Synthesizes stars from configured random variables
#[derive(Debug, Clone)]
pub struct StarFactory {
    disc: Random<(f32, f32)>,
    in_galaxy: Random<bool>,
    galaxy_along: Random<f32>,
    galaxy_across: Random<f32>,
    galaxy_sin: f32,
    galaxy_cos: f32,
    magnitudes: Random<f32>,
    color_index: Random<f32>,
    shimmer_amount: Random<f32>,
    reference_magnitude: f32,
    min_radius: f32,
    max_radius: f32,
}

impl StarFactory {
    pub fn new(config: &StarfieldConfig) -> Self {
        Self {
            disc: random::disc_polar(1.0),
            in_galaxy: random::bernoulli(config.galaxy_proportion),
            galaxy_along: random::normal(0.0, config.galaxy_length),
            galaxy_across: random::normal(0.0, config.galaxy_spread),
            galaxy_sin: config.galaxy_angle.sin(),
            galaxy_cos: config.galaxy_angle.cos(),
            // Many faint stars, few bright ones
            magnitudes: random::exponential(1.2).map(|v| 6.0 - v),
            color_index: random::normal(0.8, 0.4),
            shimmer_amount: random::unit(),
            reference_magnitude: config.reference_magnitude,
            min_radius: config.min_star_radius,
            max_radius: config.max_star_radius,
        }
    }

    /// Draw one star. Position, magnitude, color index and shimmer amount
    /// are independent draws, in that order.
    pub fn make_star(&self, rng: &mut SkyRng) -> Star {
        let (r, theta) = if self.in_galaxy.generate(rng) {
            self.galaxy_position(rng)
        } else {
            let (r, theta) = self.disc.generate(rng);
            (r, wrap_angle(theta))
        };
        let magnitude = self.magnitudes.generate(rng);
        let color_index = self.color_index.generate(rng);
        let (size, color) = self.appearance(magnitude, color_index);

        Star {
            r,
            theta,
            pos: polar_to_cartesian(r, theta),
            size,
            color,
            shimmer_amount: self.shimmer_amount.generate(rng),
        }
    }

    /// A point near a great circle tilted by the galaxy angle
    fn galaxy_position(&self, rng: &mut SkyRng) -> (f32, f32) {
        let t = self.galaxy_along.generate(rng);
        let phi = self.galaxy_across.generate(rng);
        let xp = phi.cos() * t.cos();
        let y = phi.cos() * t.sin();
        let zp = phi.sin();
        let x = xp * self.galaxy_cos - zp * self.galaxy_sin;
        let z = xp * self.galaxy_sin + zp * self.galaxy_cos;
        sphere_to_disc(Vec3::new(x, y, z))
    }

    /// Point size and color for an apparent magnitude and B-V index.
    ///
    /// Stars too faint for the minimum size are drawn at the minimum size
    /// with their color dimmed instead.
    pub fn appearance(&self, magnitude: f32, color_index: f32) -> (f32, [f32; 3]) {
        let brightness = POGSON_RATIO
            .powf(self.reference_magnitude - magnitude)
            .min(1.0);
        let mut radius = brightness.sqrt() * self.max_radius;
        let mut factor = 1.0;
        if radius < self.min_radius {
            factor = radius / self.min_radius;
            radius = self.min_radius;
        }
        let [r, g, b] = bv_to_rgb(color_index);
        (radius, [factor * r, factor * g, factor * b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded_rng;
    use std::f32::consts::TAU;

    #[test]
    fn test_stars_land_in_unit_disc() {
        let factory = StarFactory::new(&StarfieldConfig::default());
        let mut rng = seeded_rng(42);
        for _ in 0..20_000 {
            let star = factory.make_star(&mut rng);
            assert!(star.r >= 0.0 && star.r <= 1.0);
            assert!(star.theta >= 0.0 && star.theta < TAU);
            assert!((star.pos.length() - star.r).abs() < 1e-4);
            assert!((0.0..=1.0).contains(&star.shimmer_amount));
            assert!(star.size >= 2.0 && star.size <= 5.0);
        }
    }

    #[test]
    fn test_sphere_to_disc_poles_and_equator() {
        assert_eq!(sphere_to_disc(Vec3::Z).0, 0.0);
        assert!((sphere_to_disc(-Vec3::Z).0 - 1.0).abs() < 1e-6);
        let (r, theta) = sphere_to_disc(Vec3::Y);
        assert!((r - 0.5f32.sqrt()).abs() < 1e-6);
        assert!((theta - TAU / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_without_galaxy_density_is_uniform() {
        let config = StarfieldConfig {
            galaxy_proportion: 0.0,
            ..Default::default()
        };
        let factory = StarFactory::new(&config);
        let mut rng = seeded_rng(7);
        let n = 50_000;
        let inner = (0..n).filter(|_| factory.make_star(&mut rng).r < 0.5).count();
        let frac = inner as f32 / n as f32;
        assert!((frac - 0.25).abs() < 0.015, "fraction was {}", frac);
    }

    #[test]
    fn test_untilted_galaxy_hugs_the_equator_ring() {
        let config = StarfieldConfig {
            galaxy_proportion: 0.99,
            galaxy_angle: 0.0,
            ..Default::default()
        };
        let factory = StarFactory::new(&config);
        let mut rng = seeded_rng(9);
        let n = 10_000;
        let ring = 0.5f32.sqrt();
        let near = (0..n)
            .filter(|_| (factory.make_star(&mut rng).r - ring).abs() < 0.15)
            .count();
        assert!(near as f32 / n as f32 > 0.9);
    }

    #[test]
    fn test_appearance_bright_and_faint() {
        let factory = StarFactory::new(&StarfieldConfig::default());

        let (size, color) = factory.appearance(1.0, 0.65);
        assert_eq!(size, 5.0);
        assert_eq!(color, bv_to_rgb(0.65));

        // Six magnitudes fainter than the reference: radius well under the minimum
        let (size, color) = factory.appearance(8.0, 0.65);
        assert_eq!(size, 2.0);
        let full = bv_to_rgb(0.65);
        assert!(color[0] < full[0] * 0.5);
    }

    #[test]
    fn test_factory_is_deterministic_per_seed() {
        let factory = StarFactory::new(&StarfieldConfig::default());
        let mut a = seeded_rng(5);
        let mut b = seeded_rng(5);
        for _ in 0..100 {
            assert_eq!(factory.make_star(&mut a), factory.make_star(&mut b));
        }
    }
}
