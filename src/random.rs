//! Parametric random variables
//!
//! A `Random<T>` is an immutable sampler. All entropy comes from the
//! `SkyRng` handle passed to `generate`, so a seeded generator reproduces
//! the exact same sky. Samplers compose with `map`, `zip` and `traverse`.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// The entropy source threaded through every sampler
pub type SkyRng = Pcg32;

/// Create a deterministic generator from a seed
pub fn seeded_rng(seed: u64) -> SkyRng {
    Pcg32::seed_from_u64(seed)
}

/// A reusable sampler producing values of type `T`
pub struct Random<T> {
    sampler: Arc<dyn Fn(&mut SkyRng) -> T + Send + Sync>,
}

impl<T> Clone for Random<T> {
    fn clone(&self) -> Self {
        Self {
            sampler: Arc::clone(&self.sampler),
        }
    }
}

impl<T> std::fmt::Debug for Random<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Random<")?;
        f.write_str(std::any::type_name::<T>())?;
        f.write_str(">")
    }
}

impl<T: 'static> Random<T> {
    pub fn new(sampler: impl Fn(&mut SkyRng) -> T + Send + Sync + 'static) -> Self {
        Self {
            sampler: Arc::new(sampler),
        }
    }

    /// Draw one sample. Only the generator advances.
    #[inline]
    pub fn generate(&self, rng: &mut SkyRng) -> T {
        (self.sampler)(rng)
    }

    /// Sampler equal to `f(self.generate())`
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Random<U> {
        Random::new(move |rng| f(self.generate(rng)))
    }

    /// Sample `self` then `other`, independently
    pub fn zip<U: 'static>(self, other: Random<U>) -> Random<(T, U)> {
        Random::new(move |rng| {
            let a = self.generate(rng);
            let b = other.generate(rng);
            (a, b)
        })
    }

    /// One independent draw per input sampler, in input order
    pub fn traverse(samplers: Vec<Random<T>>) -> Random<Vec<T>> {
        Random::new(move |rng| samplers.iter().map(|s| s.generate(rng)).collect())
    }
}

/// Always yields `value`; consumes no entropy
pub fn constant<T: Clone + Send + Sync + 'static>(value: T) -> Random<T> {
    Random::new(move |_| value.clone())
}

/// U ~ Uniform[0, 1)
pub fn unit() -> Random<f32> {
    Random::new(|rng| rng.random::<f32>())
}

/// `a + U·(b - a)`
pub fn uniform(a: f32, b: f32) -> Random<f32> {
    let size = b - a;
    Random::new(move |rng| rng.random::<f32>() * size + a)
}

/// True with probability `p`
pub fn bernoulli(p: f32) -> Random<bool> {
    Random::new(move |rng| rng.random::<f32>() < p)
}

/// Two independent normal samples per draw (Box-Muller)
pub fn normal_pairs(mean: f32, stddev: f32) -> Random<(f32, f32)> {
    Random::new(move |rng| {
        let u1 = rng.random::<f32>();
        let u2 = rng.random::<f32>();
        box_muller(u1, u2, mean, stddev)
    })
}

/// First value of `normal_pairs`; the second is discarded so seeded
/// sequences match the pair sampler draw for draw
pub fn normal(mean: f32, stddev: f32) -> Random<f32> {
    normal_pairs(mean, stddev).map(|(x, _)| x)
}

/// `-β·ln U`; β is the expectation value
pub fn exponential(beta: f32) -> Random<f32> {
    Random::new(move |rng| -beta * guarded_ln(rng.random::<f32>()))
}

/// Event count for rate `lambda` (Knuth's multiplicative method)
pub fn poisson(lambda: f32) -> Random<u32> {
    Random::new(move |rng| sample_poisson(rng, lambda))
}

/// Uniform-area point in a disc, as (r, theta)
pub fn disc_polar(radius: f32) -> Random<(f32, f32)> {
    Random::new(move |rng| {
        let r = rng.random::<f32>().sqrt() * radius;
        let theta = TAU * rng.random::<f32>();
        (r, theta)
    })
}

/// Uniform-area point in a disc, cartesian
pub fn disc(radius: f32) -> Random<Vec2> {
    disc_polar(radius).map(|(r, theta)| crate::polar_to_cartesian(r, theta))
}

/// Uniform point on the unit sphere, as (longitude theta, latitude phi)
pub fn sphere_polar() -> Random<(f32, f32)> {
    Random::new(|rng| {
        let theta = TAU * rng.random::<f32>();
        let phi = (1.0 - 2.0 * rng.random::<f32>()).asin();
        (theta, phi)
    })
}

/// Uniform point on a sphere, cartesian
pub fn sphere(radius: f32) -> Random<Vec3> {
    sphere_polar().map(move |(theta, phi)| {
        let c = phi.cos();
        Vec3::new(c * theta.cos(), c * theta.sin(), phi.sin()) * radius
    })
}

/// Knuth's algorithm; `lambda <= 0` (or NaN) always yields 0
pub fn sample_poisson(rng: &mut SkyRng, lambda: f32) -> u32 {
    let lambda = if lambda > 0.0 { lambda as f64 } else { 0.0 };
    let limit = (-lambda).exp();
    let mut k = 0u32;
    let mut p = 1.0f64;
    loop {
        k += 1;
        p *= rng.random::<f64>();
        if p <= limit {
            break;
        }
    }
    k - 1
}

/// Box-Muller transform of two uniforms into two normals
#[inline]
pub fn box_muller(u1: f32, u2: f32, mean: f32, stddev: f32) -> (f32, f32) {
    let r = (-2.0 * guarded_ln(u1)).sqrt();
    let t = TAU * u2;
    (r * t.cos() * stddev + mean, r * t.sin() * stddev + mean)
}

/// `ln u` that stays finite when the source emits exactly 0
#[inline]
fn guarded_ln(u: f32) -> f32 {
    u.max(f32::MIN_POSITIVE).ln()
}
