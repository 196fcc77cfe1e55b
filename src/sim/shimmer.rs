//! Per-star twinkle state
//!
//! Each star's shimmer value is a leaky integrator chasing fresh noise:
//! `s -= dt·rate·(s - noise)`, clamped to [-1, 1]. Shimmer only ever dims a
//! star: the brightness modifier is `1 - 0.5·(s + 1)·amount`.

use glam::Vec2;

use crate::random::{Random, SkyRng};

/// Double-buffered shimmer values, parallel to a bucket's star list
#[derive(Debug, Clone, Default)]
pub struct ShimmerBuffer {
    front: Vec<f32>,
    back: Vec<f32>,
}

impl ShimmerBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track one more star, starting at rest
    pub fn push(&mut self) {
        self.front.push(0.0);
        self.back.push(0.0);
    }

    pub fn len(&self) -> usize {
        self.front.len()
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_empty()
    }

    /// Current shimmer values
    pub fn current(&self) -> &[f32] {
        &self.front
    }

    /// Swap front and back after a batched write
    fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

/// One leaky-integrator step
#[inline]
pub fn step(shimmer: f32, dt: f32, rate: f32, noise: f32) -> f32 {
    (shimmer - dt * rate * (shimmer - noise)).clamp(-1.0, 1.0)
}

/// Brightness multiplier in [1 - amount, 1]
#[inline]
pub fn brightness_modifier(shimmer: f32, amount: f32) -> f32 {
    1.0 - 0.5 * (shimmer + 1.0) * amount
}

/// Pseudo-random noise in [-1, 1] from a screen position and frame time
#[inline]
pub fn hash_noise(pos: Vec2, t: f32) -> f32 {
    let n = pos + Vec2::splat(fract(t));
    let h = fract(n.dot(Vec2::new(12.9898, 4.1414)).sin() * 43758.547);
    (2.0 * h - 1.0).clamp(-1.0, 1.0)
}

#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Advance the first `count` stars in place with one noise draw each
pub fn advance_per_star(
    buffer: &mut ShimmerBuffer,
    count: usize,
    dt: f32,
    rate: f32,
    noise: &Random<f32>,
    rng: &mut SkyRng,
) {
    let count = count.min(buffer.len());
    for s in &mut buffer.front[..count] {
        *s = step(*s, dt, rate, noise.generate(rng));
    }
}

/// Advance the first `count` stars from hash noise of their screen
/// positions, writing into the back buffer and swapping once done.
///
/// Stars past `count` carry their value over unchanged.
pub fn advance_hashed(
    buffer: &mut ShimmerBuffer,
    screen_positions: &[Vec2],
    dt: f32,
    rate: f32,
    t: f32,
) {
    let count = screen_positions.len().min(buffer.len());
    let ShimmerBuffer { front, back } = buffer;
    for ((out, &s), &pos) in back[..count]
        .iter_mut()
        .zip(&front[..count])
        .zip(screen_positions)
    {
        *out = step(s, dt, rate, hash_noise(pos, t));
    }
    back[count..].copy_from_slice(&front[count..]);
    buffer.swap();
}
