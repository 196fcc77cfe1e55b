//! Polar bucket grid: the spatial index owning every star
//!
//! The unit disc is split into `radial` equal-area bands and `angular`
//! equal-angle sectors. Buckets are stored sector-major so one sector's
//! bands form a contiguous slice, ordered from the pole outward.
//!
//! The population only grows. Thinning is done by a global "used"
//! fraction: each bucket draws the first `round(len·fraction)` of its
//! stars, in insertion order.

use crate::error::ConfigError;
use crate::random::SkyRng;

use super::cell::PolarCell;
use super::shimmer::ShimmerBuffer;
use super::star::{Star, StarFactory};

/// One grid cell and the stars inside it
#[derive(Debug, Clone)]
pub struct Bucket {
    pub cell: PolarCell,
    stars: Vec<Star>,
    shimmer: ShimmerBuffer,
    used: usize,
}

impl Bucket {
    fn new(cell: PolarCell) -> Self {
        Self {
            cell,
            stars: Vec::new(),
            shimmer: ShimmerBuffer::new(),
            used: 0,
        }
    }

    /// Every star, in insertion order
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// The stars currently drawn: a prefix of `stars()`
    pub fn used_stars(&self) -> &[Star] {
        &self.stars[..self.used]
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Shimmer state parallel to `stars()`
    pub fn shimmer(&self) -> &[f32] {
        self.shimmer.current()
    }

    /// Used stars alongside mutable shimmer state, for the frame update
    pub(crate) fn split_for_update(&mut self) -> (&[Star], &mut ShimmerBuffer) {
        (&self.stars[..self.used], &mut self.shimmer)
    }

    fn push(&mut self, star: Star) {
        self.stars.push(star);
        self.shimmer.push();
    }

    fn apply_fraction(&mut self, fraction: f32) -> usize {
        self.used = ((self.stars.len() as f32 * fraction).round() as usize).min(self.stars.len());
        self.used
    }
}

/// The polar spatial index
#[derive(Debug, Clone)]
pub struct Grid {
    radial: usize,
    angular: usize,
    buckets: Vec<Bucket>,
    total: usize,
    used: usize,
    used_fraction: f32,
}

impl Grid {
    /// Build an empty grid; both counts must be positive
    pub fn new(radial: u32, angular: u32) -> Result<Self, ConfigError> {
        if radial == 0 {
            return Err(ConfigError::ZeroBuckets { axis: "radial" });
        }
        if angular == 0 {
            return Err(ConfigError::ZeroBuckets { axis: "angular" });
        }
        let (radial, angular) = (radial as usize, angular as usize);

        let mut buckets = Vec::with_capacity(radial * angular);
        for j in 0..angular {
            for i in 0..radial {
                buckets.push(Bucket::new(PolarCell::equal_area(i, j, radial, angular)));
            }
        }

        log::debug!("Grid created: {} radial x {} angular buckets", radial, angular);

        Ok(Self {
            radial,
            angular,
            buckets,
            total: 0,
            used: 0,
            used_fraction: 1.0,
        })
    }

    pub fn radial_buckets(&self) -> usize {
        self.radial
    }

    pub fn angular_buckets(&self) -> usize {
        self.angular
    }

    pub fn total_stars(&self) -> usize {
        self.total
    }

    pub fn used_stars(&self) -> usize {
        self.used
    }

    pub fn used_fraction(&self) -> f32 {
        self.used_fraction
    }

    /// All buckets, sector-major
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// The bands of sector `j`, innermost first
    ///
    /// # Panics
    ///
    /// Panics if `j >= angular_buckets()`.
    pub fn sector(&self, j: usize) -> &[Bucket] {
        &self.buckets[j * self.radial..(j + 1) * self.radial]
    }

    pub(crate) fn sector_mut(&mut self, j: usize) -> &mut [Bucket] {
        &mut self.buckets[j * self.radial..(j + 1) * self.radial]
    }

    /// Index of the bucket holding (r, theta), or None when the point lies
    /// outside [0, 1) x [0, 2π)
    pub fn bucket_index(&self, r: f32, theta: f32) -> Option<usize> {
        let i = band_index(r * r * self.radial as f32, self.radial, |i| {
            self.buckets[i].cell.contains_radius(r)
        })?;
        let sector = std::f32::consts::TAU / self.angular as f32;
        let j = band_index(theta / sector, self.angular, |j| {
            let cell = &self.buckets[j * self.radial].cell;
            theta >= cell.theta_min && theta < cell.theta_max
        })?;
        Some(j * self.radial + i)
    }

    pub fn lookup_bucket(&self, r: f32, theta: f32) -> Option<&Bucket> {
        self.bucket_index(r, theta).map(|k| &self.buckets[k])
    }

    /// Place a star; returns false (and stores nothing) when it falls
    /// outside every bucket
    pub fn insert(&mut self, star: Star) -> bool {
        match self.bucket_index(star.r, star.theta) {
            Some(k) => {
                self.buckets[k].push(star);
                self.total += 1;
                true
            }
            None => false,
        }
    }

    /// Append fresh stars until the population reaches `target`.
    ///
    /// Existing stars are untouched; a target at or below the current
    /// total is a no-op. Returns the number of stars added.
    pub fn grow_to(&mut self, target: usize, factory: &StarFactory, rng: &mut SkyRng) -> usize {
        let start = self.total;
        let mut retries = 0usize;
        while self.total < target {
            if !self.insert(factory.make_star(rng)) {
                retries += 1;
            }
        }
        let added = self.total - start;
        if added > 0 {
            if retries > 0 {
                log::debug!("Resampled {} stars that fell outside the grid", retries);
            }
            self.set_used_fraction(self.used_fraction);
        }
        added
    }

    /// Recompute every bucket's used count as round(len·fraction).
    /// Contents are never reordered.
    pub fn set_used_fraction(&mut self, fraction: f32) {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        self.used_fraction = fraction;
        self.used = self
            .buckets
            .iter_mut()
            .map(|b| b.apply_fraction(fraction))
            .sum();
    }

    /// Grow to at least `count` stars, then draw roughly `count` of them
    pub fn set_used_stars(&mut self, count: usize, factory: &StarFactory, rng: &mut SkyRng) {
        self.grow_to(count, factory, rng);
        let fraction = if self.total == 0 {
            0.0
        } else {
            count as f32 / self.total as f32
        };
        self.set_used_fraction(fraction);
    }
}

/// Locate the band for a scaled coordinate, nudging one step either way
/// when rounding puts the estimate off by one
fn band_index(scaled: f32, count: usize, contains: impl Fn(usize) -> bool) -> Option<usize> {
    if !(scaled >= 0.0) || scaled >= count as f32 + 1.0 {
        return None;
    }
    let guess = (scaled.floor() as usize).min(count - 1);
    [Some(guess), guess.checked_sub(1), Some(guess + 1)]
        .into_iter()
        .flatten()
        .filter(|&k| k < count)
        .find(|&k| contains(k))
}
