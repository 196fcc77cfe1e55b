//! Sector occlusion culling
//!
//! The screen is an axis-aligned rectangle in the sky's polar frame (pole at
//! the origin, unit-disc units, y up). For each angular sector, rotated by the
//! current sky angle, we find the farthest radius at which the sector still
//! touches the rectangle. Buckets whose inner radius lies beyond it are
//! skipped for both update and draw.
//!
//! The farthest point of a wedge clipped to a convex rectangle is a vertex of
//! the clipped polygon: either where a bounding ray leaves the rectangle or a
//! rectangle corner inside the wedge. Checking both gives a bound that never
//! hides a visible bucket.

use glam::Vec2;

use crate::{cartesian_to_polar, wrap_angle};

use super::cell::PolarCell;

/// Slack when testing whether a corner sits inside a sector
const ANGLE_EPSILON: f32 = 1e-5;

/// Screen rectangle in the unrotated polar frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub xmin: f32,
    pub xmax: f32,
    pub ymin: f32,
    pub ymax: f32,
}

impl ViewBounds {
    pub fn new(xmin: f32, xmax: f32, ymin: f32, ymax: f32) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// A rectangle nothing can intersect
    pub fn empty() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn is_empty(&self) -> bool {
        !(self.xmax > self.xmin && self.ymax > self.ymin)
    }

    /// Radius (pixels) of the smallest pole-centred circle covering a
    /// `width` x `height` screen. `pole` is measured from the bottom-left.
    pub fn covering_radius(width: u32, height: u32, pole: Vec2) -> f32 {
        let (w, h) = (width as f32, height as f32);
        [Vec2::ZERO, Vec2::new(w, 0.0), Vec2::new(0.0, h), Vec2::new(w, h)]
            .iter()
            .map(|c| (*c - pole).length())
            .fold(0.0, f32::max)
    }

    /// Bounds of a `width` x `height` screen with the pole at `pole`
    /// (pixels from the bottom-left) and `scale` pixels per disc unit,
    /// grown by `margin_px` on every side. Zero-sized screens are empty.
    pub fn for_screen(width: u32, height: u32, pole: Vec2, scale: f32, margin_px: f32) -> Self {
        if width == 0 || height == 0 || !(scale > 0.0) {
            return Self::empty();
        }
        let (w, h) = (width as f32, height as f32);
        Self::new(
            (-pole.x - margin_px) / scale,
            (w - pole.x + margin_px) / scale,
            (-pole.y - margin_px) / scale,
            (h - pole.y + margin_px) / scale,
        )
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.xmin, self.ymin),
            Vec2::new(self.xmax, self.ymin),
            Vec2::new(self.xmax, self.ymax),
            Vec2::new(self.xmin, self.ymax),
        ]
    }

    /// Distance along a ray from the origin at which it leaves the
    /// rectangle, or None if the ray never touches it
    pub fn ray_exit(&self, dir: Vec2) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        let mut t_near = 0.0f32;
        let mut t_far = f32::INFINITY;
        for (d, lo, hi) in [(dir.x, self.xmin, self.xmax), (dir.y, self.ymin, self.ymax)] {
            if d.abs() < f32::EPSILON {
                // Parallel to this slab: inside it or never
                if lo > 0.0 || hi < 0.0 {
                    return None;
                }
            } else {
                let a = lo / d;
                let b = hi / d;
                t_near = t_near.max(a.min(b));
                t_far = t_far.min(a.max(b));
            }
        }
        (t_far >= t_near).then_some(t_far)
    }
}

/// Per-sector visible radius computation for one grid layout
#[derive(Debug, Clone)]
pub struct OcclusionCuller {
    bounds: ViewBounds,
    /// Rectangle corners as (r, theta)
    corners: [(f32, f32); 4],
    angular: usize,
    sector_width: f32,
}

impl OcclusionCuller {
    pub fn new(bounds: ViewBounds, angular_buckets: usize) -> Self {
        let angular = angular_buckets.max(1);
        let mut culler = Self {
            bounds,
            corners: [(0.0, 0.0); 4],
            angular,
            sector_width: std::f32::consts::TAU / angular as f32,
        };
        culler.set_bounds(bounds);
        culler
    }

    /// Replace the screen rectangle (on resize) and re-cache its corners
    pub fn set_bounds(&mut self, bounds: ViewBounds) {
        self.bounds = bounds;
        self.corners = bounds.corners().map(cartesian_to_polar);
    }

    pub fn bounds(&self) -> &ViewBounds {
        &self.bounds
    }

    pub fn corners_polar(&self) -> &[(f32, f32); 4] {
        &self.corners
    }

    /// Farthest radius at which sector `sector`, rotated by `rotation`,
    /// still meets the screen; None when it misses entirely
    pub fn visible_radius(&self, sector: usize, rotation: f32) -> Option<f32> {
        if self.bounds.is_empty() {
            return None;
        }
        let start = sector as f32 * self.sector_width + rotation;
        let end = start + self.sector_width;

        let ray = |angle: f32| self.bounds.ray_exit(Vec2::new(angle.cos(), angle.sin()));
        let mut best = match (ray(start), ray(end)) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        // Rays alone under-estimate when a corner pokes into the wedge
        for &(r, theta) in &self.corners {
            if wrap_angle(theta - start) <= self.sector_width + ANGLE_EPSILON {
                best = Some(best.map_or(r, |b| b.max(r)));
            }
        }
        best
    }

    /// `visible_radius` for every sector
    pub fn visible_radii(&self, rotation: f32) -> Vec<Option<f32>> {
        (0..self.angular)
            .map(|j| self.visible_radius(j, rotation))
            .collect()
    }

    /// A bucket is drawn when its inner edge is within the sector's reach
    #[inline]
    pub fn is_visible(cell: &PolarCell, radius: Option<f32>) -> bool {
        radius.is_some_and(|r| cell.r_min <= r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Grid;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI, SQRT_2};

    #[test]
    fn test_ray_exit_from_inside() {
        let b = ViewBounds::new(-1.0, 2.0, -1.0, 1.0);
        assert!((b.ray_exit(Vec2::X).unwrap() - 2.0).abs() < 1e-6);
        assert!((b.ray_exit(-Vec2::X).unwrap() - 1.0).abs() < 1e-6);
        let diag = Vec2::new(1.0, 1.0).normalize();
        assert!((b.ray_exit(diag).unwrap() - SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_ray_exit_from_outside() {
        // Rectangle entirely to the right of the origin
        let b = ViewBounds::new(1.0, 2.0, -0.5, 0.5);
        assert!((b.ray_exit(Vec2::X).unwrap() - 2.0).abs() < 1e-6);
        assert_eq!(b.ray_exit(-Vec2::X), None);
        assert_eq!(b.ray_exit(Vec2::Y), None);
    }

    #[test]
    fn test_screen_bounds_and_covering_radius() {
        let pole = Vec2::new(80.0, 20.0);
        let radius = ViewBounds::covering_radius(100, 50, pole);
        assert!((radius - Vec2::new(80.0, 30.0).length()).abs() < 1e-4);

        let b = ViewBounds::for_screen(100, 50, pole, radius, 0.0);
        for c in b.corners() {
            assert!(c.length() <= 1.0 + 1e-5);
        }
        assert!(ViewBounds::for_screen(0, 50, pole, radius, 0.0).is_empty());
        assert!(ViewBounds::for_screen(100, 0, pole, radius, 0.0).is_empty());
    }

    #[test]
    fn test_empty_bounds_hide_everything() {
        let culler = OcclusionCuller::new(ViewBounds::empty(), 16);
        assert!(culler.visible_radii(0.3).iter().all(Option::is_none));
        let inner = PolarCell::equal_area(0, 0, 4, 16);
        assert!(!OcclusionCuller::is_visible(&inner, None));
    }

    #[test]
    fn test_square_viewport_inscribed_and_circumscribed() {
        let half = 0.3;
        let culler = OcclusionCuller::new(ViewBounds::new(-half, half, -half, half), 32);
        let grid = Grid::new(20, 32).unwrap();
        let circumscribed = half * SQRT_2;

        for j in 0..32 {
            let radius = culler.visible_radius(j, 0.0);
            for bucket in grid.sector(j) {
                let visible = OcclusionCuller::is_visible(&bucket.cell, radius);
                if bucket.cell.r_min > circumscribed + 1e-5 {
                    assert!(!visible, "sector {} r_min {}", j, bucket.cell.r_min);
                }
                if bucket.cell.r_max <= half {
                    assert!(visible, "sector {} r_max {}", j, bucket.cell.r_max);
                }
            }
        }
    }

    #[test]
    fn test_corner_extends_ray_bound() {
        // One wide sector straddling the corner at 45 degrees
        let culler = OcclusionCuller::new(ViewBounds::new(-1.0, 1.0, -1.0, 1.0), 8);
        // Sector 0 spans [0, π/4]; rotate it to [π/8, 3π/8] so neither ray hits the corner
        let r = culler.visible_radius(0, PI / 8.0).unwrap();
        assert!((r - SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn test_offscreen_pole_misses_far_side() {
        // Screen entirely above the pole: sectors pointing down see nothing
        let culler = OcclusionCuller::new(ViewBounds::new(-0.5, 0.5, 0.2, 0.9), 4);
        // Sector 2 spans [π, 3π/2] at zero rotation
        assert_eq!(culler.visible_radius(2, 0.0), None);
        // Rotating by π/2 moves sector 0 onto [π/2, π], which meets the screen
        assert!(culler.visible_radius(0, FRAC_PI_2).is_some());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn prop_no_visible_point_is_culled(
            xmin in -1.0f32..0.8,
            width in 0.05f32..1.0,
            ymin in -1.0f32..0.8,
            height in 0.05f32..1.0,
            rotation in -10.0f32..10.0,
            u in 0.0f32..1.0,
            v in 0.0f32..1.0,
        ) {
            let bounds = ViewBounds::new(xmin, xmin + width, ymin, ymin + height);
            let grid = Grid::new(12, 24).unwrap();
            let culler = OcclusionCuller::new(bounds, 24);

            // A point on screen, mapped back into the unrotated disc
            let screen = Vec2::new(xmin + u * width, ymin + v * height);
            let (r, theta) = cartesian_to_polar(screen);
            prop_assume!(r < 0.999);
            let disc_theta = wrap_angle(theta - rotation);
            if let Some(k) = grid.bucket_index(r, disc_theta) {
                let sector = k / grid.radial_buckets();
                let radius = culler.visible_radius(sector, rotation);
                prop_assert!(
                    OcclusionCuller::is_visible(&grid.buckets()[k].cell, radius),
                    "point {:?} in bucket {} culled (radius {:?})", screen, k, radius
                );
            }
        }
    }
}
