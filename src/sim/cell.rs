//! Polar cell geometry for grid buckets
//!
//! A cell is the half-open region r_min <= r < r_max, theta_min <= theta < theta_max
//! of the unit disc. Angles live in [0, 2π); cells never wrap.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::{polar_to_cartesian, wrap_angle};

/// A radius x angle cell in the star disc
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarCell {
    pub r_min: f32,
    pub r_max: f32,
    pub theta_min: f32,
    pub theta_max: f32,
}

impl PolarCell {
    /// Cell (radial index `i`, angular index `j`) of an equal-area partition
    /// with `radial` bands and `angular` sectors
    pub fn equal_area(i: usize, j: usize, radial: usize, angular: usize) -> Self {
        let sector = TAU / angular as f32;
        // Outer edges are pinned so the grid covers exactly [0, 1) x [0, 2π)
        let r_max = if i + 1 == radial {
            1.0
        } else {
            ((i + 1) as f32 / radial as f32).sqrt()
        };
        let theta_max = if j + 1 == angular {
            TAU
        } else {
            (j + 1) as f32 * sector
        };
        Self {
            r_min: (i as f32 / radial as f32).sqrt(),
            r_max,
            theta_min: j as f32 * sector,
            theta_max,
        }
    }

    /// Radial extent
    #[inline]
    pub fn thickness(&self) -> f32 {
        self.r_max - self.r_min
    }

    #[inline]
    pub fn angular_span(&self) -> f32 {
        self.theta_max - self.theta_min
    }

    /// Area of the annular sector
    pub fn area(&self) -> f32 {
        0.5 * self.angular_span() * (self.r_max * self.r_max - self.r_min * self.r_min)
    }

    #[inline]
    pub fn contains_radius(&self, r: f32) -> bool {
        r >= self.r_min && r < self.r_max
    }

    /// Check an angle against [theta_min, theta_max), after wrapping into [0, 2π)
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = wrap_angle(theta);
        theta >= self.theta_min && theta < self.theta_max
    }

    /// Check polar coordinates against the cell
    pub fn contains(&self, r: f32, theta: f32) -> bool {
        self.contains_radius(r) && self.contains_angle(theta)
    }

    /// Point at the middle radius and middle angle
    pub fn center(&self) -> Vec2 {
        let r = 0.5 * (self.r_min + self.r_max);
        polar_to_cartesian(r, self.theta_min + 0.5 * self.angular_span())
    }
}
