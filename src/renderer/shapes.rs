//! Line geometry for the debug overlay

use glam::Vec2;

use super::vertex::Vertex;
use crate::color::hsv_to_rgb;
use crate::polar_to_cartesian;

/// Distinct tint for sector `j` of `count`
pub fn sector_color(j: usize, count: usize, alpha: f32) -> [f32; 4] {
    let [r, g, b] = hsv_to_rgb(j as f32 / count.max(1) as f32, 0.8, 1.0);
    [r, g, b, alpha]
}

/// Outline of a wedge as a line list: both bounding rays out to `radius`
/// and the arc joining them. Points are built in the sky's polar frame and
/// mapped through `to_screen`.
pub fn sector_outline(
    theta_start: f32,
    span: f32,
    radius: f32,
    color: [f32; 4],
    segments_per_radian: f32,
    to_screen: impl Fn(Vec2) -> Vec2,
) -> Vec<Vertex> {
    let num_segments = ((span * segments_per_radian) as u32).max(4);
    let mut vertices = Vec::with_capacity((num_segments as usize + 2) * 2);
    let mut line = |a: Vec2, b: Vec2| {
        let (a, b) = (to_screen(a), to_screen(b));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    };

    let start = polar_to_cartesian(radius, theta_start);
    let end = polar_to_cartesian(radius, theta_start + span);
    line(Vec2::ZERO, start);

    let mut prev = start;
    for i in 1..=num_segments {
        let t = i as f32 / num_segments as f32;
        let p = polar_to_cartesian(radius, theta_start + t * span);
        line(prev, p);
        prev = p;
    }

    line(end, Vec2::ZERO);
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_outline_is_closed_line_list() {
        let v = sector_outline(0.0, FRAC_PI_2, 2.0, [1.0; 4], 4.0, |p| p);
        // Two rays plus max(4, floor(π/2·4)) = 6 arc segments
        assert_eq!(v.len(), 2 * (6 + 2));
        assert_eq!(v[0].position, [0.0, 0.0]);
        assert_eq!(v[v.len() - 1].position, [0.0, 0.0]);
        for pair in v[2..v.len() - 2].chunks(2) {
            let p = Vec2::from(pair[1].position);
            assert!((p.length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_outline_applies_screen_transform() {
        let v = sector_outline(0.0, 0.1, 1.0, [1.0; 4], 1.0, |p| p * 10.0 + Vec2::new(5.0, 5.0));
        assert_eq!(v[0].position, [5.0, 5.0]);
        assert!((v[1].position[0] - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_sector_colors_differ() {
        assert_ne!(sector_color(0, 8, 0.5), sector_color(3, 8, 0.5));
        assert_eq!(sector_color(1, 8, 0.5)[3], 0.5);
    }
}
