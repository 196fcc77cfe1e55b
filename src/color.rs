//! Color conversion helpers
//!
//! Both functions return linear RGB triples in [0, 1].

/// Convert hue/saturation/value to RGB.
///
/// `h` is in turns, so [0, 1) covers the whole wheel; values outside wrap.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let scaled = h * 6.0;
    let i = scaled.floor();
    let f = scaled - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match (i as i32).rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// Approximate the RGB color of a star from its B-V color index.
///
/// Piecewise polynomial fit, one independent curve per channel. The index
/// is clamped to [-0.4, 2.0]. Each range is a half-open `lo <= bv < hi`
/// test; channels with no matching range stay at 0 (blue above 1.94, and
/// green at the clamped upper end bv = 2.0).
pub fn bv_to_rgb(bv: f32) -> [f32; 3] {
    let bv = bv.clamp(-0.4, 2.0);
    let within = |lo: f32, hi: f32| lo <= bv && bv < hi;

    let r = if within(-0.40, 0.00) {
        let t = (bv + 0.40) / 0.40;
        0.61 + 0.11 * t + 0.1 * t * t
    } else if within(0.00, 0.40) {
        let t = bv / 0.40;
        0.83 + 0.17 * t
    } else if within(0.40, 2.10) {
        1.0
    } else {
        0.0
    };

    let g = if within(-0.40, 0.00) {
        let t = (bv + 0.40) / 0.40;
        0.70 + 0.07 * t + 0.1 * t * t
    } else if within(0.00, 0.40) {
        let t = bv / 0.40;
        0.87 + 0.11 * t
    } else if within(0.40, 1.60) {
        let t = (bv - 0.40) / (1.60 - 0.40);
        0.98 - 0.16 * t
    } else if within(1.60, 2.00) {
        let t = (bv - 1.60) / (2.00 - 1.60);
        0.82 - 0.5 * t * t
    } else {
        0.0
    };

    let b = if within(-0.40, 0.40) {
        1.0
    } else if within(0.40, 1.50) {
        let t = (bv - 0.40) / (1.50 - 0.40);
        1.00 - 0.47 * t + 0.1 * t * t
    } else if within(1.50, 1.94) {
        let t = (bv - 1.50) / (1.94 - 1.50);
        0.63 - 0.6 * t * t
    } else {
        0.0
    };

    [r, g, b]
}
