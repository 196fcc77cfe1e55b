//! Comets streaking across the screen
//!
//! Arrivals are a Poisson process. Comets live in screen pixels (origin
//! top-left, y down) and ignore the sky rotation.

use glam::Vec2;

use crate::config::CometConfig;
use crate::random::{self, Random, SkyRng};

/// One comet in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Comet {
    /// Head position (pixels)
    pub pos: Vec2,
    /// Velocity (pixels/s)
    pub vel: Vec2,
    /// Head radius (pixels)
    pub radius: f32,
    /// Tail length (pixels)
    pub tail_length: f32,
}

impl Comet {
    /// Unit heading
    pub fn direction(&self) -> Vec2 {
        self.vel.normalize_or_zero()
    }
}

/// Spawner and owner of every live comet
#[derive(Debug, Clone)]
pub struct CometField {
    rate: f32,
    speed: f32,
    tail_seconds: f32,
    pub color: [f32; 3],
    pub tail_color: [f32; 3],
    heading: Random<f32>,
    radius: Random<f32>,
    start: Random<(f32, f32)>,
    comets: Vec<Comet>,
}

impl CometField {
    pub fn new(config: &CometConfig) -> Self {
        use std::f32::consts::PI;
        Self {
            rate: config.rate,
            speed: config.speed,
            tail_seconds: config.tail_seconds,
            color: config.color,
            tail_color: config.tail_color,
            heading: random::uniform(PI / 8.0, 3.0 * PI / 8.0),
            radius: random::exponential(2.0).map(|v| (v + 2.0) / 1500.0),
            // Roughly gaussian density of paths along the screen diagonal
            start: random::normal_pairs(0.5, 0.3),
            comets: Vec::new(),
        }
    }

    pub fn comets(&self) -> &[Comet] {
        &self.comets
    }

    /// Draw this frame's arrivals; returns how many were spawned
    pub fn spawn_arrivals(&mut self, dt: f32, width: u32, height: u32, rng: &mut SkyRng) -> u32 {
        let count = random::sample_poisson(rng, self.rate * dt);
        for _ in 0..count {
            if let Some(comet) = self.spawn(width, height, rng) {
                self.comets.push(comet);
            }
        }
        count
    }

    /// Build one comet entering from the left or top edge.
    /// Returns None when comets cannot move (zero speed or empty screen).
    pub fn spawn(&self, width: u32, height: u32, rng: &mut SkyRng) -> Option<Comet> {
        let (w, h) = (width as f32, height as f32);
        let diagonal = (w * w + h * h).sqrt();
        let v = self.speed * diagonal;
        if !(v > 0.0) {
            return None;
        }

        let heading = self.heading.generate(rng);
        let radius = self.radius.generate(rng) * diagonal;
        let vel = Vec2::new(heading.cos(), heading.sin()) * v;

        let (su, sv) = self.start.generate(rng);
        let sx = w * su;
        let mut sy = h * sv;
        if vel.x > 0.0 {
            sy = h - sy;
        }
        // Walk the start point back along the path to the screen edge
        let tx = if vel.x < 0.0 {
            -(w - sx) / vel.x
        } else {
            sx / vel.x
        };
        let ty = sy / vel.y;
        let back = tx.min(ty);

        Some(Comet {
            pos: Vec2::new(sx, sy) - back * vel,
            vel,
            radius,
            tail_length: v * self.tail_seconds,
        })
    }

    /// Drop comets that have left the screen by more than a tail's length
    pub fn retain_on_screen(&mut self, width: u32, height: u32) {
        let (w, h) = (width as f32, height as f32);
        let margin = self.speed * self.tail_seconds * (w * w + h * h).sqrt();
        self.comets.retain(|c| {
            c.pos.x >= -margin && c.pos.x <= w + margin && c.pos.y >= -margin && c.pos.y <= h + margin
        });
    }

    /// Move every comet along its path
    pub fn advance(&mut self, dt: f32) {
        for comet in &mut self.comets {
            comet.pos += dt * comet.vel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded_rng;

    fn field(rate: f32) -> CometField {
        CometField::new(&CometConfig {
            rate,
            ..Default::default()
        })
    }

    #[test]
    fn test_zero_rate_or_zero_dt_spawns_nothing() {
        let mut rng = seeded_rng(1);
        let mut quiet = field(0.0);
        let mut busy = field(50.0);
        for _ in 0..1000 {
            assert_eq!(quiet.spawn_arrivals(1.0 / 60.0, 800, 600, &mut rng), 0);
            assert_eq!(busy.spawn_arrivals(0.0, 800, 600, &mut rng), 0);
        }
        assert!(quiet.comets().is_empty());
        assert!(busy.comets().is_empty());
    }

    #[test]
    fn test_arrival_rate_matches_poisson_mean() {
        let mut rng = seeded_rng(2);
        let mut f = field(3.0);
        let mut total = 0u32;
        for _ in 0..6000 {
            total += f.spawn_arrivals(1.0 / 60.0, 800, 600, &mut rng);
            f.comets.clear();
        }
        // 100 seconds at 3 per second
        assert!((total as f32 - 300.0).abs() < 60.0, "spawned {}", total);
    }

    #[test]
    fn test_spawn_enters_from_left_or_top_edge() {
        let mut rng = seeded_rng(3);
        let f = field(1.0);
        for _ in 0..500 {
            let c = f.spawn(800, 600, &mut rng).unwrap();
            assert!(c.vel.x > 0.0 && c.vel.y > 0.0);
            assert!(c.pos.x.abs() < 1e-2 || c.pos.y.abs() < 1e-2, "start {:?}", c.pos);
            assert!(c.radius > 0.0);
            let diagonal = 1000.0;
            assert!((c.tail_length - 2.0 * diagonal).abs() < 1e-2);
        }
    }

    #[test]
    fn test_zero_speed_never_spawns() {
        let mut rng = seeded_rng(4);
        let f = CometField::new(&CometConfig {
            speed: 0.0,
            ..Default::default()
        });
        assert!(f.spawn(800, 600, &mut rng).is_none());
        assert!(f.spawn(0, 0, &mut rng).is_none());
    }

    #[test]
    fn test_advance_then_retain() {
        let mut rng = seeded_rng(5);
        let mut f = field(1.0);
        let comet = f.spawn(800, 600, &mut rng).unwrap();
        f.comets.push(comet.clone());

        f.advance(0.1);
        assert!((f.comets()[0].pos - (comet.pos + 0.1 * comet.vel)).length() < 1e-3);

        // Two screens a second with a one second tail: gone after a few seconds
        for _ in 0..5 {
            f.advance(1.0);
        }
        f.retain_on_screen(800, 600);
        assert!(f.comets().is_empty());
    }
}
