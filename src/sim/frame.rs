//! Per-frame driver
//!
//! `Starfield` ties the grid, culler, shimmer and comets together. The host
//! calls `resize` when the surface changes and `render_frame` once per
//! animation frame; all drawing goes through a `RenderBackend`.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::comet::CometField;
use super::cull::{OcclusionCuller, ViewBounds};
use super::grid::Grid;
use super::shimmer::{self, brightness_modifier};
use super::star::StarFactory;
use crate::config::{ShimmerMode, StarfieldConfig};
use crate::error::ConfigError;
use crate::random::{self, Random, SkyRng};
use crate::wrap_angle;
use crate::renderer::shapes::{sector_color, sector_outline};
use crate::renderer::{CometInstance, RenderBackend, StarInstance, Vertex};

/// Arc resolution for debug outlines
const OUTLINE_SEGMENTS_PER_RADIAN: f32 = 16.0;
const OUTLINE_ALPHA: f32 = 0.6;

/// What one frame did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Sky rotation used for this frame, in [0, 2π)
    pub rotation: f32,
    /// Buckets processed (all of them in debug mode)
    pub visible_buckets: usize,
    /// Buckets skipped by culling
    pub culled_buckets: usize,
    /// Non-empty star batches submitted
    pub star_batches: usize,
    pub stars_drawn: usize,
    pub comets_drawn: usize,
    pub line_vertices: usize,
}

impl FrameStats {
    /// Backend calls issued this frame
    pub fn draw_calls(&self) -> usize {
        self.star_batches + self.comets_drawn + usize::from(self.line_vertices > 0)
    }
}

/// The whole animated sky
#[derive(Debug, Clone)]
pub struct Starfield {
    config: StarfieldConfig,
    factory: StarFactory,
    grid: Grid,
    culler: OcclusionCuller,
    comets: CometField,
    rng: SkyRng,
    shimmer_noise: Random<f32>,
    width: u32,
    height: u32,
    /// Pole position, pixels from the bottom-left
    pole: Vec2,
    /// Pixels per unit of disc radius
    scale: f32,
    // Per-bucket scratch, reused across frames
    positions: Vec<Vec2>,
    instances: Vec<StarInstance>,
}

impl Starfield {
    /// Validate `config` and build an empty sky. Nothing is visible until
    /// the first `resize`.
    pub fn new(config: StarfieldConfig, rng: SkyRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.radial_buckets, config.angular_buckets)?;
        let culler = OcclusionCuller::new(ViewBounds::empty(), grid.angular_buckets());

        log::info!(
            "Starfield: {}x{} buckets, star distance {}px, cap {}, shimmer {}",
            config.radial_buckets,
            config.angular_buckets,
            config.star_distance,
            config.max_stars,
            config.shimmer_mode.as_str()
        );

        Ok(Self {
            factory: StarFactory::new(&config),
            comets: CometField::new(&config.comets),
            grid,
            culler,
            rng,
            shimmer_noise: random::uniform(-1.0, 1.0),
            width: 0,
            height: 0,
            pole: Vec2::ZERO,
            scale: 0.0,
            positions: Vec::new(),
            instances: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn culler(&self) -> &OcclusionCuller {
        &self.culler
    }

    pub fn comets(&self) -> &CometField {
        &self.comets
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pole(&self) -> Vec2 {
        self.pole
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// True when nothing can be drawn (zero-sized surface)
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0 || !(self.scale > 0.0)
    }

    /// Star count that fills a disc of radius `scale` at the configured
    /// spacing, allowing for the share that goes to the galaxy band
    pub fn target_population(&self) -> usize {
        let d = self.config.star_distance;
        let target = PI * self.scale * self.scale / (d * d) / (1.0 - self.config.galaxy_proportion);
        if target.is_finite() {
            (target as usize).min(self.config.max_stars)
        } else {
            self.config.max_stars
        }
    }

    /// Re-fit the sky to a new surface: move the pole, rescale the disc,
    /// recompute culling bounds and grow (or thin) the population.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;

        if width == 0 || height == 0 {
            self.pole = Vec2::ZERO;
            self.scale = 0.0;
            self.culler.set_bounds(ViewBounds::empty());
            log::info!("Resize to {}x{}: nothing visible", width, height);
            return;
        }

        self.pole = Vec2::new(self.config.north_offset * width as f32, self.config.horizon_offset);
        self.scale = ViewBounds::covering_radius(width, height, self.pole);
        self.culler.set_bounds(ViewBounds::for_screen(
            width,
            height,
            self.pole,
            self.scale,
            self.config.max_star_radius,
        ));

        let target = self.target_population();
        let before = self.grid.total_stars();
        self.grid.set_used_stars(target, &self.factory, &mut self.rng);

        log::info!(
            "Resize to {}x{}: scale {:.1}px, target {} stars, grew {}, drawing {}",
            width,
            height,
            self.scale,
            target,
            self.grid.total_stars() - before,
            self.grid.used_stars()
        );
    }

    /// Resize if the backend's surface no longer matches
    pub fn sync_surface(&mut self, backend: &impl RenderBackend) {
        let (width, height) = backend.surface_size();
        if (width, height) != (self.width, self.height) {
            self.resize(width, height);
        }
    }

    /// Disc point to screen pixels (origin top-left, y down)
    #[inline]
    fn to_screen(pole: Vec2, scale: f32, height: f32, p: Vec2) -> Vec2 {
        Vec2::new(pole.x + scale * p.x, height - (pole.y + scale * p.y))
    }

    /// Advance and draw one frame.
    ///
    /// `t` is monotonic time in seconds, `dt` the time since the previous
    /// frame (0 on the first frame, which skips shimmer integration). In
    /// `debug` mode every bucket is processed and sector outlines are drawn.
    pub fn render_frame(
        &mut self,
        t: f32,
        dt: f32,
        debug: bool,
        backend: &mut impl RenderBackend,
    ) -> FrameStats {
        // Culling and drawing must share this exact angle
        let rotation = wrap_angle(t * self.config.rotation_rate);
        let mut stats = FrameStats {
            rotation,
            ..Default::default()
        };
        if self.is_degenerate() {
            return stats;
        }

        let (pole, scale, height) = (self.pole, self.scale, self.height as f32);
        let to_screen = |p: Vec2| Self::to_screen(pole, scale, height, p);
        let spin = Vec2::from_angle(rotation);
        let angular = self.grid.angular_buckets();
        let sector_width = TAU / angular as f32;
        let mut outlines: Vec<Vertex> = Vec::new();

        for j in 0..angular {
            let radius = self.culler.visible_radius(j, rotation);

            if let (true, Some(r)) = (debug, radius) {
                outlines.extend(sector_outline(
                    j as f32 * sector_width + rotation,
                    sector_width,
                    r,
                    sector_color(j, angular, OUTLINE_ALPHA),
                    OUTLINE_SEGMENTS_PER_RADIAN,
                    to_screen,
                ));
            }

            for bucket in self.grid.sector_mut(j) {
                if !debug && !OcclusionCuller::is_visible(&bucket.cell, radius) {
                    stats.culled_buckets += 1;
                    continue;
                }
                stats.visible_buckets += 1;

                let (stars, buffer) = bucket.split_for_update();
                if stars.is_empty() {
                    continue;
                }

                self.positions.clear();
                self.positions
                    .extend(stars.iter().map(|s| to_screen(spin.rotate(s.pos))));

                if dt > 0.0 {
                    match self.config.shimmer_mode {
                        ShimmerMode::PerStar => shimmer::advance_per_star(
                            buffer,
                            stars.len(),
                            dt,
                            self.config.shimmer_rate,
                            &self.shimmer_noise,
                            &mut self.rng,
                        ),
                        ShimmerMode::Hashed => shimmer::advance_hashed(
                            buffer,
                            &self.positions,
                            dt,
                            self.config.shimmer_rate,
                            t,
                        ),
                    }
                }

                self.instances.clear();
                self.instances.extend(
                    stars
                        .iter()
                        .zip(&self.positions)
                        .zip(buffer.current())
                        .map(|((star, pos), &s)| StarInstance {
                            position: pos.to_array(),
                            size: star.size,
                            alpha: brightness_modifier(s, star.shimmer_amount),
                            color: star.color,
                        }),
                );
                backend.draw_stars(&self.instances);
                stats.star_batches += 1;
                stats.stars_drawn += self.instances.len();
            }
        }

        if !outlines.is_empty() {
            stats.line_vertices = outlines.len();
            backend.draw_lines(&outlines);
        }

        stats.comets_drawn = self.draw_comets(dt, backend);
        stats
    }

    /// Spawn arrivals, drop stragglers, draw, then move every comet
    fn draw_comets(&mut self, dt: f32, backend: &mut impl RenderBackend) -> usize {
        let (width, height) = (self.width, self.height);
        self.comets.spawn_arrivals(dt, width, height, &mut self.rng);
        self.comets.retain_on_screen(width, height);

        for comet in self.comets.comets() {
            backend.draw_comet(&CometInstance {
                head: comet.pos.to_array(),
                direction: comet.direction().to_array(),
                radius: comet.radius,
                tail_length: comet.tail_length,
                color: self.comets.color,
                tail_color: self.comets.tail_color,
            });
        }
        let drawn = self.comets.comets().len();
        self.comets.advance(dt);
        drawn
    }
}
