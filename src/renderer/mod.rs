//! Rendering seam
//!
//! The core never draws anything itself. Each frame it hands star batches,
//! comets and optional debug lines to a `RenderBackend`; a canvas or wgpu
//! pipeline implements the trait on its side.

pub mod shapes;
pub mod vertex;

pub use vertex::{CometInstance, StarInstance, Vertex};

/// What the star field needs from whatever draws it
pub trait RenderBackend {
    /// Current output surface (width, height) in pixels
    fn surface_size(&self) -> (u32, u32);

    /// Draw one bucket's visible stars. Never called with an empty batch.
    fn draw_stars(&mut self, batch: &[StarInstance]);

    /// Draw one comet
    fn draw_comet(&mut self, comet: &CometInstance) {
        let _ = comet;
    }

    /// Draw a line list (pairs of vertices), used for debug overlays
    fn draw_lines(&mut self, vertices: &[Vertex]) {
        let _ = vertices;
    }
}

/// Backend that keeps counts instead of pixels. Used by the headless demo
/// and by tests.
#[derive(Debug, Clone, Default)]
pub struct CountingBackend {
    pub width: u32,
    pub height: u32,
    pub star_batches: usize,
    pub stars: usize,
    pub comets: usize,
    pub line_vertices: usize,
}

impl CountingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Total draw calls of any kind since the last reset
    pub fn draw_calls(&self) -> usize {
        self.star_batches + self.comets + usize::from(self.line_vertices > 0)
    }

    pub fn reset(&mut self) {
        self.star_batches = 0;
        self.stars = 0;
        self.comets = 0;
        self.line_vertices = 0;
    }
}

impl RenderBackend for CountingBackend {
    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_stars(&mut self, batch: &[StarInstance]) {
        self.star_batches += 1;
        self.stars += batch.len();
    }

    fn draw_comet(&mut self, _comet: &CometInstance) {
        self.comets += 1;
    }

    fn draw_lines(&mut self, vertices: &[Vertex]) {
        self.line_vertices += vertices.len();
    }
}
