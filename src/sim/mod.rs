//! Deterministic star field core
//!
//! Everything here is pure and reproducible from a seeded `SkyRng`:
//! - No rendering or platform dependencies (drawing goes through `RenderBackend`)
//! - The grid only grows, and only on resize
//! - Stable iteration order: sector-major, pole outward, insertion order within a bucket

pub mod cell;
pub mod comet;
pub mod cull;
pub mod frame;
pub mod grid;
pub mod shimmer;
pub mod star;

pub use cell::PolarCell;
pub use comet::{Comet, CometField};
pub use cull::{OcclusionCuller, ViewBounds};
pub use frame::{FrameStats, Starfield};
pub use grid::{Bucket, Grid};
pub use shimmer::ShimmerBuffer;
pub use star::{Star, StarFactory, sphere_to_disc};
