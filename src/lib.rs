//! Arcade Classics - twenty-one small arcade and 3D demo games
//!
//! Core modules:
//! - `sim`: Deterministic shared algorithms (AABB resolution, tile maps, sphere bodies)
//! - `games`: One module per game behind the `Game` trait
//! - `renderer`: Immediate-mode draw list, tessellation and the WebGPU pipeline
//! - `platform`: Input state and fixed-timestep frame timing
//! - `settings`: Runtime configuration

pub mod error;
pub mod games;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{ArcadeError, Result};
pub use games::{Game, GameId};
pub use settings::Settings;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Loop configuration constants
pub mod consts {
    /// Fixed simulation timestep (every game targets 60 FPS)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (tab switches, breakpoints)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Deterministic RNG for a game run
#[inline]
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Wrap a coordinate that left `[0, max]` onto the opposite edge
#[inline]
pub fn wrap_coord(v: f32, max: f32) -> f32 {
    if v > max {
        0.0
    } else if v < 0.0 {
        max
    } else {
        v
    }
}

/// Toroidal wrap of a point inside a `size` sized screen
#[inline]
pub fn wrap_position(p: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(wrap_coord(p.x, size.x), wrap_coord(p.y, size.y))
}

/// Step `current` toward `target` by at most `max_delta`
#[inline]
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(diff)
    }
}
