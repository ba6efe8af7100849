//! Hexax - simulation core of a hexagonal tunnel shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, dual-clock scheduler)
//! - `config`: Data-driven tuning (geometry, damage, scoring, difficulty curves)
//! - `highscores`: Best-score value and its storage seam
//! - `error`: I/O and validation errors at the crate edges
//!
//! Rendering, audio and input polling live outside this crate. They read the
//! `sim::Session` query surface and drain its `GameEvent` queue.

pub mod config;
pub mod error;
pub mod highscores;
pub mod sim;

pub use config::{CurveProfile, TunnelConfig};
pub use error::{ConfigError, StoreError};
pub use highscores::{HighScore, HighScoreStore, JsonFileStore, MemoryStore};
pub use sim::{GameEvent, Session};

/// Default tunnel constants (mirrored by `TunnelConfig::default()`)
pub mod consts {
    /// Angular lanes around the hexagonal tunnel
    pub const NUM_LANES: usize = 6;
    /// Spawn ring depth (player ring is depth 0)
    pub const MAX_DEPTH: f32 = 6.0;
    /// Depth at which phase enemies drop their shield
    pub const PHASE_DEPTH: f32 = 2.0;
    /// Depth a freshly fired bullet starts at
    pub const BULLET_SPAWN_DEPTH: f32 = 0.2;

    /// Initial world clock period (ms)
    pub const TICK_MS: f32 = 800.0;
    /// Bullet clock period (ms), fixed for the whole session
    pub const BULLET_TICK_MS: f32 = 200.0;
    /// Fire cooldown, measured in bullet ticks
    pub const FIRE_COOLDOWN_BULLET_TICKS: f32 = 1.5;
    /// Duration of one rotation animation (ms)
    pub const ROTATION_DURATION_MS: f32 = 150.0;
    /// Travel time of a ghost bullet to its pending-kill target (ms)
    pub const GHOST_TRAVEL_MS: f32 = 180.0;
    /// Maximum queued input actions
    pub const INPUT_QUEUE_CAP: usize = 4;

    /// Full health
    pub const MAX_HEALTH: f32 = 100.0;
    /// Damaged segments at which the tunnel is reported critical
    pub const CRITICAL_SEGMENTS: usize = 4;
}

/// Wrap a (possibly negative) lane index into `[0, num_lanes)`
#[inline]
pub fn wrap_lane(lane: i64, num_lanes: usize) -> usize {
    let n = num_lanes.max(1) as i64;
    lane.rem_euclid(n) as usize
}

/// Integer depth cell used for collision matching
#[inline]
pub fn depth_cell(depth: f32) -> i32 {
    depth.floor() as i32
}

/// Linear interpolation between a previous and current depth
#[inline]
pub fn lerp_depth(prev: f32, current: f32, progress: f32) -> f32 {
    prev + (current - prev) * progress.clamp(0.0, 1.0)
}
