//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Game time only (no wall clock)
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod events;
pub mod input;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::PeriodicClock;
pub use collision::{CollisionResolver, PendingKill};
pub use entity::{Entity, EntityId, EntityKind, EntityType, Phase, TankSide, colors};
pub use events::{Explosion, GameEvent, PendingKillId};
pub use input::{InputAction, InputQueue};
pub use registry::EntityRegistry;
pub use spawn::{PatternKind, PatternState, SpawnEngine};
pub use state::{
    GameOverReason, GamePhase, GameState, RngState, SegmentDamageResult, WallHitResult,
};
pub use tick::Session;
