//! Events emitted by the simulation for presentation and audio
//!
//! The session queues events while ticking; collaborators drain them once per
//! frame with `Session::drain_events`.

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityType, TankSide};
use super::spawn::PatternKind;
use super::state::{GameOverReason, SegmentDamageResult};

/// Identifier of a queued pending kill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingKillId(pub u32);

/// Where and how something blew up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    /// Logical lane
    pub lane: usize,
    /// Interpolated depth at the moment of the explosion
    pub depth: f32,
    pub color: u32,
    pub kind: EntityType,
    /// Tank half involved (struck side for partial hits, surviving side for kills)
    pub side: Option<TankSide>,
    /// Non-lethal tank hit
    pub partial: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// World entities moved; previous depths of everything on screen (ring flash)
    EnemyMove { depths: Vec<i32> },
    /// Something exploded (instant kill, finalized pending kill, partial tank hit)
    Explosion(Explosion),
    /// A bullet was stopped by a wall, double wall or shielded phase enemy
    WallDeflect { lane: usize, depth: f32, kind: EntityType },
    /// A ghost bullet should start travelling toward `target`
    GhostLaunched {
        pending: PendingKillId,
        target: EntityId,
        lane: usize,
        from_depth: f32,
    },
    /// Heart shot: full heal and repair
    HeartCollect { lane: usize, depth: f32 },
    /// Something reached the player ring
    PlayerHit { lane: usize, color: u32 },
    /// A wall reached the player on their lane
    WallHit { tier: u32, fatal: bool },
    SegmentDamage(SegmentDamageResult),
    BulletFired { lane: usize },
    PatternStarted { pattern: PatternKind },
    PatternEnded { pattern: PatternKind },
    GameOver {
        score: u64,
        reason: GameOverReason,
        new_high_score: bool,
    },
}
