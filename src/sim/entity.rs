//! Tunnel entities
//!
//! Every movable object is an `Entity`: a shared base record (lane, depth,
//! liveness flags) plus an `EntityKind` payload for the per-type state. Depth
//! runs from 0 (player ring) to `max_depth` (spawn ring).

use serde::{Deserialize, Serialize};

use crate::config::TunnelConfig;
use crate::{lerp_depth, wrap_lane};

/// Stable entity identifier (allocated by the registry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Type tag, used for spawn tables and event metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Enemy,
    Tank,
    Phase,
    Spiral,
    Bomb,
    Heart,
    Wall,
    DoubleWall,
    Bullet,
}

impl EntityType {
    /// Lives in the registry's enemy collection
    pub fn is_enemy_class(&self) -> bool {
        matches!(
            self,
            EntityType::Enemy
                | EntityType::Tank
                | EntityType::Phase
                | EntityType::Spiral
                | EntityType::Bomb
                | EntityType::Heart
        )
    }

    /// Single or double wall
    pub fn is_wall(&self) -> bool {
        matches!(self, EntityType::Wall | EntityType::DoubleWall)
    }

    /// Explosion color for this type
    pub fn color(&self) -> u32 {
        match self {
            EntityType::Enemy => colors::ENEMY,
            EntityType::Tank => colors::TANK,
            EntityType::Phase => colors::PHASE,
            EntityType::Spiral => colors::SPIRAL,
            EntityType::Bomb => colors::BOMB,
            EntityType::Heart => colors::HEART,
            EntityType::Wall | EntityType::DoubleWall => colors::WALL,
            EntityType::Bullet => colors::BULLET,
        }
    }
}

/// Explosion / flash colors handed to presentation (0xRRGGBB)
pub mod colors {
    pub const TUNNEL: u32 = 0x7cffb2;
    pub const ENEMY: u32 = 0xff6644;
    pub const BULLET: u32 = 0xaaffdd;
    pub const WALL: u32 = 0xffcc44;
    pub const TANK: u32 = 0x4488ff;
    pub const TANK_DAMAGED: u32 = 0x88bbff;
    pub const BOMB: u32 = 0xffdd44;
    pub const HEART: u32 = 0xff4488;
    pub const PHASE: u32 = 0xcc66ff;
    pub const SPIRAL: u32 = 0x44ffdd;
}

/// Which half of a tank absorbed a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankSide {
    Left,
    Right,
}

impl TankSide {
    pub fn opposite(self) -> Self {
        match self {
            TankSide::Left => TankSide::Right,
            TankSide::Right => TankSide::Left,
        }
    }
}

/// Phase enemy shield state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Deflects bullets like a wall
    Shielded,
    /// Killable
    Vulnerable,
}

/// Per-type payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Enemy,
    Tank {
        hp: u8,
        /// Side that took the last non-lethal hit
        hit_side: Option<TankSide>,
    },
    Phase {
        phase: Phase,
        hit_flash: f32,
        /// Set to 1.0 on the shield drop, decayed by presentation
        transition_flash: f32,
    },
    Spiral {
        /// +1 or -1
        spin_dir: i8,
        prev_lane: usize,
        spin_tick: u32,
    },
    Bomb,
    Heart,
    Wall {
        hit_flash: f32,
    },
    DoubleWall {
        /// Second spanned lane, always `(lane + 1) mod L`
        lane2: usize,
        hit_flash: f32,
    },
    Bullet,
}

/// A tunnel entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Logical lane in `[0, num_lanes)`
    pub lane: usize,
    pub depth: f32,
    /// Depth before the most recent move
    pub prev_depth: f32,
    pub alive: bool,
    /// Hit mid lane-change; explodes once the drift completes
    pub dying: bool,
    /// Hit and already scored; waiting on its ghost bullet
    pub pending_kill: bool,
    pub kind: EntityKind,
    /// Tick pass in which a cleanup first saw this entity dead
    #[serde(skip)]
    pub(crate) dead_since: Option<u64>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, lane: usize, depth: f32) -> Self {
        Self {
            id,
            lane,
            depth,
            prev_depth: depth,
            alive: true,
            dying: false,
            pending_kill: false,
            kind,
            dead_since: None,
        }
    }

    /// A freshly fired bullet. `prev_depth` sits half a step behind so the
    /// bullet is visibly moving before its first tick.
    pub fn bullet(id: EntityId, lane: usize, depth: f32) -> Self {
        let mut bullet = Self::new(id, EntityKind::Bullet, lane, depth);
        bullet.prev_depth = depth - 0.5;
        bullet
    }

    /// Build a spawnable entity of the given type at the spawn ring
    pub fn spawn(
        id: EntityId,
        ty: EntityType,
        lane: usize,
        config: &TunnelConfig,
        spin_dir: i8,
    ) -> Self {
        let kind = match ty {
            EntityType::Enemy => EntityKind::Enemy,
            EntityType::Tank => EntityKind::Tank {
                hp: 2,
                hit_side: None,
            },
            EntityType::Phase => EntityKind::Phase {
                phase: Phase::Shielded,
                hit_flash: 0.0,
                transition_flash: 0.0,
            },
            EntityType::Spiral => EntityKind::Spiral {
                spin_dir: if spin_dir < 0 { -1 } else { 1 },
                prev_lane: lane,
                spin_tick: 0,
            },
            EntityType::Bomb => EntityKind::Bomb,
            EntityType::Heart => EntityKind::Heart,
            EntityType::Wall => EntityKind::Wall { hit_flash: 0.0 },
            EntityType::DoubleWall => EntityKind::DoubleWall {
                lane2: wrap_lane(lane as i64 + 1, config.num_lanes),
                hit_flash: 0.0,
            },
            EntityType::Bullet => {
                return Self::bullet(id, lane, config.bullet_spawn_depth);
            }
        };
        Self::new(id, kind, lane, config.max_depth)
    }

    pub fn entity_type(&self) -> EntityType {
        match self.kind {
            EntityKind::Enemy => EntityType::Enemy,
            EntityKind::Tank { .. } => EntityType::Tank,
            EntityKind::Phase { .. } => EntityType::Phase,
            EntityKind::Spiral { .. } => EntityType::Spiral,
            EntityKind::Bomb => EntityType::Bomb,
            EntityKind::Heart => EntityType::Heart,
            EntityKind::Wall { .. } => EntityType::Wall,
            EntityKind::DoubleWall { .. } => EntityType::DoubleWall,
            EntityKind::Bullet => EntityType::Bullet,
        }
    }

    /// Advance one step of this entity's clock: bullets move outward on the
    /// bullet clock, everything else moves inward on the world clock.
    pub fn tick(&mut self, config: &TunnelConfig) {
        self.prev_depth = self.depth;
        match &mut self.kind {
            EntityKind::Bullet => {
                self.depth += 1.0;
                if self.depth > config.max_depth {
                    self.alive = false;
                }
            }
            EntityKind::Phase {
                phase,
                transition_flash,
                ..
            } => {
                self.depth -= 1.0;
                if *phase == Phase::Shielded && self.depth <= config.phase_depth {
                    *phase = Phase::Vulnerable;
                    *transition_flash = 1.0;
                }
            }
            EntityKind::Spiral {
                spin_dir,
                prev_lane,
                spin_tick,
            } => {
                *prev_lane = self.lane;
                self.depth -= 1.0;
                *spin_tick += 1;
                if spin_tick.is_multiple_of(2) {
                    self.lane = wrap_lane(self.lane as i64 + *spin_dir as i64, config.num_lanes);
                }
            }
            EntityKind::Enemy
            | EntityKind::Tank { .. }
            | EntityKind::Bomb
            | EntityKind::Heart
            | EntityKind::Wall { .. }
            | EntityKind::DoubleWall { .. } => {
                self.depth -= 1.0;
            }
        }
    }

    /// Mark dead (idempotent)
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Apply one bullet hit. Returns whether it was lethal.
    ///
    /// Tanks lose one hp per hit and remember the struck side while they
    /// survive; every other type dies on the first hit.
    pub fn hit(&mut self, side: TankSide) -> bool {
        match &mut self.kind {
            EntityKind::Tank { hp, hit_side } => {
                *hp = hp.saturating_sub(1);
                if *hp == 0 {
                    self.alive = false;
                    true
                } else {
                    *hit_side = Some(side);
                    false
                }
            }
            _ => {
                self.alive = false;
                true
            }
        }
    }

    /// Whether this entity covers `lane` (double walls cover two)
    pub fn occupies(&self, lane: usize) -> bool {
        match self.kind {
            EntityKind::DoubleWall { lane2, .. } => self.lane == lane || lane2 == lane,
            _ => self.lane == lane,
        }
    }

    /// Lanes covered by this entity
    pub fn lanes(&self) -> impl Iterator<Item = usize> + '_ {
        let second = match self.kind {
            EntityKind::DoubleWall { lane2, .. } => Some(lane2),
            _ => None,
        };
        std::iter::once(self.lane).chain(second)
    }

    /// Spiral that changed lane on its last move
    pub fn is_mid_drift(&self) -> bool {
        matches!(self.kind, EntityKind::Spiral { prev_lane, .. } if prev_lane != self.lane)
    }

    /// Phase enemy with its shield up
    pub fn is_shielded(&self) -> bool {
        matches!(
            self.kind,
            EntityKind::Phase {
                phase: Phase::Shielded,
                ..
            }
        )
    }

    /// Can still collide with bullets
    pub fn is_collidable(&self) -> bool {
        self.alive && !self.dying && !self.pending_kill
    }

    /// Passed the player ring
    pub fn past_player(&self) -> bool {
        self.depth < 0.0
    }

    /// Interpolated depth for a clock at `progress` through its period
    pub fn visual_depth(&self, progress: f32) -> f32 {
        lerp_depth(self.prev_depth, self.depth, progress)
    }

    /// Light up after deflecting a bullet
    pub fn flash(&mut self) {
        match &mut self.kind {
            EntityKind::Wall { hit_flash }
            | EntityKind::DoubleWall { hit_flash, .. }
            | EntityKind::Phase { hit_flash, .. } => *hit_flash = 1.0,
            _ => {}
        }
    }

    /// Fade hit/transition flashes by `amount`
    pub fn decay_flashes(&mut self, amount: f32) {
        match &mut self.kind {
            EntityKind::Wall { hit_flash } | EntityKind::DoubleWall { hit_flash, .. } => {
                *hit_flash = (*hit_flash - amount).max(0.0);
            }
            EntityKind::Phase {
                hit_flash,
                transition_flash,
                ..
            } => {
                *hit_flash = (*hit_flash - amount).max(0.0);
                *transition_flash = (*transition_flash - amount).max(0.0);
            }
            _ => {}
        }
    }

    /// Tank hp, if this is a tank
    pub fn tank_hp(&self) -> Option<u8> {
        match self.kind {
            EntityKind::Tank { hp, .. } => Some(hp),
            _ => None,
        }
    }
}
