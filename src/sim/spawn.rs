//! Procedural spawning
//!
//! Runs once per world tick. A fractional budget integrates the difficulty
//! curve's spawn interval: each tick adds `1 / interval` and every whole unit
//! becomes one spawn. Which entity appears comes from a weighted draw over the
//! unlocked types, unless a pattern moment is active, in which case the
//! pattern's fixed behavior decides instead.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::EntityType;
use super::events::GameEvent;
use super::registry::EntityRegistry;
use super::state::{GameState, RngState};
use crate::config::{RangeMs, TunnelConfig};
use crate::wrap_lane;

/// Fixed spawn behaviors used during a pattern moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    /// Walls on successive adjacent lanes
    WallCluster,
    /// Spirals on a lane that steps around the ring each spawn
    SpiralSequence,
    /// One lane stays empty for the whole moment
    SafeGap,
    /// Plain enemies only
    EnemyRush,
}

impl PatternKind {
    pub const ALL: [PatternKind; 4] = [
        PatternKind::WallCluster,
        PatternKind::SpiralSequence,
        PatternKind::SafeGap,
        PatternKind::EnemyRush,
    ];
}

/// Pattern-moment state machine, timed in game milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternState {
    Idle {
        remaining_ms: f32,
    },
    Active {
        kind: PatternKind,
        remaining_ms: f32,
        /// Cluster/sequence cursor, or the protected lane for `SafeGap`
        lane: usize,
        spin_dir: i8,
    },
}

fn roll_ms(rng: &mut Pcg32, range: RangeMs) -> f32 {
    if range.max > range.min {
        rng.random_range(range.min..=range.max)
    } else {
        range.min.max(0.0)
    }
}

/// Pick from `(type, weight)` pairs with `roll` in `[0, total weight)`
pub fn pick_weighted(candidates: &[(EntityType, f32)], roll: f32) -> Option<EntityType> {
    let mut acc = 0.0;
    for &(kind, weight) in candidates {
        acc += weight;
        if roll < acc {
            return Some(kind);
        }
    }
    candidates.last().map(|&(kind, _)| kind)
}

#[derive(Debug, Clone)]
pub struct SpawnEngine {
    budget: f32,
    pattern: PatternState,
    rng: Pcg32,
}

impl SpawnEngine {
    pub fn new(rng_state: &RngState, config: &TunnelConfig) -> Self {
        let mut rng = rng_state.to_rng();
        let remaining_ms = roll_ms(&mut rng, config.spawn.pattern_idle_ms);
        Self {
            budget: 0.0,
            pattern: PatternState::Idle { remaining_ms },
            rng,
        }
    }

    pub fn budget(&self) -> f32 {
        self.budget
    }

    /// Active pattern, if any
    pub fn active_pattern(&self) -> Option<PatternKind> {
        match self.pattern {
            PatternState::Active { kind, .. } => Some(kind),
            PatternState::Idle { .. } => None,
        }
    }

    /// One world tick of spawning; `dt_ms` is the tick's game-time length.
    /// Returns the number of entities spawned.
    pub fn tick(
        &mut self,
        state: &GameState,
        registry: &mut EntityRegistry,
        config: &TunnelConfig,
        dt_ms: f32,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        if state.is_game_over() {
            return 0;
        }
        self.advance_pattern(state.elapsed_ms, dt_ms, config, events);

        let interval = config.difficulty.spawn_interval(state.elapsed_ms);
        self.budget += if interval > 0.0 { 1.0 / interval } else { 1.0 };

        let mut count = 0;
        while self.budget >= 1.0 {
            self.budget -= 1.0;
            self.spawn_one(state, registry, config);
            count += 1;
        }
        count
    }

    fn advance_pattern(
        &mut self,
        elapsed_ms: f32,
        dt_ms: f32,
        config: &TunnelConfig,
        events: &mut Vec<GameEvent>,
    ) {
        if elapsed_ms < config.spawn.pattern_unlock_ms {
            return;
        }
        let dt_ms = dt_ms.max(0.0);
        match &mut self.pattern {
            PatternState::Idle { remaining_ms } => {
                *remaining_ms -= dt_ms;
                if *remaining_ms <= 0.0 {
                    let kind = PatternKind::ALL[self.rng.random_range(0..PatternKind::ALL.len())];
                    let remaining_ms = roll_ms(&mut self.rng, config.spawn.pattern_active_ms);
                    let lane = self.rng.random_range(0..config.num_lanes.max(1));
                    let spin_dir = if self.rng.random_bool(0.5) { 1 } else { -1 };
                    self.pattern = PatternState::Active {
                        kind,
                        remaining_ms,
                        lane,
                        spin_dir,
                    };
                    log::info!("Pattern {:?} started ({:.1}s)", kind, remaining_ms / 1000.0);
                    events.push(GameEvent::PatternStarted { pattern: kind });
                }
            }
            PatternState::Active {
                kind, remaining_ms, ..
            } => {
                *remaining_ms -= dt_ms;
                if *remaining_ms <= 0.0 {
                    let kind = *kind;
                    let remaining_ms = roll_ms(&mut self.rng, config.spawn.pattern_idle_ms);
                    self.pattern = PatternState::Idle { remaining_ms };
                    log::info!("Pattern {:?} ended", kind);
                    events.push(GameEvent::PatternEnded { pattern: kind });
                }
            }
        }
    }

    fn spawn_one(
        &mut self,
        state: &GameState,
        registry: &mut EntityRegistry,
        config: &TunnelConfig,
    ) {
        let lanes = config.num_lanes.max(1);
        let walls_capped =
            registry.live_wall_count() >= config.difficulty.wall_cap(state.elapsed_ms);

        let (kind, lane, spin_dir) = match &mut self.pattern {
            PatternState::Active {
                kind: PatternKind::WallCluster,
                lane,
                ..
            } => {
                let at = *lane;
                *lane = wrap_lane(at as i64 + 1, lanes);
                let kind = if walls_capped { EntityType::Enemy } else { EntityType::Wall };
                (kind, at, 1)
            }
            PatternState::Active {
                kind: PatternKind::SpiralSequence,
                lane,
                spin_dir,
                ..
            } => {
                let at = *lane;
                *lane = wrap_lane(at as i64 + *spin_dir as i64, lanes);
                (EntityType::Spiral, at, *spin_dir)
            }
            PatternState::Active {
                kind: PatternKind::SafeGap,
                lane: gap,
                ..
            } => {
                let gap = *gap;
                let kind = self.draw_type(state, config, walls_capped);
                let lane = if lanes > 1 {
                    wrap_lane(gap as i64 + self.rng.random_range(1..lanes) as i64, lanes)
                } else {
                    0
                };
                // Double walls would reach into the gap from the lane below it
                let kind = if kind == EntityType::DoubleWall
                    && wrap_lane(lane as i64 + 1, lanes) == gap
                {
                    EntityType::Wall
                } else {
                    kind
                };
                (kind, lane, self.roll_spin())
            }
            PatternState::Active {
                kind: PatternKind::EnemyRush,
                ..
            } => (EntityType::Enemy, self.rng.random_range(0..lanes), 1),
            PatternState::Idle { .. } => {
                let kind = self.draw_type(state, config, walls_capped);
                (kind, self.rng.random_range(0..lanes), self.roll_spin())
            }
        };

        let id = registry.spawn(kind, lane, config, spin_dir);
        log::debug!("Spawned {:?} #{} on lane {}", kind, id.0, lane);
    }

    fn roll_spin(&mut self) -> i8 {
        if self.rng.random_bool(0.5) { 1 } else { -1 }
    }

    /// Weighted draw over the types unlocked at this point in the session
    fn draw_type(
        &mut self,
        state: &GameState,
        config: &TunnelConfig,
        walls_capped: bool,
    ) -> EntityType {
        let candidates = candidate_weights(state, config, walls_capped);
        let total: f32 = candidates.iter().map(|&(_, w)| w).sum();
        if total <= 0.0 {
            return EntityType::Enemy;
        }
        let roll = self.rng.random_range(0.0..total);
        pick_weighted(&candidates, roll).unwrap_or(EntityType::Enemy)
    }
}

/// Spawnable types and their current weights, after gating
pub fn candidate_weights(
    state: &GameState,
    config: &TunnelConfig,
    walls_capped: bool,
) -> Vec<(EntityType, f32)> {
    let elapsed = state.elapsed_ms;
    config
        .spawn
        .weights
        .iter()
        .filter(|w| !(walls_capped && w.kind.is_wall()))
        .filter(|w| {
            !(w.kind == EntityType::Heart && state.health >= config.spawn.heart_health_threshold)
        })
        .map(|w| (w.kind, w.weight_at(elapsed)))
        .filter(|&(_, weight)| weight > 0.0)
        .collect()
}
