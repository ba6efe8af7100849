//! Game state: score, health, rotation and tunnel damage
//!
//! The health subsystem has two phases, `Alive` and `GameOver`; nothing leaves
//! `GameOver`. Every fatal rule (health exhausted, tunnel breach, final wall
//! hit) funnels through `GameState::end`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{DamageConfig, TunnelConfig};
use crate::wrap_lane;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Session running
    Alive,
    /// Session ended (terminal)
    GameOver,
}

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Health reached zero
    HealthDepleted,
    /// A damaged tunnel face was hit again
    TunnelBreach { lane: usize },
    /// Final tier of the wall-hit escalation
    WallHits,
}

/// Outcome of one wall reaching the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallHitResult {
    /// 1-based escalation tier (equals the wall hit count)
    pub tier: u32,
    pub fatal: bool,
    /// Health after the hit
    pub health: f32,
}

/// Outcome of structural damage to one tunnel face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDamageResult {
    pub lane: usize,
    /// Face was already damaged: tunnel breach
    pub fatal: bool,
    /// First damaged face of the tunnel
    pub first_damage: bool,
    /// Damaged face count reached the critical threshold
    pub critical: bool,
    pub damaged_count: usize,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    /// Independent generator per stream so spawn and collision rolls don't
    /// perturb each other
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed ^ self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

/// Rule values copied out of `TunnelConfig` at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateRules {
    damage: DamageConfig,
    multiplier_cap: f32,
    critical_segments: usize,
    num_lanes: usize,
    rotate_left_step: usize,
    rotate_right_step: usize,
}

/// Session-wide gameplay state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub score_multiplier: f32,
    /// In `[0, max_health]`
    pub health: f32,
    /// Monotonic for the whole session (hearts don't reset it)
    pub wall_hits: u32,
    /// Lane offset applied by rotations; also the player's logical lane
    pub world_rotation: usize,
    /// One flag per tunnel face
    pub segment_damage: Vec<bool>,
    pub phase: GamePhase,
    pub game_over_reason: Option<GameOverReason>,
    /// Game time, advanced by the world tick period
    pub elapsed_ms: f32,
    /// World ticks processed
    pub tick_count: u64,
    /// Bullet ticks until the next shot is allowed
    pub fire_cooldown: f32,
    rules: StateRules,
}

impl GameState {
    pub fn new(config: &TunnelConfig) -> Self {
        Self {
            score: 0,
            score_multiplier: 1.0,
            health: config.damage.max_health,
            wall_hits: 0,
            world_rotation: 0,
            segment_damage: vec![false; config.num_lanes],
            phase: GamePhase::Alive,
            game_over_reason: None,
            elapsed_ms: 0.0,
            tick_count: 0,
            fire_cooldown: 0.0,
            rules: StateRules {
                damage: config.damage.clone(),
                multiplier_cap: config.scoring.multiplier_cap.max(1.0),
                critical_segments: config.critical_segments,
                num_lanes: config.num_lanes,
                rotate_left_step: config.rotate_left_step,
                rotate_right_step: config.rotate_right_step,
            },
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn max_health(&self) -> f32 {
        self.rules.damage.max_health
    }

    /// Enter `GameOver`. Returns false if the session had already ended.
    pub fn end(&mut self, reason: GameOverReason) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.game_over_reason = Some(reason);
        log::info!(
            "Game over ({:?}): score={} elapsed={:.1}s",
            reason,
            self.score,
            self.elapsed_ms / 1000.0
        );
        true
    }

    /// Subtract health; returns true if the session is over afterwards
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_game_over() {
            return true;
        }
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.health = (self.health - amount).clamp(0.0, self.max_health());
        if self.health <= 0.0 {
            self.end(GameOverReason::HealthDepleted);
            return true;
        }
        false
    }

    /// Escalating wall-hit policy: tiered health loss, then instant game over
    pub fn take_wall_hit(&mut self) -> WallHitResult {
        self.wall_hits += 1;
        self.reset_multiplier();
        let tier = self.wall_hits;

        let fatal = if tier >= self.rules.damage.fatal_wall_hits {
            self.health = 0.0;
            self.end(GameOverReason::WallHits);
            true
        } else {
            let tiers = &self.rules.damage.wall_tier_damage;
            let damage = tiers
                .get(tier as usize - 1)
                .or(tiers.last())
                .copied()
                .unwrap_or(0.0);
            self.take_damage(damage)
        };

        log::debug!("Wall hit tier {} (fatal={}, health={})", tier, fatal, self.health);
        WallHitResult {
            tier,
            fatal,
            health: self.health,
        }
    }

    /// Mark a tunnel face damaged; a second hit on the same face is fatal
    pub fn damage_segment(&mut self, lane: usize) -> SegmentDamageResult {
        let lane = wrap_lane(lane as i64, self.segment_damage.len());
        if self.segment_damage[lane] {
            self.end(GameOverReason::TunnelBreach { lane });
            return SegmentDamageResult {
                lane,
                fatal: true,
                first_damage: false,
                critical: true,
                damaged_count: self.damaged_segments(),
            };
        }

        self.segment_damage[lane] = true;
        let damaged_count = self.damaged_segments();
        let result = SegmentDamageResult {
            lane,
            fatal: false,
            first_damage: damaged_count == 1,
            critical: damaged_count >= self.rules.critical_segments,
            damaged_count,
        };
        log::debug!("Segment {} damaged ({} total)", lane, damaged_count);
        result
    }

    pub fn damaged_segments(&self) -> usize {
        self.segment_damage.iter().filter(|&&d| d).count()
    }

    /// Heart pickup: full health and every face repaired
    pub fn heal_full(&mut self) {
        self.health = self.max_health();
        self.segment_damage.fill(false);
    }

    /// Award `round(base * multiplier)`; returns the points added
    pub fn add_score(&mut self, base: f32) -> u64 {
        let points = (base.max(0.0) * self.score_multiplier).round() as u64;
        self.score += points;
        points
    }

    pub fn bump_multiplier(&mut self, step: f32) {
        self.score_multiplier =
            (self.score_multiplier + step.max(0.0)).min(self.rules.multiplier_cap);
    }

    pub fn reset_multiplier(&mut self) {
        self.score_multiplier = 1.0;
    }

    pub fn rotate_right(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.world_rotation =
            (self.world_rotation + self.rules.rotate_right_step) % self.rules.num_lanes;
    }

    pub fn rotate_left(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.world_rotation =
            (self.world_rotation + self.rules.rotate_left_step) % self.rules.num_lanes;
    }

    /// Lane as drawn relative to the player (player sits at render lane 0)
    pub fn render_lane(&self, logical_lane: usize) -> usize {
        wrap_lane(
            logical_lane as i64 - self.world_rotation as i64,
            self.rules.num_lanes,
        )
    }

    /// Logical lane currently in front of the player
    pub fn player_lane(&self) -> usize {
        self.world_rotation
    }
}
