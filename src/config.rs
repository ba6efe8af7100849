//! Tunnel tuning and configuration
//!
//! Every number the simulation reads lives in `TunnelConfig`, which is passed
//! to `Session::new`. All sections use `#[serde(default)]` so a JSON file only
//! needs to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::entity::EntityType;

/// Shape of the difficulty curves
///
/// Three shapes have been used over the life of the game; `Plateau` is the
/// current one, the others are kept as drop-in replacements for tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CurveProfile {
    /// Straight ramp down to a floor
    Linear,
    /// Keyframed: steep early ramp, flat plateaus, slow final ramp
    #[default]
    Plateau,
    /// Square-root decay toward a floor
    SqrtDecay,
}

impl CurveProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveProfile::Linear => "Linear",
            CurveProfile::Plateau => "Plateau",
            CurveProfile::SqrtDecay => "SqrtDecay",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Some(CurveProfile::Linear),
            "plateau" | "stepped" => Some(CurveProfile::Plateau),
            "sqrt" | "sqrtdecay" | "sqrt_decay" => Some(CurveProfile::SqrtDecay),
            _ => None,
        }
    }
}

/// One point of a keyframed curve (elapsed ms → value)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub at_ms: f32,
    pub value: f32,
}

const fn key(at_secs: f32, value: f32) -> Keyframe {
    Keyframe {
        at_ms: at_secs * 1000.0,
        value,
    }
}

/// Parameters of a single curve under every profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// Plateau profile keyframes, sorted by `at_ms`
    pub keys: Vec<Keyframe>,
    /// Value at t = 0 (Linear, SqrtDecay)
    pub start: f32,
    /// Lowest value the curve reaches (all profiles clamp to this)
    pub floor: f32,
    /// Linear: drop per minute of play
    pub slope_per_min: f32,
    /// SqrtDecay: time constant in ms
    pub decay_ms: f32,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            start: 1.0,
            floor: 1.0,
            slope_per_min: 0.0,
            decay_ms: 60_000.0,
        }
    }
}

/// Difficulty curves: world tick period, spawn cadence, wall cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub profile: CurveProfile,
    /// World clock period (ms)
    pub tick_ms: CurveParams,
    /// World ticks between spawns (may be fractional)
    pub spawn_interval: CurveParams,
    /// Live walls allowed at t = 0
    pub wall_cap_base: usize,
    /// One extra wall allowed per this many ms
    pub wall_cap_step_ms: f32,
    pub wall_cap_max: usize,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            profile: CurveProfile::Plateau,
            tick_ms: CurveParams {
                keys: vec![
                    key(0.0, TICK_MS),
                    key(30.0, 650.0),
                    key(60.0, 650.0),
                    key(90.0, 550.0),
                    key(150.0, 550.0),
                    key(210.0, 470.0),
                    key(300.0, 470.0),
                    key(600.0, 380.0),
                ],
                start: TICK_MS,
                floor: 380.0,
                slope_per_min: 60.0,
                decay_ms: 90_000.0,
            },
            spawn_interval: CurveParams {
                keys: vec![
                    key(0.0, 3.0),
                    key(30.0, 2.0),
                    key(60.0, 2.0),
                    key(90.0, 1.6),
                    key(150.0, 1.6),
                    key(210.0, 1.3),
                    key(300.0, 1.3),
                    key(600.0, 1.0),
                ],
                start: 3.0,
                floor: 1.0,
                slope_per_min: 0.4,
                decay_ms: 90_000.0,
            },
            wall_cap_base: 2,
            wall_cap_step_ms: 60_000.0,
            wall_cap_max: 5,
        }
    }
}

/// Health and contact damage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    pub max_health: f32,
    pub enemy_contact: f32,
    /// Tank at full hp
    pub tank_contact: f32,
    /// Tank already hit once
    pub weakened_tank_contact: f32,
    pub bomb_contact: f32,
    /// Health lost per non-fatal wall hit, by tier
    pub wall_tier_damage: Vec<f32>,
    /// Wall hit count that ends the session outright
    pub fatal_wall_hits: u32,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            max_health: MAX_HEALTH,
            enemy_contact: 10.0,
            tank_contact: 20.0,
            weakened_tank_contact: 10.0,
            bomb_contact: 20.0,
            wall_tier_damage: vec![30.0, 60.0],
            fatal_wall_hits: 3,
        }
    }
}

/// Points and multiplier tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub enemy: u64,
    pub tank_kill: u64,
    pub tank_partial: u64,
    pub bomb: u64,
    pub chain_kill: u64,
    /// Kills at or beyond this depth get the far-kill bonus
    pub far_kill_depth: f32,
    pub far_kill_bonus: f32,
    pub multiplier_step: f32,
    pub chain_multiplier_step: f32,
    pub multiplier_cap: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            enemy: 100,
            tank_kill: 200,
            tank_partial: 50,
            bomb: 100,
            chain_kill: 100,
            far_kill_depth: 4.0,
            far_kill_bonus: 1.5,
            multiplier_step: 0.1,
            chain_multiplier_step: 0.5,
            multiplier_cap: 4.0,
        }
    }
}

/// Linear weight ramp from a kind's unlock time to `saturate_ms`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRamp {
    pub saturate_ms: f32,
    pub start_weight: f32,
    pub end_weight: f32,
}

/// Spawn table entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeight {
    pub kind: EntityType,
    /// Flat weight (ignored when `ramp` is set)
    pub weight: f32,
    /// Elapsed ms before this kind can be drawn
    pub unlock_ms: f32,
    #[serde(default)]
    pub ramp: Option<WeightRamp>,
}

impl SpawnWeight {
    const fn flat(kind: EntityType, weight: f32, unlock_secs: f32) -> Self {
        Self {
            kind,
            weight,
            unlock_ms: unlock_secs * 1000.0,
            ramp: None,
        }
    }

    const fn ramped(kind: EntityType, unlock_secs: f32, ramp: WeightRamp) -> Self {
        Self {
            kind,
            weight: ramp.start_weight,
            unlock_ms: unlock_secs * 1000.0,
            ramp: Some(ramp),
        }
    }
}

/// Inclusive millisecond range used for randomized timers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeMs {
    pub min: f32,
    pub max: f32,
}

/// Spawn table and pattern moment timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub weights: Vec<SpawnWeight>,
    /// Hearts are not drawn while health is at or above this
    pub heart_health_threshold: f32,
    /// No pattern moments before this much elapsed time
    pub pattern_unlock_ms: f32,
    /// Idle gap between pattern moments
    pub pattern_idle_ms: RangeMs,
    /// Length of a pattern moment
    pub pattern_active_ms: RangeMs,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            weights: vec![
                SpawnWeight::flat(EntityType::Enemy, 60.0, 0.0),
                SpawnWeight::flat(EntityType::Wall, 15.0, 0.0),
                SpawnWeight::flat(EntityType::Tank, 10.0, 20.0),
                SpawnWeight::flat(EntityType::DoubleWall, 10.0, 40.0),
                SpawnWeight::flat(EntityType::Phase, 8.0, 60.0),
                SpawnWeight::flat(EntityType::Bomb, 4.0, 90.0),
                SpawnWeight::ramped(
                    EntityType::Heart,
                    45.0,
                    WeightRamp {
                        saturate_ms: 240_000.0,
                        start_weight: 2.0,
                        end_weight: 6.0,
                    },
                ),
                SpawnWeight::ramped(
                    EntityType::Spiral,
                    120.0,
                    WeightRamp {
                        saturate_ms: 300_000.0,
                        start_weight: 2.0,
                        end_weight: 10.0,
                    },
                ),
            ],
            heart_health_threshold: 70.0,
            pattern_unlock_ms: 0.0,
            pattern_idle_ms: RangeMs {
                min: 30_000.0,
                max: 45_000.0,
            },
            pattern_active_ms: RangeMs {
                min: 6_000.0,
                max: 10_000.0,
            },
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    // === Geometry ===
    pub num_lanes: usize,
    pub max_depth: f32,
    pub phase_depth: f32,
    pub bullet_spawn_depth: f32,
    pub critical_segments: usize,

    // === Timing ===
    pub bullet_tick_ms: f32,
    pub fire_cooldown_bullet_ticks: f32,
    pub rotation_duration_ms: f32,
    pub input_queue_cap: usize,
    pub ghost_travel_ms: f32,

    // === Rotation ===
    /// Lane offset added to `world_rotation` by a right rotation
    pub rotate_right_step: usize,
    /// Lane offset added to `world_rotation` by a left rotation
    pub rotate_left_step: usize,

    pub damage: DamageConfig,
    pub scoring: ScoringConfig,
    pub difficulty: DifficultyConfig,
    pub spawn: SpawnConfig,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            num_lanes: NUM_LANES,
            max_depth: MAX_DEPTH,
            phase_depth: PHASE_DEPTH,
            bullet_spawn_depth: BULLET_SPAWN_DEPTH,
            critical_segments: CRITICAL_SEGMENTS,

            bullet_tick_ms: BULLET_TICK_MS,
            fire_cooldown_bullet_ticks: FIRE_COOLDOWN_BULLET_TICKS,
            rotation_duration_ms: ROTATION_DURATION_MS,
            input_queue_cap: INPUT_QUEUE_CAP,
            ghost_travel_ms: GHOST_TRAVEL_MS,

            rotate_right_step: NUM_LANES - 1,
            rotate_left_step: 1,

            damage: DamageConfig::default(),
            scoring: ScoringConfig::default(),
            difficulty: DifficultyConfig::default(),
            spawn: SpawnConfig::default(),
        }
    }
}

impl TunnelConfig {
    /// Same defaults with a different curve shape
    pub fn with_profile(profile: CurveProfile) -> Self {
        let mut config = Self::default();
        config.difficulty.profile = profile;
        config
    }

    /// Check that the values can drive a session
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(msg: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.into()))
        }

        if self.num_lanes < 2 {
            return invalid(format!("num_lanes must be at least 2, got {}", self.num_lanes));
        }
        if self.max_depth < 1.0 {
            return invalid(format!("max_depth must be at least 1, got {}", self.max_depth));
        }
        if !(self.bullet_tick_ms > 0.0) {
            return invalid("bullet_tick_ms must be positive");
        }
        if self.critical_segments == 0 || self.critical_segments > self.num_lanes {
            return invalid(format!(
                "critical_segments must be in 1..={}, got {}",
                self.num_lanes, self.critical_segments
            ));
        }
        if self.rotate_left_step % self.num_lanes == 0
            || self.rotate_right_step % self.num_lanes == 0
        {
            return invalid("rotation steps must move at least one lane");
        }
        if self.input_queue_cap == 0 {
            return invalid("input_queue_cap must be at least 1");
        }
        if !(self.damage.max_health > 0.0) {
            return invalid("max_health must be positive");
        }
        if self.damage.fatal_wall_hits == 0 {
            return invalid("fatal_wall_hits must be at least 1");
        }
        if self.scoring.multiplier_cap < 1.0 {
            return invalid("multiplier_cap must be at least 1");
        }

        for (name, curve) in [
            ("tick_ms", &self.difficulty.tick_ms),
            ("spawn_interval", &self.difficulty.spawn_interval),
        ] {
            if !(curve.floor > 0.0) {
                return invalid(format!("{name} floor must be positive"));
            }
            if self.difficulty.profile == CurveProfile::Plateau {
                if curve.keys.is_empty() {
                    return invalid(format!("{name} needs at least one keyframe"));
                }
                if curve.keys.windows(2).any(|w| w[1].at_ms < w[0].at_ms) {
                    return invalid(format!("{name} keyframes must be sorted by at_ms"));
                }
                if curve.keys.windows(2).any(|w| w[1].value > w[0].value) {
                    return invalid(format!("{name} keyframes must not increase"));
                }
            }
            if self.difficulty.profile == CurveProfile::SqrtDecay && !(curve.decay_ms > 0.0) {
                return invalid(format!("{name} decay_ms must be positive"));
            }
        }

        let weights = &self.spawn.weights;
        if weights.iter().any(|w| w.kind == EntityType::Bullet) {
            return invalid("bullets cannot appear in the spawn table");
        }
        if !weights.iter().any(|w| w.unlock_ms <= 0.0 && w.weight > 0.0) {
            return invalid("spawn table needs a positive weight unlocked at t = 0");
        }
        for range in [self.spawn.pattern_idle_ms, self.spawn.pattern_active_ms] {
            if range.min > range.max || range.min < 0.0 {
                return invalid("pattern ranges need 0 <= min <= max");
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TunnelConfig = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
            let config = Self::from_json(&contents)?;
            log::info!("Loaded tunnel config from {}", path.display());
            Ok(config)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Write as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Parse)?;
        std::fs::write(path, json).map_err(ConfigError::Write)?;
        log::info!("Tunnel config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TunnelConfig::default().validate().is_ok());
        for profile in [CurveProfile::Linear, CurveProfile::Plateau, CurveProfile::SqrtDecay] {
            assert!(TunnelConfig::with_profile(profile).validate().is_ok());
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TunnelConfig::from_json(r#"{ "bullet_tick_ms": 150.0 }"#).unwrap();
        assert_eq!(config.bullet_tick_ms, 150.0);
        assert_eq!(config.num_lanes, NUM_LANES);
        assert_eq!(config.damage.wall_tier_damage, vec![30.0, 60.0]);
    }

    #[test]
    fn test_nested_partial_json() {
        let config =
            TunnelConfig::from_json(r#"{ "difficulty": { "profile": "SqrtDecay" } }"#).unwrap();
        assert_eq!(config.difficulty.profile, CurveProfile::SqrtDecay);
        assert_eq!(config.difficulty.wall_cap_max, 5);
    }

    #[test]
    fn test_invalid_json_produces_error() {
        let err = TunnelConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_lanes_rejected() {
        let err = TunnelConfig::from_json(r#"{ "num_lanes": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unsorted_keyframes_rejected() {
        let mut config = TunnelConfig::default();
        config.difficulty.tick_ms.keys = vec![key(10.0, 500.0), key(0.0, 800.0)];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bullet_in_spawn_table_rejected() {
        let mut config = TunnelConfig::default();
        config
            .spawn
            .weights
            .push(SpawnWeight::flat(EntityType::Bullet, 1.0, 0.0));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!(CurveProfile::from_str("plateau"), Some(CurveProfile::Plateau));
        assert_eq!(CurveProfile::from_str("SQRT"), Some(CurveProfile::SqrtDecay));
        assert_eq!(CurveProfile::from_str("cubic"), None);
        assert_eq!(CurveProfile::Linear.as_str(), "Linear");
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("hexax_config_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tunnel.json");

        let mut config = TunnelConfig::default();
        config.scoring.enemy = 250;
        config.save(&path).unwrap();

        let loaded = TunnelConfig::load_or_default(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("hexax_definitely_missing_config.json");
        let config = TunnelConfig::load_or_default(&path).unwrap();
        assert_eq!(config, TunnelConfig::default());
    }
}
