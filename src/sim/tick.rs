//! Dual-clock session scheduler
//!
//! A `Session` owns the whole simulation: entities, game state, the spawn
//! engine and the collision resolver. Presentation calls `advance` once per
//! frame with the frame time; the session steps a slow world clock and a fast
//! bullet clock through that time in chronological order and runs each
//! clock's tick handler as it fires. Nothing outside a tick handler mutates
//! entities or game state.

use super::clock::PeriodicClock;
use super::collision::{CollisionResolver, PendingKill};
use super::entity::{EntityKind, EntityType, colors};
use super::events::{Explosion, GameEvent, PendingKillId};
use super::input::{InputAction, InputQueue};
use super::registry::EntityRegistry;
use super::spawn::{PatternKind, SpawnEngine};
use super::state::{GameState, RngState};
use crate::config::TunnelConfig;
use crate::depth_cell;
use crate::highscores::HighScore;

/// RNG streams derived from the session seed
const SPAWN_STREAM: u64 = 1;
const COLLISION_STREAM: u64 = 2;

#[derive(Debug)]
pub struct Session {
    config: TunnelConfig,
    seed: u64,
    state: GameState,
    registry: EntityRegistry,
    spawner: SpawnEngine,
    collisions: CollisionResolver,
    input: InputQueue,
    world_clock: PeriodicClock,
    bullet_clock: PeriodicClock,
    events: Vec<GameEvent>,
    high_score: HighScore,
    game_over_reported: bool,
}

impl Session {
    /// Start a session. `best_score` is the persisted high score.
    pub fn new(config: TunnelConfig, seed: u64, best_score: u64) -> Self {
        log::info!("Session started: seed={} best={}", seed, best_score);
        Self {
            state: GameState::new(&config),
            registry: EntityRegistry::new(),
            spawner: SpawnEngine::new(&RngState::new(seed, SPAWN_STREAM), &config),
            collisions: CollisionResolver::new(&RngState::new(seed, COLLISION_STREAM)),
            input: InputQueue::new(config.input_queue_cap, config.rotation_duration_ms),
            world_clock: PeriodicClock::new(config.difficulty.tick_ms(0.0)),
            bullet_clock: PeriodicClock::new(config.bullet_tick_ms),
            events: Vec::new(),
            high_score: HighScore::new(best_score),
            game_over_reported: false,
            config,
            seed,
        }
    }

    /// Restart with a new seed, keeping the config and the best score
    pub fn reset(&mut self, seed: u64) {
        let config = self.config.clone();
        *self = Self::new(config, seed, self.high_score.best);
    }

    // === Input ===

    pub fn rotate_left(&mut self) -> bool {
        self.queue_input(InputAction::RotateLeft)
    }

    pub fn rotate_right(&mut self) -> bool {
        self.queue_input(InputAction::RotateRight)
    }

    /// Request a shot; it is dropped silently while the cooldown runs
    pub fn fire(&mut self) -> bool {
        self.queue_input(InputAction::Fire)
    }

    fn queue_input(&mut self, action: InputAction) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        let queued = self.input.push(action);
        self.pump_input();
        queued
    }

    /// Apply queued actions until a rotation animation blocks the queue
    fn pump_input(&mut self) {
        while let Some(action) = self.input.pop_ready() {
            if action == InputAction::Fire {
                self.try_fire();
            }
        }
    }

    fn try_fire(&mut self) -> bool {
        if self.state.is_game_over() || self.state.fire_cooldown > 0.0 {
            return false;
        }
        let lane = self.state.player_lane();
        self.registry.fire_bullet(lane, self.config.bullet_spawn_depth);
        self.state.fire_cooldown = self.config.fire_cooldown_bullet_ticks;
        self.events.push(GameEvent::BulletFired { lane });
        true
    }

    // === Scheduling ===

    /// Advance the session by one frame of `dt_ms`
    pub fn advance(&mut self, dt_ms: f32) {
        if self.state.is_game_over() {
            self.report_game_over();
            return;
        }
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }

        if let Some(done) = self.input.advance(dt_ms) {
            match done {
                InputAction::RotateLeft => self.state.rotate_left(),
                InputAction::RotateRight => self.state.rotate_right(),
                InputAction::Fire => {}
            }
            self.pump_input();
        }

        let mut remaining = dt_ms;
        while !self.state.is_game_over() {
            let step = self
                .world_clock
                .time_to_next()
                .min(self.bullet_clock.time_to_next());
            if step > remaining {
                self.world_clock.elapse(remaining);
                self.bullet_clock.elapse(remaining);
                break;
            }
            self.world_clock.elapse(step);
            self.bullet_clock.elapse(step);
            remaining -= step;

            // World first when both fire together
            if self.world_clock.fire() {
                self.world_tick();
            }
            if !self.state.is_game_over() && self.bullet_clock.fire() {
                self.bullet_tick();
            }
        }
        self.report_game_over();
    }

    /// World clock handler: retire, spawn, move, collide, check contacts
    fn world_tick(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        let world_progress = self.world_clock.progress();

        self.registry.begin_pass();
        self.registry.remove_dead_obstacles();
        self.finalize_dying();
        self.collisions
            .finalize_stale(&mut self.registry, world_progress, &mut self.events);

        let period = self.world_clock.period_ms();
        self.spawner.tick(
            &self.state,
            &mut self.registry,
            &self.config,
            period,
            &mut self.events,
        );

        for e in self.registry.obstacles_mut() {
            if e.alive && !e.dying {
                e.tick(&self.config);
            }
        }

        let mut depths: Vec<i32> = self
            .registry
            .iter()
            .filter(|e| {
                e.alive && e.entity_type() != EntityType::Bullet && e.prev_depth >= 0.0
            })
            .map(|e| depth_cell(e.prev_depth))
            .collect();
        depths.sort_unstable();
        depths.dedup();
        self.events.push(GameEvent::EnemyMove { depths });

        self.collisions.resolve(
            &mut self.registry,
            &mut self.state,
            &self.config.scoring,
            self.bullet_clock.progress(),
            0.0,
            &mut self.events,
        );
        self.registry.remove_dead_enemies();

        self.check_enemy_contacts();
        if self.state.is_game_over() {
            self.report_game_over();
            return;
        }
        self.check_wall_contacts();
        if self.state.is_game_over() {
            self.report_game_over();
            return;
        }

        self.state.tick_count += 1;
        self.state.elapsed_ms += period;

        let next = self.config.difficulty.tick_ms(self.state.elapsed_ms);
        if (next - period).abs() >= 1.0 {
            log::debug!("World tick period {:.0}ms -> {:.0}ms", period, next);
        }
        self.world_clock.set_period(next);
    }

    /// Bullet clock handler: collide, move, collide again
    fn bullet_tick(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        let world_progress = self.world_clock.progress();
        let scoring = &self.config.scoring;

        self.registry.begin_pass();
        self.registry.remove_dead_bullets();

        // Catch obstacles already sharing the bullet's cell before it moves on
        self.collisions.resolve(
            &mut self.registry,
            &mut self.state,
            scoring,
            1.0,
            world_progress,
            &mut self.events,
        );
        self.registry.remove_dead_enemies();

        for b in &mut self.registry.bullets {
            if b.alive {
                b.tick(&self.config);
            }
        }

        self.collisions.resolve(
            &mut self.registry,
            &mut self.state,
            scoring,
            0.0,
            world_progress,
            &mut self.events,
        );
        self.registry.remove_dead_enemies();

        if self.state.fire_cooldown > 0.0 {
            self.state.fire_cooldown = (self.state.fire_cooldown - 1.0).max(0.0);
        }
    }

    /// Spirals hit mid-drift explode where they stopped
    fn finalize_dying(&mut self) {
        for e in &mut self.registry.enemies {
            if e.alive && e.dying {
                e.kill();
                let kind = e.entity_type();
                self.events.push(GameEvent::Explosion(Explosion {
                    lane: e.lane,
                    depth: e.depth,
                    color: kind.color(),
                    kind,
                    side: None,
                    partial: false,
                }));
            }
        }
    }

    /// Enemy-class entities that reached the player damage the tunnel face
    /// and the player
    fn check_enemy_contacts(&mut self) {
        let damage = &self.config.damage;
        for e in &mut self.registry.enemies {
            if !e.is_collidable() || !e.past_player() {
                continue;
            }
            let kind = e.entity_type();
            let amount = match e.kind {
                EntityKind::Tank { hp, .. } if hp >= 2 => damage.tank_contact,
                EntityKind::Tank { .. } => damage.weakened_tank_contact,
                EntityKind::Bomb => damage.bomb_contact,
                EntityKind::Heart => 0.0,
                _ => damage.enemy_contact,
            };
            e.kill();
            self.state.reset_multiplier();
            self.events.push(GameEvent::PlayerHit {
                lane: e.lane,
                color: kind.color(),
            });

            // Hearts pass through harmlessly
            if kind == EntityType::Heart {
                continue;
            }
            let segment = self.state.damage_segment(e.lane);
            self.events.push(GameEvent::SegmentDamage(segment));
            if segment.fatal {
                return;
            }
            if self.state.take_damage(amount) {
                return;
            }
        }
    }

    /// Walls that reached the player's lane escalate; the rest retire quietly
    fn check_wall_contacts(&mut self) {
        let walls = self
            .registry
            .walls
            .iter_mut()
            .chain(self.registry.double_walls.iter_mut());
        for w in walls {
            if !w.alive || !w.past_player() {
                continue;
            }
            w.kill();
            if !w.lanes().any(|lane| self.state.render_lane(lane) == 0) {
                continue;
            }
            let result = self.state.take_wall_hit();
            self.events.push(GameEvent::PlayerHit {
                lane: w.lane,
                color: colors::TUNNEL,
            });
            self.events.push(GameEvent::WallHit {
                tier: result.tier,
                fatal: result.fatal,
            });
            if result.fatal {
                return;
            }
        }
    }

    fn report_game_over(&mut self) {
        if !self.state.is_game_over() || self.game_over_reported {
            return;
        }
        self.game_over_reported = true;
        self.input.clear();
        let score = self.state.score;
        let new_high_score = self.high_score.check(score);
        if new_high_score {
            log::info!("New high score: {}", score);
        }
        if let Some(reason) = self.state.game_over_reason {
            self.events.push(GameEvent::GameOver {
                score,
                reason,
                new_high_score,
            });
        }
    }

    // === Presentation callbacks ===

    /// Advance ghost-bullet animations; returns how many kills completed
    pub fn advance_pending_kills(&mut self, dt_ms: f32) -> usize {
        let world_progress = self.world_clock.progress();
        self.collisions.advance_pending(
            dt_ms,
            self.config.ghost_travel_ms,
            &mut self.registry,
            world_progress,
            &mut self.events,
        )
    }

    /// Complete one pending kill now (ghost animation finished)
    pub fn finalize_pending_kill(&mut self, id: PendingKillId) -> bool {
        let world_progress = self.world_clock.progress();
        self.collisions
            .finalize(id, &mut self.registry, world_progress, &mut self.events)
    }

    /// Fade wall and phase hit flashes
    pub fn decay_flashes(&mut self, amount: f32) {
        for e in self.registry.obstacles_mut() {
            e.decay_flashes(amount);
        }
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Queries ===

    pub fn config(&self) -> &TunnelConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn best_score(&self) -> u64 {
        self.high_score.best
    }

    /// World clock progress through its current period
    pub fn world_progress(&self) -> f32 {
        self.world_clock.progress()
    }

    /// Bullet clock progress through its current period
    pub fn bullet_progress(&self) -> f32 {
        self.bullet_clock.progress()
    }

    pub fn world_period_ms(&self) -> f32 {
        self.world_clock.period_ms()
    }

    pub fn rotation_progress(&self) -> f32 {
        self.input.rotation_progress()
    }

    pub fn is_rotating(&self) -> bool {
        self.input.is_rotating()
    }

    pub fn pending_kills(&self) -> &[PendingKill] {
        self.collisions.pending()
    }

    pub fn active_pattern(&self) -> Option<PatternKind> {
        self.spawner.active_pattern()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RangeMs;
    use crate::sim::entity::{Entity, EntityId};
    use crate::sim::state::GameOverReason;

    /// Config with spawning and pattern moments effectively off
    fn quiet_config() -> TunnelConfig {
        let mut cfg = TunnelConfig::default();
        cfg.difficulty.spawn_interval.keys.clear();
        cfg.difficulty.spawn_interval.start = 1.0e9;
        cfg.difficulty.spawn_interval.floor = 1.0e9;
        cfg.spawn.pattern_idle_ms = RangeMs {
            min: 1.0e12,
            max: 1.0e12,
        };
        cfg
    }

    fn quiet_session() -> Session {
        Session::new(quiet_config(), 7, 0)
    }

    fn place(s: &mut Session, ty: EntityType, lane: usize, depth: f32) -> EntityId {
        let id = s.registry.next_entity_id();
        let mut e = Entity::spawn(id, ty, lane, &s.config, 1);
        e.depth = depth;
        e.prev_depth = depth;
        s.registry.add(e)
    }

    fn explosions(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::Explosion(_)))
            .count()
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut s = quiet_session();
        assert!(s.fire());
        assert_eq!(s.registry().bullets.len(), 1);
        s.fire();
        assert_eq!(s.registry().bullets.len(), 1, "cooldown");

        s.bullet_tick();
        s.fire();
        assert_eq!(s.registry().bullets.len(), 1, "0.5 ticks left");
        s.bullet_tick();
        s.fire();
        assert_eq!(s.registry().bullets.len(), 2);
    }

    #[test]
    fn test_bullet_spawns_on_player_lane() {
        let mut s = quiet_session();
        s.rotate_left();
        s.advance(150.0);
        assert_eq!(s.state().world_rotation, 1);
        s.fire();
        let b = &s.registry().bullets[0];
        assert_eq!(b.lane, 1);
        assert!((b.depth - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_applies_after_animation() {
        let mut s = quiet_session();
        s.rotate_right();
        assert!(s.is_rotating());
        s.advance(100.0);
        assert_eq!(s.state().world_rotation, 0);
        s.advance(50.0);
        assert_eq!(s.state().world_rotation, 5);
        assert!(!s.is_rotating());
    }

    #[test]
    fn test_rotation_changes_render_lane_only() {
        let mut s = quiet_session();
        let id = place(&mut s, EntityType::Enemy, 3, 5.0);
        s.rotate_right();
        s.rotate_right();
        s.advance(150.0);
        assert_eq!(s.state().world_rotation, 5, "second rotation still queued");
        s.advance(150.0);
        assert_eq!(s.state().world_rotation, 4);
        let e = s.registry().enemy(id).unwrap();
        assert_eq!(e.lane, 3);
        assert_eq!(s.state().render_lane(e.lane), 5);
    }

    #[test]
    fn test_clocks_interleave() {
        let mut s = quiet_session();
        s.advance(799.0);
        assert_eq!(s.state().tick_count, 0);
        assert!((s.world_progress() - 799.0 / 800.0).abs() < 1e-4);
        s.advance(1.0);
        assert_eq!(s.state().tick_count, 1);
        assert_eq!(s.state().elapsed_ms, 800.0);
        assert_eq!(s.world_progress(), 0.0);
    }

    #[test]
    fn test_bullet_travels_per_bullet_tick() {
        let mut s = quiet_session();
        s.fire();
        s.advance(200.0);
        assert!((s.registry().bullets[0].depth - 1.2).abs() < 1e-5);
        s.advance(400.0);
        assert!((s.registry().bullets[0].depth - 3.2).abs() < 1e-5);
    }

    #[test]
    fn test_bullet_hits_enemy_in_its_cell_before_moving() {
        let mut s = quiet_session();
        let id = place(&mut s, EntityType::Enemy, 0, 0.0);
        s.fire();
        s.bullet_tick();
        let e = s.registry().enemy(id).unwrap();
        assert!(e.pending_kill);
        assert_eq!(s.pending_kills().len(), 1);
        assert_eq!(s.state().score, 100);
    }

    #[test]
    fn test_corpse_outlives_the_killing_bullet_tick() {
        let mut s = quiet_session();
        s.state.take_damage(30.0);
        let id = place(&mut s, EntityType::Heart, 0, 0.0);
        s.fire();
        s.bullet_tick();
        let heart = s.registry().enemy(id);
        assert!(heart.is_some_and(|h| !h.alive), "resident for one tick of grace");
        assert_eq!(s.state().health, 100.0);

        s.bullet_tick();
        assert!(s.registry().enemy(id).is_none());
    }

    #[test]
    fn test_bomb_victims_stay_resident_through_the_tick() {
        let mut s = quiet_session();
        let bomb = place(&mut s, EntityType::Bomb, 0, 0.0);
        let other = place(&mut s, EntityType::Enemy, 3, 6.0);
        s.fire();
        s.bullet_tick();
        for id in [bomb, other] {
            assert!(s.registry().enemy(id).is_some_and(|e| !e.alive));
        }
        s.world_tick();
        assert!(s.registry().enemies.is_empty());
    }

    #[test]
    fn test_tank_survives_first_hit_then_defers() {
        let mut s = quiet_session();
        let tank = place(&mut s, EntityType::Tank, 0, 2.0);

        s.fire();
        s.advance(400.0);
        let t = s.registry().enemy(tank).unwrap();
        assert_eq!(t.tank_hp(), Some(1));
        assert!(t.alive && !t.pending_kill);
        assert_eq!(s.state().score, 50);

        assert_eq!(s.state().fire_cooldown, 0.0, "cooldown elapsed after two bullet ticks");
        s.fire();
        s.advance(400.0);
        let t = s.registry().enemy(tank).unwrap();
        assert!(t.alive, "stays resident until the ghost lands");
        assert!(t.pending_kill);
        assert_eq!(s.pending_kills().len(), 1);
        assert_eq!(s.state().score, 250);
        assert_eq!(s.state().score_multiplier, 1.0, "tank kills leave the multiplier");
        s.drain_events();

        assert_eq!(s.advance_pending_kills(180.0), 1);
        assert!(!s.registry().enemy(tank).unwrap().alive);
        let events = s.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Explosion(x) if x.kind == EntityType::Tank && x.side.is_some() && !x.partial
        )));
    }

    #[test]
    fn test_bomb_clears_the_tunnel() {
        let mut s = Session::new(quiet_config(), 2, 0);
        let bomb = place(&mut s, EntityType::Bomb, 0, 1.0);
        let a = place(&mut s, EntityType::Enemy, 2, 4.0);
        let b = place(&mut s, EntityType::Phase, 4, 5.0);

        s.fire();
        s.advance(200.0);

        for id in [bomb, a, b] {
            assert!(!s.registry().enemy(id).unwrap().alive);
        }
        assert_eq!(s.state().score, 300);
        assert_eq!(explosions(&s.drain_events()), 3);
    }

    #[test]
    fn test_heart_shot_heals_everything() {
        let mut s = Session::new(quiet_config(), 3, 0);
        s.state.take_damage(45.0);
        s.state.damage_segment(2);
        s.state.damage_segment(4);
        place(&mut s, EntityType::Heart, 0, 1.0);

        s.fire();
        s.advance(200.0);

        assert_eq!(s.state().health, 100.0);
        assert!(s.state().segment_damage.iter().all(|d| !d));
        assert!(
            s.drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::HeartCollect { .. }))
        );
    }

    #[test]
    fn test_enemy_contact_damages_segment_then_health() {
        let mut s = quiet_session();
        place(&mut s, EntityType::Tank, 3, 0.0);
        s.state.bump_multiplier(1.0);
        s.world_tick();

        assert_eq!(s.state().health, 80.0);
        assert!(s.state().segment_damage[3]);
        assert_eq!(s.state().score_multiplier, 1.0);
        let events = s.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerHit { lane: 3, .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::SegmentDamage(r) if r.first_damage)));
    }

    #[test]
    fn test_heart_passes_through() {
        let mut s = quiet_session();
        s.state.take_damage(50.0);
        place(&mut s, EntityType::Heart, 2, 0.0);
        s.world_tick();
        assert_eq!(s.state().health, 50.0);
        assert_eq!(s.state().damaged_segments(), 0);
        let events = s.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })));
    }

    #[test]
    fn test_segment_rehit_ends_session() {
        let mut s = quiet_session();
        s.state.damage_segment(1);
        place(&mut s, EntityType::Enemy, 1, 0.0);
        s.world_tick();
        assert!(s.is_game_over());
        assert_eq!(
            s.state().game_over_reason,
            Some(GameOverReason::TunnelBreach { lane: 1 })
        );
        assert_eq!(s.state().tick_count, 0, "tick halted");
        let events = s.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_wall_off_player_lane_is_retired() {
        let mut s = quiet_session();
        place(&mut s, EntityType::Wall, 3, 0.0);
        s.world_tick();
        assert_eq!(s.state().wall_hits, 0);
        assert!(!s.registry().walls[0].alive);
    }

    #[test]
    fn test_double_wall_second_lane_hits_player() {
        let mut s = quiet_session();
        place(&mut s, EntityType::DoubleWall, 5, 0.0);
        s.world_tick();
        assert_eq!(s.state().wall_hits, 1);
        assert_eq!(s.state().health, 70.0);
    }

    #[test]
    fn test_three_wall_hits_end_session_despite_healing() {
        let mut s = Session::new(quiet_config(), 4, 0);

        place(&mut s, EntityType::Wall, 0, 0.5);
        s.world_tick();
        assert_eq!(s.state().health, 70.0);

        s.state.heal_full();
        place(&mut s, EntityType::Wall, 0, 0.5);
        s.world_tick();
        assert_eq!(s.state().health, 40.0);

        s.state.heal_full();
        place(&mut s, EntityType::DoubleWall, 5, 0.5);
        s.world_tick();
        assert!(s.is_game_over());
        assert_eq!(s.state().health, 0.0);
        assert_eq!(s.state().game_over_reason, Some(GameOverReason::WallHits));
        let events = s.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::WallHit { tier: 3, fatal: true })));
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_pending_kill_skips_contact() {
        let mut s = quiet_session();
        let id = place(&mut s, EntityType::Enemy, 0, 0.0);
        s.registry.enemy_mut(id).unwrap().pending_kill = true;
        s.world_tick();
        assert_eq!(s.state().health, 100.0);
        assert_eq!(s.state().damaged_segments(), 0);
    }

    #[test]
    fn test_dying_spiral_explodes_next_tick() {
        let mut s = quiet_session();
        let id = place(&mut s, EntityType::Spiral, 2, 3.0);
        s.registry.enemy_mut(id).unwrap().dying = true;
        s.world_tick();
        let e = s.registry().enemy(id).unwrap();
        assert!(!e.alive);
        assert_eq!(e.depth, 3.0, "dying entities don't move");
        let events = s.drain_events();
        assert!(
            events
                .iter()
                .any(|ev| matches!(ev, GameEvent::Explosion(x) if x.kind == EntityType::Spiral))
        );
    }

    #[test]
    fn test_game_over_records_high_score() {
        let mut cfg = TunnelConfig::default();
        cfg.spawn.pattern_idle_ms = RangeMs {
            min: 1.0e12,
            max: 1.0e12,
        };
        let mut s = Session::new(cfg, 1, 50);
        s.state.score = 120;
        s.state.take_damage(1000.0);
        s.advance(16.0);
        assert_eq!(s.best_score(), 120);
        let events = s.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver {
                score: 120,
                new_high_score: true,
                ..
            }
        )));
    }

    #[test]
    fn test_reset_keeps_best_score() {
        let mut s = quiet_session();
        s.state.score = 300;
        s.state.take_damage(1000.0);
        s.advance(16.0);
        s.reset(99);
        assert_eq!(s.best_score(), 300);
        assert_eq!(s.state().score, 0);
        assert!(!s.is_game_over());
        assert_eq!(s.seed(), 99);
    }

    #[test]
    fn test_input_ignored_after_game_over() {
        let mut s = quiet_session();
        s.state.take_damage(1000.0);
        assert!(!s.fire());
        assert!(!s.rotate_left());
        assert!(s.registry().bullets.is_empty());
    }
}
