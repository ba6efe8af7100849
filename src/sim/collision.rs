//! Bullet collision resolution
//!
//! A bullet hits an obstacle when their floored depths and lanes match. Each
//! live bullet is checked against, in order: walls, double walls, shielded
//! phase enemies (all three deflect), then every other enemy-class entity.
//! The first match wins and the bullet dies.
//!
//! Most kills are deferred: the enemy is scored now, flagged `pending_kill`,
//! and a `PendingKill` waits for presentation's ghost bullet to reach it
//! before the explosion fires.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind, EntityType, TankSide, colors};
use super::events::{Explosion, GameEvent, PendingKillId};
use super::registry::EntityRegistry;
use super::state::{GameState, RngState};
use crate::config::ScoringConfig;
use crate::depth_cell;

/// A hit enemy waiting for its ghost bullet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingKill {
    pub id: PendingKillId,
    pub target: EntityId,
    pub kind: EntityType,
    pub explosion_color: u32,
    pub lane: usize,
    /// Bullet's visual depth at impact; the ghost starts here
    pub ghost_start_depth: f32,
    /// Animation time accumulated by presentation
    pub elapsed_ms: f32,
    /// Tanks: the side still standing when the lethal hit landed
    pub side: Option<TankSide>,
}

#[derive(Debug, Clone)]
pub struct CollisionResolver {
    pending: Vec<PendingKill>,
    next_pending: u32,
    rng: Pcg32,
}

/// Score multiplier for hits far from the player
fn distance_bonus(target: &Entity, scoring: &ScoringConfig) -> f32 {
    if target.depth >= scoring.far_kill_depth {
        scoring.far_kill_bonus
    } else {
        1.0
    }
}

fn explosion(target: &Entity, depth: f32, side: Option<TankSide>, partial: bool) -> Explosion {
    let kind = target.entity_type();
    let color = if partial { colors::TANK_DAMAGED } else { kind.color() };
    Explosion {
        lane: target.lane,
        depth,
        color,
        kind,
        side,
        partial,
    }
}

impl CollisionResolver {
    pub fn new(rng_state: &RngState) -> Self {
        Self {
            pending: Vec::new(),
            next_pending: 1,
            rng: rng_state.to_rng(),
        }
    }

    /// Queued pending kills, oldest first
    pub fn pending(&self) -> &[PendingKill] {
        &self.pending
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// One check pass over every live bullet.
    ///
    /// `bullet_progress` / `world_progress` are each clock's progress through
    /// its period at the moment of the check, used to place explosions and
    /// ghost bullets where they are drawn.
    pub fn resolve(
        &mut self,
        registry: &mut EntityRegistry,
        state: &mut GameState,
        scoring: &ScoringConfig,
        bullet_progress: f32,
        world_progress: f32,
        events: &mut Vec<GameEvent>,
    ) {
        if state.is_game_over() {
            return;
        }

        for bi in 0..registry.bullets.len() {
            let bullet = &registry.bullets[bi];
            if !bullet.alive {
                continue;
            }
            let cell = depth_cell(bullet.depth);
            let lane = bullet.lane;
            let impact_depth = bullet.visual_depth(bullet_progress);

            let deflector = registry
                .walls
                .iter_mut()
                .chain(registry.double_walls.iter_mut())
                .find(|w| w.alive && depth_cell(w.depth) == cell && w.occupies(lane))
                .or_else(|| {
                    registry.enemies.iter_mut().find(|e| {
                        e.is_collidable()
                            && e.is_shielded()
                            && depth_cell(e.depth) == cell
                            && e.lane == lane
                    })
                });
            if let Some(obstacle) = deflector {
                obstacle.flash();
                events.push(GameEvent::WallDeflect {
                    lane,
                    depth: obstacle.visual_depth(world_progress),
                    kind: obstacle.entity_type(),
                });
                registry.bullets[bi].kill();
                continue;
            }

            let Some(ti) = registry
                .enemies
                .iter()
                .position(|e| e.is_collidable() && depth_cell(e.depth) == cell && e.lane == lane)
            else {
                continue;
            };
            registry.bullets[bi].kill();

            match registry.enemies[ti].entity_type() {
                EntityType::Heart => {
                    self.collect_heart(registry, ti, state, world_progress, events)
                }
                EntityType::Bomb => {
                    self.detonate_bomb(registry, ti, state, scoring, world_progress, events)
                }
                EntityType::Tank => self.hit_tank(
                    registry,
                    ti,
                    state,
                    scoring,
                    impact_depth,
                    world_progress,
                    events,
                ),
                _ => self.kill_enemy(registry, ti, state, scoring, impact_depth, events),
            }
        }
    }

    fn collect_heart(
        &mut self,
        registry: &mut EntityRegistry,
        ti: usize,
        state: &mut GameState,
        world_progress: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let heart = &mut registry.enemies[ti];
        heart.kill();
        state.heal_full();
        let depth = heart.visual_depth(world_progress);
        events.push(GameEvent::HeartCollect {
            lane: heart.lane,
            depth,
        });
        events.push(GameEvent::Explosion(explosion(heart, depth, None, false)));
    }

    /// Bomb goes off and takes every other live, not-yet-dying enemy with it
    fn detonate_bomb(
        &mut self,
        registry: &mut EntityRegistry,
        ti: usize,
        state: &mut GameState,
        scoring: &ScoringConfig,
        world_progress: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let bomb = &mut registry.enemies[ti];
        bomb.kill();
        let bonus = distance_bonus(bomb, scoring);
        state.add_score(scoring.bomb as f32 * bonus);
        events.push(GameEvent::Explosion(explosion(
            bomb,
            bomb.visual_depth(world_progress),
            None,
            false,
        )));

        let mut chained = 0usize;
        for (i, e) in registry.enemies.iter_mut().enumerate() {
            if i == ti || !e.is_collidable() {
                continue;
            }
            e.kill();
            state.add_score(scoring.chain_kill as f32);
            events.push(GameEvent::Explosion(explosion(
                e,
                e.visual_depth(world_progress),
                None,
                false,
            )));
            chained += 1;
        }

        // Ghosts still in flight are overtaken by the blast
        let superseded: Vec<PendingKillId> = self.pending.iter().map(|p| p.id).collect();
        for id in superseded {
            self.finalize(id, registry, world_progress, events);
        }

        state.bump_multiplier(scoring.chain_multiplier_step);
        log::debug!("Bomb chain: {} enemies destroyed", chained);
    }

    #[allow(clippy::too_many_arguments)]
    fn hit_tank(
        &mut self,
        registry: &mut EntityRegistry,
        ti: usize,
        state: &mut GameState,
        scoring: &ScoringConfig,
        impact_depth: f32,
        world_progress: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let struck = if self.rng.random_bool(0.5) {
            TankSide::Left
        } else {
            TankSide::Right
        };
        let tank = &mut registry.enemies[ti];
        let earlier_side = match tank.kind {
            EntityKind::Tank { hit_side, .. } => hit_side,
            _ => None,
        };
        let bonus = distance_bonus(tank, scoring);

        if tank.hit(struck) {
            // Stay resident until the ghost bullet lands
            tank.alive = true;
            tank.pending_kill = true;
            state.add_score(scoring.tank_kill as f32 * bonus);
            let surviving = earlier_side.map(TankSide::opposite).unwrap_or(struck);
            self.queue(registry.enemies[ti].clone(), impact_depth, Some(surviving), events);
        } else {
            state.add_score(scoring.tank_partial as f32 * bonus);
            events.push(GameEvent::Explosion(explosion(
                tank,
                tank.visual_depth(world_progress),
                Some(struck),
                true,
            )));
        }
    }

    /// Regular kill path: enemies, vulnerable phase enemies, spirals
    fn kill_enemy(
        &mut self,
        registry: &mut EntityRegistry,
        ti: usize,
        state: &mut GameState,
        scoring: &ScoringConfig,
        impact_depth: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let target = &mut registry.enemies[ti];
        let bonus = distance_bonus(target, scoring);
        state.add_score(scoring.enemy as f32 * bonus);
        state.bump_multiplier(scoring.multiplier_step);

        if target.is_mid_drift() {
            // Explodes where the drift ends, on the next world tick
            target.dying = true;
            return;
        }
        target.pending_kill = true;
        let snapshot = target.clone();
        self.queue(snapshot, impact_depth, None, events);
    }

    fn queue(
        &mut self,
        target: Entity,
        ghost_start_depth: f32,
        side: Option<TankSide>,
        events: &mut Vec<GameEvent>,
    ) {
        let id = PendingKillId(self.next_pending);
        self.next_pending += 1;
        let kind = target.entity_type();
        self.pending.push(PendingKill {
            id,
            target: target.id,
            kind,
            explosion_color: kind.color(),
            lane: target.lane,
            ghost_start_depth,
            elapsed_ms: 0.0,
            side,
        });
        events.push(GameEvent::GhostLaunched {
            pending: id,
            target: target.id,
            lane: target.lane,
            from_depth: ghost_start_depth,
        });
    }

    /// Complete a pending kill: the target dies and explodes where it is now
    /// drawn. Returns false if no such record exists.
    pub fn finalize(
        &mut self,
        id: PendingKillId,
        registry: &mut EntityRegistry,
        world_progress: f32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let Some(pos) = self.pending.iter().position(|p| p.id == id) else {
            return false;
        };
        let record = self.pending.remove(pos);
        if let Some(target) = registry.enemy_mut(record.target) {
            target.pending_kill = false;
            target.kill();
            events.push(GameEvent::Explosion(Explosion {
                lane: target.lane,
                depth: target.visual_depth(world_progress),
                color: record.explosion_color,
                kind: record.kind,
                side: record.side,
                partial: false,
            }));
        }
        true
    }

    /// Advance every ghost animation by `dt_ms`; finalize those that arrived.
    /// Returns how many were finalized.
    pub fn advance_pending(
        &mut self,
        dt_ms: f32,
        travel_ms: f32,
        registry: &mut EntityRegistry,
        world_progress: f32,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        let mut arrived = Vec::new();
        for record in &mut self.pending {
            record.elapsed_ms += dt_ms.max(0.0);
            if record.elapsed_ms >= travel_ms {
                arrived.push(record.id);
            }
        }
        for &id in &arrived {
            self.finalize(id, registry, world_progress, events);
        }
        arrived.len()
    }

    /// Finalize pending kills whose target has left the tunnel or vanished
    pub fn finalize_stale(
        &mut self,
        registry: &mut EntityRegistry,
        world_progress: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let stale: Vec<PendingKillId> = self
            .pending
            .iter()
            .filter(|p| registry.enemy(p.target).is_none_or(|e| e.past_player()))
            .map(|p| p.id)
            .collect();
        for id in stale {
            self.finalize(id, registry, world_progress, events);
        }
    }
}
