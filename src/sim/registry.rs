//! Entity collections owned by the session
//!
//! Four unordered collections, identified by membership only. Dead entities
//! stay resident through the tick handler whose cleanup first sees them, so
//! presentation can still reference them; a cleanup in any later handler
//! drops them.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityType};
use crate::config::TunnelConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRegistry {
    /// Enemy-class entities: enemies, tanks, phase, spiral, bombs, hearts
    pub enemies: Vec<Entity>,
    pub bullets: Vec<Entity>,
    pub walls: Vec<Entity>,
    pub double_walls: Vec<Entity>,
    /// Next entity ID
    next_id: u32,
    /// Tick handler invocations so far
    #[serde(skip)]
    pass: u64,
}

/// One cleanup: drop entities an earlier tick pass saw dead, and stamp the
/// newly dead ones with the current pass.
fn sweep(list: &mut Vec<Entity>, pass: u64) {
    list.retain(|e| e.alive || e.dead_since.is_none_or(|seen| seen == pass));
    for e in list.iter_mut().filter(|e| !e.alive && e.dead_since.is_none()) {
        e.dead_since = Some(pass);
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Drop everything (session restart)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Insert into the collection matching the entity's type
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        match entity.entity_type() {
            EntityType::Bullet => self.bullets.push(entity),
            EntityType::Wall => self.walls.push(entity),
            EntityType::DoubleWall => self.double_walls.push(entity),
            _ => self.enemies.push(entity),
        }
        id
    }

    /// Start a tick pass. Cleanups within one pass share its grace.
    pub fn begin_pass(&mut self) {
        self.pass += 1;
    }

    /// Create and insert a spawn-ring entity
    pub fn spawn(
        &mut self,
        ty: EntityType,
        lane: usize,
        config: &TunnelConfig,
        spin_dir: i8,
    ) -> EntityId {
        let id = self.next_entity_id();
        self.add(Entity::spawn(id, ty, lane, config, spin_dir))
    }

    /// Create and insert a bullet
    pub fn fire_bullet(&mut self, lane: usize, depth: f32) -> EntityId {
        let id = self.next_entity_id();
        self.add(Entity::bullet(id, lane, depth))
    }

    pub fn remove_dead_bullets(&mut self) {
        sweep(&mut self.bullets, self.pass);
    }

    pub fn remove_dead_enemies(&mut self) {
        sweep(&mut self.enemies, self.pass);
    }

    /// Cleanup over enemies, walls and double walls
    pub fn remove_dead_obstacles(&mut self) {
        sweep(&mut self.enemies, self.pass);
        sweep(&mut self.walls, self.pass);
        sweep(&mut self.double_walls, self.pass);
    }

    /// Alive single and double walls
    pub fn live_wall_count(&self) -> usize {
        self.walls
            .iter()
            .chain(self.double_walls.iter())
            .filter(|w| w.alive)
            .count()
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Entity> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Every resident entity, alive or not
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.enemies
            .iter()
            .chain(self.bullets.iter())
            .chain(self.walls.iter())
            .chain(self.double_walls.iter())
    }

    /// World-clock entities (everything but bullets)
    pub fn obstacles_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.enemies
            .iter_mut()
            .chain(self.walls.iter_mut())
            .chain(self.double_walls.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.enemies.len() + self.bullets.len() + self.walls.len() + self.double_walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_routes_by_type() {
        let cfg = TunnelConfig::default();
        let mut reg = EntityRegistry::new();
        reg.spawn(EntityType::Enemy, 0, &cfg, 1);
        reg.spawn(EntityType::Heart, 1, &cfg, 1);
        reg.spawn(EntityType::Wall, 2, &cfg, 1);
        reg.spawn(EntityType::DoubleWall, 3, &cfg, 1);
        reg.fire_bullet(0, 0.2);

        assert_eq!(reg.enemies.len(), 2);
        assert_eq!(reg.walls.len(), 1);
        assert_eq!(reg.double_walls.len(), 1);
        assert_eq!(reg.bullets.len(), 1);
        assert_eq!(reg.live_wall_count(), 2);
        assert_eq!(reg.len(), 5);
    }

    #[test]
    fn test_ids_are_unique() {
        let cfg = TunnelConfig::default();
        let mut reg = EntityRegistry::new();
        let a = reg.spawn(EntityType::Enemy, 0, &cfg, 1);
        let b = reg.spawn(EntityType::Enemy, 0, &cfg, 1);
        let c = reg.fire_bullet(0, 0.2);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(a, EntityId(1));
    }

    #[test]
    fn test_dead_entity_survives_its_pass() {
        let cfg = TunnelConfig::default();
        let mut reg = EntityRegistry::new();
        let id = reg.spawn(EntityType::Enemy, 0, &cfg, 1);
        reg.spawn(EntityType::Enemy, 1, &cfg, 1);
        reg.enemy_mut(id).unwrap().kill();

        reg.begin_pass();
        reg.remove_dead_enemies();
        reg.remove_dead_enemies();
        assert_eq!(reg.enemies.len(), 2, "same pass keeps the corpse");
        assert!(reg.enemy(id).is_some());

        reg.begin_pass();
        reg.remove_dead_enemies();
        assert_eq!(reg.enemies.len(), 1);
        assert!(reg.enemy(id).is_none());
    }

    #[test]
    fn test_corpse_seen_late_gets_its_own_pass() {
        let cfg = TunnelConfig::default();
        let mut reg = EntityRegistry::new();
        let id = reg.spawn(EntityType::Wall, 0, &cfg, 1);
        reg.begin_pass();
        reg.remove_dead_obstacles();

        reg.begin_pass();
        reg.walls[0].kill();
        reg.remove_dead_obstacles();
        assert_eq!(reg.walls[0].id, id);

        reg.begin_pass();
        reg.remove_dead_obstacles();
        assert!(reg.walls.is_empty());
    }

    #[test]
    fn test_alive_entities_never_swept() {
        let cfg = TunnelConfig::default();
        let mut reg = EntityRegistry::new();
        reg.spawn(EntityType::Wall, 0, &cfg, 1);
        for _ in 0..5 {
            reg.remove_dead_obstacles();
        }
        assert_eq!(reg.walls.len(), 1);
    }

    #[test]
    fn test_reset_clears_and_restarts_ids() {
        let cfg = TunnelConfig::default();
        let mut reg = EntityRegistry::new();
        reg.spawn(EntityType::Enemy, 0, &cfg, 1);
        reg.reset();
        assert!(reg.is_empty());
        assert_eq!(reg.next_entity_id(), EntityId(1));
    }
}
