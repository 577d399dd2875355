use std::collections::BTreeMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

/// Bidirectional mapping between simulation ids (u64) and ECS entities.
///
/// The engine reads it to resolve cross-empire references carried as sim ids
/// (an overlord in `EmpireDiplomacy`, event participants); the embedding
/// simulation maintains it as entities spawn.
#[derive(Resource, Debug, Clone, Default)]
pub struct SimEntityMap {
    to_ecs: BTreeMap<u64, Entity>,
    to_sim: BTreeMap<Entity, u64>,
}

impl SimEntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping. Panics if the sim id is already registered.
    pub fn insert(&mut self, sim_id: u64, entity: Entity) {
        let prev = self.to_ecs.insert(sim_id, entity);
        assert!(prev.is_none(), "duplicate sim_id {sim_id} in SimEntityMap");
        self.to_sim.insert(entity, sim_id);
    }

    /// Look up an ECS entity by sim id.
    pub fn get_entity(&self, sim_id: u64) -> Option<Entity> {
        self.to_ecs.get(&sim_id).copied()
    }

    /// Look up a sim id by ECS entity.
    pub fn get_sim(&self, entity: Entity) -> Option<u64> {
        self.to_sim.get(&entity).copied()
    }

    pub fn len(&self) -> usize {
        self.to_ecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_ecs.is_empty()
    }
}
