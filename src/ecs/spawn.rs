use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::*;
use crate::ecs::relationships::{GarrisonedAt, InFleet, LocatedIn, OwnedBy, StationedAt};
use crate::ecs::resources::SimEntityMap;

fn register(world: &mut World, id: u64, entity: Entity) {
    if let Some(mut map) = world.get_resource_mut::<SimEntityMap>() {
        map.insert(id, entity);
    }
}

/// Spawn an empire with default budget, posture, research, and snapshot
/// state. Ledger and diplomacy are caller-supplied since scenarios differ
/// mostly in starting balance and treaty shape.
pub fn spawn_empire(
    world: &mut World,
    id: u64,
    name: String,
    turn: u64,
    ledger: EmpireLedger,
    diplomacy: EmpireDiplomacy,
) -> Entity {
    let entity = world
        .spawn((
            SimEntity::new(id, name, turn),
            Empire,
            ledger,
            EmpireBudget::default(),
            EmpirePosture::default(),
            diplomacy,
            EmpireResearch::default(),
            LedgerSnapshot::default(),
        ))
        .id();
    register(world, id, entity);
    entity
}

pub fn spawn_colony(
    world: &mut World,
    id: u64,
    name: String,
    turn: u64,
    owner: Entity,
    economy: ColonyEconomy,
) -> Entity {
    let entity = world
        .spawn((
            SimEntity::new(id, name, turn),
            Colony,
            economy,
            OwnedBy(owner),
        ))
        .id();
    register(world, id, entity);
    entity
}

pub fn spawn_fleet(
    world: &mut World,
    id: u64,
    name: String,
    turn: u64,
    owner: Entity,
    station: Entity,
    state: FleetState,
) -> Entity {
    let entity = world
        .spawn((
            SimEntity::new(id, name, turn),
            Fleet,
            state,
            OwnedBy(owner),
            StationedAt(station),
        ))
        .id();
    register(world, id, entity);
    entity
}

pub fn spawn_ship(
    world: &mut World,
    id: u64,
    name: String,
    turn: u64,
    fleet: Entity,
    state: ShipState,
) -> Entity {
    let entity = world
        .spawn((SimEntity::new(id, name, turn), Ship, state, InFleet(fleet)))
        .id();
    register(world, id, entity);
    entity
}

pub fn spawn_regiment(
    world: &mut World,
    id: u64,
    name: String,
    turn: u64,
    owner: Entity,
    colony: Entity,
    state: RegimentState,
) -> Entity {
    let entity = world
        .spawn((
            SimEntity::new(id, name, turn),
            Regiment,
            state,
            OwnedBy(owner),
            GarrisonedAt(colony),
        ))
        .id();
    register(world, id, entity);
    entity
}

pub fn spawn_structure(
    world: &mut World,
    id: u64,
    name: String,
    turn: u64,
    colony: Entity,
    state: StructureState,
) -> Entity {
    let entity = world
        .spawn((
            SimEntity::new(id, name, turn),
            Structure,
            state,
            LocatedIn(colony),
        ))
        .id();
    register(world, id, entity);
    entity
}
