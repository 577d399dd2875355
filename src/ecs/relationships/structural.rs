use std::ops::Deref;

use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

// ---------------------------------------------------------------------------
// OwnedBy — colony/fleet/regiment → empire
// ---------------------------------------------------------------------------

#[derive(Component, Clone, Debug)]
#[relationship(relationship_target = OwnedBySources)]
pub struct OwnedBy(pub Entity);

#[derive(Component, Default, Debug)]
#[relationship_target(relationship = OwnedBy)]
pub struct OwnedBySources(Vec<Entity>);

impl Deref for OwnedBySources {
    type Target = [Entity];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// StationedAt — fleet → colony (own or foreign)
// ---------------------------------------------------------------------------

#[derive(Component, Clone, Debug)]
#[relationship(relationship_target = StationedAtSources)]
pub struct StationedAt(pub Entity);

#[derive(Component, Default, Debug)]
#[relationship_target(relationship = StationedAt)]
pub struct StationedAtSources(Vec<Entity>);

impl Deref for StationedAtSources {
    type Target = [Entity];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// InFleet — ship → fleet
// ---------------------------------------------------------------------------

#[derive(Component, Clone, Debug)]
#[relationship(relationship_target = InFleetShips)]
pub struct InFleet(pub Entity);

#[derive(Component, Default, Debug)]
#[relationship_target(relationship = InFleet)]
pub struct InFleetShips(Vec<Entity>);

impl Deref for InFleetShips {
    type Target = [Entity];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// GarrisonedAt — regiment → colony
// ---------------------------------------------------------------------------

#[derive(Component, Clone, Debug)]
#[relationship(relationship_target = GarrisonedAtSources)]
pub struct GarrisonedAt(pub Entity);

#[derive(Component, Default, Debug)]
#[relationship_target(relationship = GarrisonedAt)]
pub struct GarrisonedAtSources(Vec<Entity>);

impl Deref for GarrisonedAtSources {
    type Target = [Entity];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// LocatedIn — structure → colony
// ---------------------------------------------------------------------------

#[derive(Component, Clone, Debug)]
#[relationship(relationship_target = LocatedInSources)]
pub struct LocatedIn(pub Entity);

#[derive(Component, Default, Debug)]
#[relationship_target(relationship = LocatedIn)]
pub struct LocatedInSources(Vec<Entity>);

impl Deref for LocatedInSources {
    type Target = [Entity];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
