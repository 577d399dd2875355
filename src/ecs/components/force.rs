use bevy_ecs::component::Component;

/// Mobile NAVY container. A fleet holds ships via the `InFleet`
/// relationship and sits at a colony via `StationedAt`.
#[derive(Component, Debug, Clone, Default)]
pub struct FleetState {
    /// In orbit over a friendly colony — ships pay discounted upkeep.
    pub in_orbit: bool,
}

/// One ship asset inside a fleet.
#[derive(Component, Debug, Clone, Default)]
pub struct ShipState {
    /// Original build cost; disbanding refunds a fraction of it.
    pub cost: f64,
    pub upkeep: f64,
}

/// One ARMY asset garrisoned at a colony via `GarrisonedAt`.
#[derive(Component, Debug, Clone, Default)]
pub struct RegimentState {
    pub cost: f64,
    pub upkeep: f64,
}
