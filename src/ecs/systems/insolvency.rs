//! Insolvency resolution — fourth pipeline stage.
//!
//! Runs after the ledger settles. When an empire is in debt, over the
//! sustainability threshold, or over a force-class maintenance cap, it
//! disbands assets by descending value until the books balance:
//!
//! - Debt protocol (balance < 0): cut in sorted order; paying assets come
//!   first, so a zero-effective-upkeep asset is only ever a last resort.
//! - Cap protocol (balance >= 0): cut only inside an over-cap class until
//!   its running upkeep is back at/below cap; free assets are skipped.
//!
//! Each cut refunds a fraction of the asset's base cost. If the empire is
//! still bleeding, deep in debt, or defenseless afterwards, upkeep-bearing
//! structures liquidate next (Economy class protected) until the balance
//! clears the restart threshold.
//!
//! Exclusive system: reads the world into plain rows, decides, then applies
//! soft-deletes and refunds. No-op when no beneficial cut exists.

use std::collections::BTreeMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::query::With;
use bevy_ecs::world::World;
use rand::seq::SliceRandom;
use serde_json::json;
use tracing::debug;

use crate::ecs::clock::SimClock;
use crate::ecs::components::{
    Colony, ColonyEconomy, Empire, EmpireLedger, Fleet, FleetState, LedgerSnapshot, Regiment,
    RegimentState, Ship, ShipState, SimEntity, Structure, StructureState,
};
use crate::ecs::relationships::{GarrisonedAt, InFleet, LocatedIn, OwnedBy, StationedAt};
use crate::ecs::resources::{EventLog, SimRng, scoped_rng};
use crate::model::config::UpkeepConfig;
use crate::model::{EconEventKind, EconomyConfig, ForceClass, StructureClass};

/// Where a disband candidate lives. Fleets are destroyed when their last
/// living ship goes; a garrison is just a colony slot and survives empty.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ContainerRef {
    Fleet(Entity),
    Garrison(Entity),
}

#[derive(Debug, Clone)]
struct DisbandCandidate {
    asset: Entity,
    asset_id: u64,
    effective_upkeep: f64,
    raw_upkeep: f64,
    cost: f64,
    container: ContainerRef,
    location: Entity,
    class: ForceClass,
}

#[derive(Debug)]
struct EmpireRow {
    entity: Entity,
    id: u64,
    balance: f64,
    multiplier: f64,
    gross_income: f64,
    total_upkeep: f64,
}

fn oversize_scale(fleet_count: usize, colony_count: usize, config: &UpkeepConfig) -> f64 {
    let limit = colony_count as f64 * config.fleets_per_colony;
    let overage = fleet_count as f64 - limit;
    if overage <= 0.0 {
        1.0
    } else {
        1.0 + (overage * config.oversize_penalty_per_fleet).min(config.oversize_penalty_cap)
    }
}

pub fn resolve_insolvency(world: &mut World) {
    let turn = world.resource::<SimClock>().turn;
    let seed = world.resource::<SimRng>().seed;
    let config = world.resource::<EconomyConfig>().clone();

    // -- Gather: flatten the world into plain rows --------------------------

    let mut empires: Vec<EmpireRow> = Vec::new();
    {
        let mut q = world
            .query_filtered::<(Entity, &SimEntity, &EmpireLedger, &LedgerSnapshot), With<Empire>>();
        for (entity, sim, ledger, snapshot) in q.iter(world) {
            if !sim.is_alive() {
                continue;
            }
            empires.push(EmpireRow {
                entity,
                id: sim.id,
                balance: ledger.balance,
                multiplier: ledger.maintenance_multiplier,
                gross_income: snapshot.gross_income(),
                total_upkeep: snapshot.total_upkeep(),
            });
        }
    }
    empires.sort_by_key(|row| row.id);

    struct ColonyRow {
        owner: Entity,
        capacity: usize,
    }
    let mut colonies: BTreeMap<Entity, ColonyRow> = BTreeMap::new();
    {
        let mut q =
            world.query_filtered::<(Entity, &SimEntity, &ColonyEconomy, &OwnedBy), With<Colony>>();
        for (entity, sim, economy, owned) in q.iter(world) {
            if sim.is_alive() {
                colonies.insert(
                    entity,
                    ColonyRow {
                        owner: owned.0,
                        capacity: economy.garrison_capacity,
                    },
                );
            }
        }
    }

    struct FleetRow {
        owner: Entity,
        in_orbit: bool,
        station: Entity,
    }
    let mut fleets: BTreeMap<Entity, FleetRow> = BTreeMap::new();
    {
        let mut q = world
            .query_filtered::<(Entity, &SimEntity, &FleetState, &OwnedBy, &StationedAt), With<Fleet>>();
        for (entity, sim, state, owned, station) in q.iter(world) {
            if sim.is_alive() {
                fleets.insert(
                    entity,
                    FleetRow {
                        owner: owned.0,
                        in_orbit: state.in_orbit,
                        station: station.0,
                    },
                );
            }
        }
    }

    struct ShipRow {
        entity: Entity,
        id: u64,
        fleet: Entity,
        cost: f64,
        upkeep: f64,
    }
    let mut ships: Vec<ShipRow> = Vec::new();
    let mut fleet_ship_counts: BTreeMap<Entity, usize> = BTreeMap::new();
    {
        let mut q = world.query_filtered::<(Entity, &SimEntity, &ShipState, &InFleet), With<Ship>>();
        for (entity, sim, state, in_fleet) in q.iter(world) {
            if !sim.is_alive() {
                continue;
            }
            ships.push(ShipRow {
                entity,
                id: sim.id,
                fleet: in_fleet.0,
                cost: state.cost,
                upkeep: state.upkeep,
            });
            *fleet_ship_counts.entry(in_fleet.0).or_insert(0) += 1;
        }
    }

    struct RegimentRow {
        entity: Entity,
        id: u64,
        owner: Entity,
        colony: Entity,
        cost: f64,
        upkeep: f64,
    }
    let mut regiments: Vec<RegimentRow> = Vec::new();
    {
        let mut q = world
            .query_filtered::<(Entity, &SimEntity, &RegimentState, &OwnedBy, &GarrisonedAt), With<Regiment>>();
        for (entity, sim, state, owned, garrisoned) in q.iter(world) {
            if !sim.is_alive() {
                continue;
            }
            regiments.push(RegimentRow {
                entity,
                id: sim.id,
                owner: owned.0,
                colony: garrisoned.0,
                cost: state.cost,
                upkeep: state.upkeep,
            });
        }
    }

    struct StructureRow {
        entity: Entity,
        id: u64,
        colony: Entity,
        class: StructureClass,
        cost: f64,
        upkeep: f64,
    }
    let mut structures: Vec<StructureRow> = Vec::new();
    {
        let mut q = world
            .query_filtered::<(Entity, &SimEntity, &StructureState, &LocatedIn), With<Structure>>();
        for (entity, sim, state, located) in q.iter(world) {
            if !sim.is_alive() {
                continue;
            }
            structures.push(StructureRow {
                entity,
                id: sim.id,
                colony: located.0,
                class: state.class,
                cost: state.cost,
                upkeep: state.upkeep,
            });
        }
    }

    let mut owned_fleet_counts: BTreeMap<Entity, usize> = BTreeMap::new();
    for row in fleets.values() {
        *owned_fleet_counts.entry(row.owner).or_insert(0) += 1;
    }
    let mut owned_colony_counts: BTreeMap<Entity, usize> = BTreeMap::new();
    for row in colonies.values() {
        *owned_colony_counts.entry(row.owner).or_insert(0) += 1;
    }

    // -- Decide and apply, one empire at a time -----------------------------

    for empire in &empires {
        let scale = oversize_scale(
            owned_fleet_counts.get(&empire.entity).copied().unwrap_or(0),
            owned_colony_counts.get(&empire.entity).copied().unwrap_or(0),
            &config.upkeep,
        ) * empire.multiplier;

        // Ship candidates.
        let mut candidates: Vec<DisbandCandidate> = Vec::new();
        for ship in &ships {
            let Some(fleet) = fleets.get(&ship.fleet) else {
                continue;
            };
            if fleet.owner != empire.entity {
                continue;
            }
            let orbit = if fleet.in_orbit {
                config.upkeep.orbit_discount
            } else {
                1.0
            };
            candidates.push(DisbandCandidate {
                asset: ship.entity,
                asset_id: ship.id,
                effective_upkeep: ship.upkeep
                    * orbit
                    * config.upkeep.fleet_maintenance_scalar
                    * scale,
                raw_upkeep: ship.upkeep,
                cost: ship.cost,
                container: ContainerRef::Fleet(ship.fleet),
                location: fleet.station,
                class: ForceClass::Navy,
            });
        }

        // Regiment candidates: the garrison discount goes to the most
        // expensive regiments within colony capacity, like the aggregator.
        let mut garrisons: BTreeMap<Entity, Vec<&RegimentRow>> = BTreeMap::new();
        for regiment in regiments.iter().filter(|r| r.owner == empire.entity) {
            garrisons.entry(regiment.colony).or_default().push(regiment);
        }
        for (colony, mut group) in garrisons {
            let capacity = colonies.get(&colony).map(|c| c.capacity).unwrap_or(0);
            group.sort_by(|a, b| b.cost.total_cmp(&a.cost));
            for (slot, regiment) in group.into_iter().enumerate() {
                let discount = if slot < capacity {
                    config.upkeep.garrison_discount
                } else {
                    1.0
                };
                candidates.push(DisbandCandidate {
                    asset: regiment.entity,
                    asset_id: regiment.id,
                    effective_upkeep: regiment.upkeep * discount * scale,
                    raw_upkeep: regiment.upkeep,
                    cost: regiment.cost,
                    container: ContainerRef::Garrison(colony),
                    location: colony,
                    class: ForceClass::Army,
                });
            }
        }

        let mut running: BTreeMap<ForceClass, f64> = BTreeMap::new();
        for candidate in &candidates {
            *running.entry(candidate.class).or_insert(0.0) += candidate.effective_upkeep;
        }
        let cap_of = |class: ForceClass| empire.gross_income * config.cap_for(class);
        let over_cap_at_start: BTreeMap<ForceClass, bool> = [ForceClass::Navy, ForceClass::Army]
            .into_iter()
            .map(|class| {
                (
                    class,
                    running.get(&class).copied().unwrap_or(0.0) > cap_of(class),
                )
            })
            .collect();

        let triggered = empire.balance < 0.0
            || empire.total_upkeep > config.insolvency.sustainability_threshold * empire.gross_income
            || over_cap_at_start.values().any(|&over| over);
        if !triggered {
            continue;
        }

        // Seeded tie-breaks: shuffle, then stable-sort on the cut priority.
        let mut rng = scoped_rng(seed, "insolvency", turn, empire.id);
        candidates.shuffle(&mut rng);
        candidates.sort_by(|a, b| {
            let key_a = (a.effective_upkeep > 0.0, over_cap_at_start[&a.class]);
            let key_b = (b.effective_upkeep > 0.0, over_cap_at_start[&b.class]);
            key_b
                .cmp(&key_a)
                .then(b.effective_upkeep.total_cmp(&a.effective_upkeep))
                .then(b.raw_upkeep.total_cmp(&a.raw_upkeep))
        });

        let mut balance = empire.balance;
        let mut cut_assets: Vec<Entity> = Vec::new();
        let mut dead_fleets: Vec<Entity> = Vec::new();
        let mut upkeep_saved = 0.0;
        let mut refunds = 0.0;
        let mut remaining = candidates.len();

        for candidate in &candidates {
            let within_caps = [ForceClass::Navy, ForceClass::Army].into_iter().all(|class| {
                running.get(&class).copied().unwrap_or(0.0) <= cap_of(class)
            });
            if balance >= 0.0 && within_caps {
                break;
            }
            let cut = if balance < 0.0 {
                // Debt protocol: sorted order already puts every paying
                // candidate ahead of the free ones.
                true
            } else {
                running.get(&candidate.class).copied().unwrap_or(0.0) > cap_of(candidate.class)
                    && candidate.effective_upkeep > 0.0
            };
            if !cut {
                continue;
            }

            let refund = candidate.cost * config.insolvency.disband_refund;
            balance += refund;
            refunds += refund;
            upkeep_saved += candidate.effective_upkeep;
            *running.entry(candidate.class).or_insert(0.0) -= candidate.effective_upkeep;
            remaining -= 1;
            cut_assets.push(candidate.asset);
            debug!(
                empire = empire.id,
                asset = candidate.asset_id,
                class = %candidate.class,
                location = ?candidate.location,
                refund,
                "disband"
            );

            if let ContainerRef::Fleet(fleet) = candidate.container {
                let count = fleet_ship_counts.entry(fleet).or_insert(0);
                *count = count.saturating_sub(1);
                if *count == 0 {
                    dead_fleets.push(fleet);
                }
            }
        }

        if !cut_assets.is_empty() {
            world.resource_mut::<EventLog>().record(
                EconEventKind::InsolvencySweep,
                turn,
                empire.id,
                format!("insolvency pass disbands {} assets", cut_assets.len()),
                json!({
                    "cut": cut_assets.len(),
                    "upkeep_saved": upkeep_saved,
                    "refunds": refunds,
                }),
            );
        }

        // -- Infrastructure liquidation (secondary) -------------------------

        let flow = empire.gross_income - (empire.total_upkeep - upkeep_saved);
        let bleeding = balance < 0.0 && flow < 0.0;
        let deep_debt = balance < config.insolvency.deep_debt_floor;
        let defenseless = balance < 0.0 && remaining == 0;

        let mut sold: Vec<Entity> = Vec::new();
        if bleeding || deep_debt || defenseless {
            let mut sellable: Vec<&StructureRow> = structures
                .iter()
                .filter(|s| {
                    s.upkeep > 0.0
                        && s.class != StructureClass::Economy
                        && colonies
                            .get(&s.colony)
                            .is_some_and(|c| c.owner == empire.entity)
                })
                .collect();
            sellable.sort_by(|a, b| b.upkeep.total_cmp(&a.upkeep).then(a.id.cmp(&b.id)));

            let mut sale_refunds = 0.0;
            let mut upkeep_freed = 0.0;
            for structure in sellable {
                if balance > config.insolvency.restart_threshold {
                    break;
                }
                let refund = structure.cost * config.insolvency.disband_refund;
                balance += refund;
                sale_refunds += refund;
                upkeep_freed += structure.upkeep;
                sold.push(structure.entity);
                debug!(empire = empire.id, structure = structure.id, refund, "liquidate");
            }
            if !sold.is_empty() {
                world.resource_mut::<EventLog>().record(
                    EconEventKind::Liquidation,
                    turn,
                    empire.id,
                    format!("liquidation sells {} structures", sold.len()),
                    json!({
                        "sold": sold.len(),
                        "refunds": sale_refunds,
                        "upkeep_freed": upkeep_freed,
                    }),
                );
            }
        }

        // -- Apply ----------------------------------------------------------

        if let Some(mut ledger) = world.get_mut::<EmpireLedger>(empire.entity) {
            ledger.balance = balance;
        }
        for entity in cut_assets.into_iter().chain(sold).chain(dead_fleets) {
            if let Some(mut sim) = world.get_mut::<SimEntity>(entity) {
                sim.kill(turn);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
