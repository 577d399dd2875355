//! Resource aggregation — first pipeline stage.
//!
//! Rebuilds every empire's `LedgerSnapshot` in place each cycle:
//! 1. colony production (structure bonuses, siege penalty, income floor)
//! 2. trade income from live partner count
//! 3. raid income from fleets parked on foreign colonies
//! 4. fleet / army / infrastructure upkeep with discounts
//! 5. oversize penalty and the empire's maintenance multiplier
//!
//! Read-only over world data; missing inputs contribute zero. Never fails.

use std::collections::{BTreeMap, BTreeSet};

use bevy_ecs::entity::Entity;
use bevy_ecs::query::With;
use bevy_ecs::system::{Query, Res};

use crate::ecs::components::{
    Colony, ColonyEconomy, Empire, EmpireDiplomacy, EmpireLedger, Fleet, FleetState,
    LedgerSnapshot, Regiment, RegimentState, Ship, ShipState, SimEntity, Structure, StructureState,
};
use crate::ecs::relationships::{GarrisonedAt, InFleet, LocatedIn, OwnedBy, StationedAt};
use crate::model::config::{IncomeConfig, UpkeepConfig};
use crate::model::{EconomyConfig, IncomeSource, UpkeepClass};

/// Per-empire accumulation scratch for one aggregation pass.
#[derive(Debug, Default)]
struct Accum {
    tax: f64,
    mining: f64,
    research: f64,
    infra_upkeep: f64,
    colony_count: usize,
    fleet_upkeep: f64,
    fleet_count: usize,
    raid: f64,
    army_upkeep: f64,
}

/// Oversize penalty multiplier: 1.0 within the fleet limit, capped linear
/// growth past it.
fn oversize_penalty(fleet_count: usize, colony_count: usize, config: &UpkeepConfig) -> f64 {
    let limit = colony_count as f64 * config.fleets_per_colony;
    let overage = fleet_count as f64 - limit;
    if overage <= 0.0 {
        return 1.0;
    }
    1.0 + (overage * config.oversize_penalty_per_fleet).min(config.oversize_penalty_cap)
}

/// Raid income for one fleet sitting on a foreign colony: proportional to
/// target value, capped per fleet, scaled linearly by fleet size up to full
/// strength.
fn raid_income(target_value: f64, ship_count: usize, config: &IncomeConfig) -> f64 {
    let base = (target_value * config.raid_rate).min(config.raid_cap_per_fleet);
    let strength = (ship_count as f64 / config.raid_full_strength.max(1) as f64).min(1.0);
    base * strength
}

/// Army upkeep for one garrison: regiments sorted by cost descending, the
/// top `capacity` pay the garrison discount, the rest full cost.
fn garrison_upkeep(regiments: &mut Vec<(f64, f64)>, capacity: usize, discount: f64) -> f64 {
    regiments.sort_by(|a, b| b.0.total_cmp(&a.0));
    regiments
        .iter()
        .enumerate()
        .map(|(slot, (_, upkeep))| {
            if slot < capacity {
                upkeep * discount
            } else {
                *upkeep
            }
        })
        .sum()
}

#[allow(clippy::type_complexity)]
pub fn rebuild_snapshots(
    config: Res<EconomyConfig>,
    mut empires: Query<
        (
            Entity,
            &SimEntity,
            &EmpireLedger,
            &EmpireDiplomacy,
            &mut LedgerSnapshot,
        ),
        With<Empire>,
    >,
    colonies: Query<(Entity, &SimEntity, &ColonyEconomy, &OwnedBy), With<Colony>>,
    fleets: Query<(Entity, &SimEntity, &FleetState, &OwnedBy, &StationedAt), With<Fleet>>,
    ships: Query<(&SimEntity, &ShipState, &InFleet), With<Ship>>,
    regiments: Query<(&SimEntity, &RegimentState, &OwnedBy, &GarrisonedAt), With<Regiment>>,
    structures: Query<(&SimEntity, &StructureState, &LocatedIn), With<Structure>>,
) {
    // Structure bonuses and infrastructure upkeep, grouped by colony.
    #[derive(Debug, Default)]
    struct ColonyBonuses {
        tax: f64,
        mining: f64,
        research: f64,
        upkeep: f64,
    }
    let mut bonuses: BTreeMap<Entity, ColonyBonuses> = BTreeMap::new();
    for (sim, state, located) in structures.iter() {
        if !sim.is_alive() {
            continue;
        }
        let entry = bonuses.entry(located.0).or_default();
        entry.tax += state.tax_bonus;
        entry.mining += state.mining_bonus;
        entry.research += state.research_bonus;
        entry.upkeep += state.upkeep;
    }

    // Living ship totals per fleet.
    let mut fleet_ships: BTreeMap<Entity, (f64, usize)> = BTreeMap::new();
    for (sim, state, in_fleet) in ships.iter() {
        if !sim.is_alive() {
            continue;
        }
        let entry = fleet_ships.entry(in_fleet.0).or_insert((0.0, 0));
        entry.0 += state.upkeep;
        entry.1 += 1;
    }

    // Colony owner and raid value index.
    struct ColonyInfo {
        owner: Entity,
        value: f64,
    }
    let mut colony_info: BTreeMap<Entity, ColonyInfo> = BTreeMap::new();

    let mut accum: BTreeMap<Entity, Accum> = BTreeMap::new();

    // Colony pass: production with bonuses, siege penalty, income floor.
    for (colony_entity, sim, economy, owned) in colonies.iter() {
        if !sim.is_alive() {
            continue;
        }
        let bonus = bonuses.get(&colony_entity);
        let (tax_bonus, mining_bonus, research_bonus, infra_upkeep) = bonus
            .map(|b| (b.tax, b.mining, b.research, b.upkeep))
            .unwrap_or((0.0, 0.0, 0.0, 0.0));

        let siege = if economy.under_siege {
            config.income.siege_penalty
        } else {
            1.0
        };
        let tax = (economy.tax_output + tax_bonus) * siege + config.income.min_colony_income;
        let mining = (economy.mining_output + mining_bonus) * siege;
        let research = (economy.research_output + research_bonus) * siege;

        colony_info.insert(
            colony_entity,
            ColonyInfo {
                owner: owned.0,
                value: economy.production_value(),
            },
        );

        let entry = accum.entry(owned.0).or_default();
        entry.tax += tax;
        entry.mining += mining;
        entry.research += research;
        entry.infra_upkeep += infra_upkeep;
        entry.colony_count += 1;
    }

    // Fleet pass: upkeep with orbit discount, raid income on foreign ground.
    for (fleet_entity, sim, state, owned, station) in fleets.iter() {
        if !sim.is_alive() {
            continue;
        }
        let (ship_upkeep, ship_count) = fleet_ships
            .get(&fleet_entity)
            .copied()
            .unwrap_or((0.0, 0));

        let orbit = if state.in_orbit {
            config.upkeep.orbit_discount
        } else {
            1.0
        };
        let entry = accum.entry(owned.0).or_default();
        entry.fleet_upkeep += ship_upkeep * orbit * config.upkeep.fleet_maintenance_scalar;
        entry.fleet_count += 1;

        if let Some(info) = colony_info.get(&station.0) {
            if info.owner != owned.0 {
                entry.raid += raid_income(info.value, ship_count, &config.income);
            }
        }
    }

    // Regiment pass: garrison groups per (owner, colony).
    let mut garrisons: BTreeMap<(Entity, Entity), Vec<(f64, f64)>> = BTreeMap::new();
    for (sim, state, owned, garrisoned) in regiments.iter() {
        if !sim.is_alive() {
            continue;
        }
        garrisons
            .entry((owned.0, garrisoned.0))
            .or_default()
            .push((state.cost, state.upkeep));
    }
    for ((owner, colony), mut group) in garrisons {
        let capacity = colonies
            .get(colony)
            .map(|(_, _, economy, _)| economy.garrison_capacity)
            .unwrap_or(0);
        let upkeep = garrison_upkeep(&mut group, capacity, config.upkeep.garrison_discount);
        accum.entry(owner).or_default().army_upkeep += upkeep;
    }

    // Live empire ids for the trade partner count.
    let living: BTreeSet<u64> = empires
        .iter()
        .filter(|(_, sim, _, _, _)| sim.is_alive())
        .map(|(_, sim, _, _, _)| sim.id)
        .collect();

    // Final pass: write snapshots.
    for (entity, sim, ledger, diplomacy, mut snapshot) in empires.iter_mut() {
        if !sim.is_alive() {
            continue;
        }
        snapshot.reset();
        let acc = accum.remove(&entity).unwrap_or_default();

        snapshot.add_income(IncomeSource::Tax, acc.tax);
        snapshot.add_income(IncomeSource::Mining, acc.mining);

        let partners = diplomacy
            .trade_partners
            .iter()
            .filter(|id| living.contains(id))
            .count();
        let trade_bonus = 1.0 + config.income.trade_partner_bonus * partners as f64;
        let trade =
            (acc.tax + acc.mining) * config.income.trade_income_multiplier * (trade_bonus - 1.0);
        snapshot.add_income(IncomeSource::Trade, trade);
        snapshot.add_income(IncomeSource::Raid, acc.raid);

        snapshot.add_upkeep(UpkeepClass::Fleet, acc.fleet_upkeep);
        snapshot.add_upkeep(UpkeepClass::Army, acc.army_upkeep);
        snapshot.add_upkeep(UpkeepClass::Infrastructure, acc.infra_upkeep);

        let penalty = oversize_penalty(acc.fleet_count, acc.colony_count, &config.upkeep);
        if penalty > 1.0 {
            snapshot.scale_upkeep(penalty);
        }
        if ledger.maintenance_multiplier != 1.0 {
            snapshot.scale_upkeep(ledger.maintenance_multiplier);
        }

        snapshot.research = acc.research;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use bevy_app::App;

    use super::*;
    use crate::ecs::app::build_econ_app;
    use crate::ecs::spawn::{
        spawn_colony, spawn_empire, spawn_fleet, spawn_regiment, spawn_ship, spawn_structure,
    };
    use crate::ecs::test_helpers::tick_turns;

    fn setup_app() -> App {
        build_econ_app(42)
    }

    fn basic_empire(app: &mut App, id: u64) -> Entity {
        spawn_empire(
            app.world_mut(),
            id,
            format!("Empire {id}"),
            0,
            EmpireLedger::default(),
            EmpireDiplomacy::default(),
        )
    }

    fn snapshot_of(app: &App, empire: Entity) -> LedgerSnapshot {
        app.world().get::<LedgerSnapshot>(empire).unwrap().clone()
    }

    #[test]
    fn empire_without_assets_books_nothing() {
        let mut app = setup_app();
        let empire = basic_empire(&mut app, 1);
        tick_turns(&mut app, 1);
        let snap = snapshot_of(&app, empire);
        assert_eq!(snap.gross_income(), 0.0);
        assert_eq!(snap.total_upkeep(), 0.0);
    }

    #[test]
    fn colony_output_includes_structure_bonuses_and_floor() {
        let mut app = setup_app();
        let empire = basic_empire(&mut app, 1);
        let colony = spawn_colony(
            app.world_mut(),
            2,
            "Terra".to_string(),
            0,
            empire,
            ColonyEconomy {
                tax_output: 100.0,
                mining_output: 40.0,
                ..ColonyEconomy::default()
            },
        );
        spawn_structure(
            app.world_mut(),
            3,
            "Refinery".to_string(),
            0,
            colony,
            StructureState {
                mining_bonus: 10.0,
                upkeep: 4.0,
                ..StructureState::default()
            },
        );
        tick_turns(&mut app, 1);
        let snap = snapshot_of(&app, empire);
        // tax 100 + floor 5, mining 40 + 10 bonus
        assert_eq!(snap.income_from(IncomeSource::Tax), 105.0);
        assert_eq!(snap.income_from(IncomeSource::Mining), 50.0);
        assert_eq!(snap.upkeep_of(UpkeepClass::Infrastructure), 4.0);
    }

    #[test]
    fn siege_halves_output_but_floor_survives() {
        let mut app = setup_app();
        let empire = basic_empire(&mut app, 1);
        spawn_colony(
            app.world_mut(),
            2,
            "Outpost".to_string(),
            0,
            empire,
            ColonyEconomy {
                tax_output: 100.0,
                under_siege: true,
                ..ColonyEconomy::default()
            },
        );
        tick_turns(&mut app, 1);
        let snap = snapshot_of(&app, empire);
        assert_eq!(snap.income_from(IncomeSource::Tax), 55.0);
    }

    #[test]
    fn trade_income_scales_with_living_partners() {
        let mut app = setup_app();
        let empire = spawn_empire(
            app.world_mut(),
            1,
            "Terra".to_string(),
            0,
            EmpireLedger::default(),
            EmpireDiplomacy {
                trade_partners: [2, 3].into(),
                ..EmpireDiplomacy::default()
            },
        );
        basic_empire(&mut app, 2);
        basic_empire(&mut app, 3);
        spawn_colony(
            app.world_mut(),
            4,
            "Terra Prime".to_string(),
            0,
            empire,
            ColonyEconomy {
                tax_output: 95.0,
                ..ColonyEconomy::default()
            },
        );
        tick_turns(&mut app, 1);
        let snap = snapshot_of(&app, empire);
        // base 100 (95 + floor) x (1.10 - 1) with two partners
        assert!((snap.income_from(IncomeSource::Trade) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn raid_income_from_foreign_ground_is_capped_and_size_scaled() {
        let mut app = setup_app();
        let raider = basic_empire(&mut app, 1);
        let victim = basic_empire(&mut app, 2);
        let target = spawn_colony(
            app.world_mut(),
            3,
            "Rich World".to_string(),
            0,
            victim,
            ColonyEconomy {
                tax_output: 10_000.0,
                ..ColonyEconomy::default()
            },
        );
        let fleet = spawn_fleet(
            app.world_mut(),
            4,
            "Raiders".to_string(),
            0,
            raider,
            target,
            FleetState::default(),
        );
        // One ship of five: 20% strength.
        spawn_ship(
            app.world_mut(),
            5,
            "Corsair".to_string(),
            0,
            fleet,
            ShipState {
                cost: 100.0,
                upkeep: 2.0,
            },
        );
        tick_turns(&mut app, 1);
        let snap = snapshot_of(&app, raider);
        // 10% of 10000 capped at 500, scaled by 1/5.
        assert!((snap.income_from(IncomeSource::Raid) - 100.0).abs() < 1e-9);
        // The victim raids nobody.
        let victim_snap = snapshot_of(&app, victim);
        assert_eq!(victim_snap.income_from(IncomeSource::Raid), 0.0);
    }

    #[test]
    fn orbit_discount_halves_fleet_upkeep() {
        let mut app = setup_app();
        let empire = basic_empire(&mut app, 1);
        let home = spawn_colony(
            app.world_mut(),
            2,
            "Home".to_string(),
            0,
            empire,
            ColonyEconomy::default(),
        );
        let fleet = spawn_fleet(
            app.world_mut(),
            3,
            "Home Fleet".to_string(),
            0,
            empire,
            home,
            FleetState { in_orbit: true },
        );
        spawn_ship(
            app.world_mut(),
            4,
            "Cruiser".to_string(),
            0,
            fleet,
            ShipState {
                cost: 400.0,
                upkeep: 20.0,
            },
        );
        tick_turns(&mut app, 1);
        let snap = snapshot_of(&app, empire);
        assert_eq!(snap.upkeep_of(UpkeepClass::Fleet), 10.0);
    }

    #[test]
    fn garrison_discount_goes_to_most_expensive_regiments() {
        let mut app = setup_app();
        let empire = basic_empire(&mut app, 1);
        let colony = spawn_colony(
            app.world_mut(),
            2,
            "Bastion".to_string(),
            0,
            empire,
            ColonyEconomy {
                garrison_capacity: 1,
                ..ColonyEconomy::default()
            },
        );
        for (id, cost, upkeep) in [(3, 100.0, 10.0), (4, 300.0, 30.0)] {
            spawn_regiment(
                app.world_mut(),
                id,
                format!("Regiment {id}"),
                0,
                empire,
                colony,
                RegimentState { cost, upkeep },
            );
        }
        tick_turns(&mut app, 1);
        let snap = snapshot_of(&app, empire);
        // Expensive regiment (30) discounted to 15, cheap one pays full 10.
        assert_eq!(snap.upkeep_of(UpkeepClass::Army), 25.0);
    }

    #[test]
    fn oversized_navy_pays_the_penalty() {
        let mut app = setup_app();
        let empire = basic_empire(&mut app, 1);
        let home = spawn_colony(
            app.world_mut(),
            2,
            "Home".to_string(),
            0,
            empire,
            ColonyEconomy::default(),
        );
        // 6 fleets against a single colony (limit 4).
        for fleet_idx in 0..6u64 {
            let fleet = spawn_fleet(
                app.world_mut(),
                10 + fleet_idx * 2,
                format!("Fleet {fleet_idx}"),
                0,
                empire,
                home,
                FleetState::default(),
            );
            spawn_ship(
                app.world_mut(),
                11 + fleet_idx * 2,
                "Frigate".to_string(),
                0,
                fleet,
                ShipState {
                    cost: 100.0,
                    upkeep: 10.0,
                },
            );
        }
        tick_turns(&mut app, 1);
        let snap = snapshot_of(&app, empire);
        let naive = 60.0;
        // Two-fleet overage at 0.10 each: x1.2.
        assert!((snap.upkeep_of(UpkeepClass::Fleet) - naive * 1.2).abs() < 1e-9);
        assert!(snap.total_upkeep() > naive);
    }

    #[test]
    fn maintenance_multiplier_scales_every_class() {
        let mut app = setup_app();
        let empire = spawn_empire(
            app.world_mut(),
            1,
            "Austere".to_string(),
            0,
            EmpireLedger {
                maintenance_multiplier: 0.5,
                ..EmpireLedger::default()
            },
            EmpireDiplomacy::default(),
        );
        let colony = spawn_colony(
            app.world_mut(),
            2,
            "Home".to_string(),
            0,
            empire,
            ColonyEconomy::default(),
        );
        spawn_structure(
            app.world_mut(),
            3,
            "Habitat".to_string(),
            0,
            colony,
            StructureState {
                upkeep: 8.0,
                ..StructureState::default()
            },
        );
        tick_turns(&mut app, 1);
        let snap = snapshot_of(&app, empire);
        assert_eq!(snap.upkeep_of(UpkeepClass::Infrastructure), 4.0);
    }

    #[test]
    fn oversize_penalty_math() {
        let config = UpkeepConfig::default();
        assert_eq!(oversize_penalty(4, 1, &config), 1.0);
        assert_eq!(oversize_penalty(6, 1, &config), 1.2);
        // Cap kicks in far past the limit.
        assert_eq!(oversize_penalty(40, 1, &config), 2.0);
    }

    #[test]
    fn dead_assets_contribute_nothing() {
        let mut app = setup_app();
        let empire = basic_empire(&mut app, 1);
        let home = spawn_colony(
            app.world_mut(),
            2,
            "Home".to_string(),
            0,
            empire,
            ColonyEconomy::default(),
        );
        let fleet = spawn_fleet(
            app.world_mut(),
            3,
            "Ghost Fleet".to_string(),
            0,
            empire,
            home,
            FleetState::default(),
        );
        let ship = spawn_ship(
            app.world_mut(),
            4,
            "Wreck".to_string(),
            0,
            fleet,
            ShipState {
                cost: 100.0,
                upkeep: 50.0,
            },
        );
        app.world_mut()
            .get_mut::<SimEntity>(ship)
            .unwrap()
            .kill(0);
        tick_turns(&mut app, 1);
        let snap = snapshot_of(&app, empire);
        assert_eq!(snap.upkeep_of(UpkeepClass::Fleet), 0.0);
    }
}
