#![allow(dead_code)]

use bevy_app::App;
use bevy_ecs::entity::Entity;

use dominion_econ::ecs::components::{ColonyEconomy, EmpireDiplomacy, EmpireLedger};
use dominion_econ::ecs::spawn::{spawn_colony, spawn_empire};
use dominion_econ::ecs::{EconTick, build_econ_app};

pub fn build_app(seed: u64) -> App {
    build_econ_app(seed)
}

pub fn tick(app: &mut App, turns: u64) {
    for _ in 0..turns {
        app.world_mut().run_schedule(EconTick);
    }
}

pub fn empire_with_balance(app: &mut App, id: u64, balance: f64) -> Entity {
    spawn_empire(
        app.world_mut(),
        id,
        format!("Empire {id}"),
        0,
        EmpireLedger {
            balance,
            ..EmpireLedger::default()
        },
        EmpireDiplomacy::default(),
    )
}

/// Colony producing exactly `income` once the per-colony floor is added.
pub fn colony_with_income(app: &mut App, id: u64, empire: Entity, income: f64) -> Entity {
    spawn_colony(
        app.world_mut(),
        id,
        format!("Colony {id}"),
        0,
        empire,
        ColonyEconomy {
            tax_output: income - 5.0,
            ..ColonyEconomy::default()
        },
    )
}

pub fn balance(app: &App, empire: Entity) -> f64 {
    app.world().get::<EmpireLedger>(empire).unwrap().balance
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
