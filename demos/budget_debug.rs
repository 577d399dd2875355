use rand::Rng;

use dominion_econ::ecs::components::{
    ColonyEconomy, EmpireBudget, EmpireDiplomacy, EmpireLedger, EmpirePosture, EmpireResearch,
    FleetState, RegimentState, ResearchProject, ShipState, SimEntity, StructureState,
};
use dominion_econ::ecs::resources::{EventLog, SimRng};
use dominion_econ::ecs::spawn::{
    spawn_colony, spawn_empire, spawn_fleet, spawn_regiment, spawn_ship, spawn_structure,
};
use dominion_econ::ecs::{EconTick, build_econ_app};
use dominion_econ::flush::flush_events;
use dominion_econ::model::StructureClass;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut app = build_econ_app(42);
    let world = app.world_mut();

    // A prosperous overlord with an overbuilt navy, and a broke vassal.
    let terra = spawn_empire(
        world,
        1,
        "Terran Directorate".to_string(),
        0,
        EmpireLedger {
            balance: 55_000.0,
            ..EmpireLedger::default()
        },
        EmpireDiplomacy {
            trade_partners: [2].into(),
            ..EmpireDiplomacy::default()
        },
    );
    let march = spawn_empire(
        world,
        2,
        "Rim March".to_string(),
        0,
        EmpireLedger {
            balance: -800.0,
            ..EmpireLedger::default()
        },
        EmpireDiplomacy {
            overlord: Some(1),
            trade_partners: [1].into(),
            ..EmpireDiplomacy::default()
        },
    );

    let terra_prime = spawn_colony(
        world,
        10,
        "Terra Prime".to_string(),
        0,
        terra,
        ColonyEconomy {
            tax_output: 600.0,
            mining_output: 250.0,
            research_output: 40.0,
            ..ColonyEconomy::default()
        },
    );
    spawn_structure(
        world,
        11,
        "Orbital Exchange".to_string(),
        0,
        terra_prime,
        StructureState {
            class: StructureClass::Economy,
            cost: 6_000.0,
            upkeep: 30.0,
            tax_bonus: 80.0,
            ..StructureState::default()
        },
    );
    spawn_structure(
        world,
        12,
        "Naval Yard".to_string(),
        0,
        terra_prime,
        StructureState {
            class: StructureClass::Military,
            cost: 4_000.0,
            upkeep: 60.0,
            ..StructureState::default()
        },
    );
    let home_fleet = spawn_fleet(
        world,
        13,
        "Home Fleet".to_string(),
        0,
        terra,
        terra_prime,
        FleetState { in_orbit: true },
    );
    for i in 0..6u64 {
        let upkeep = world
            .resource_mut::<SimRng>()
            .rng
            .random_range(40.0..50.0);
        spawn_ship(
            world,
            14 + i,
            format!("TDS Vigilant {i}"),
            0,
            home_fleet,
            ShipState {
                cost: 1_200.0,
                upkeep,
            },
        );
    }

    let rimhold = spawn_colony(
        world,
        30,
        "Rimhold".to_string(),
        0,
        march,
        ColonyEconomy {
            tax_output: 180.0,
            mining_output: 60.0,
            under_siege: true,
            ..ColonyEconomy::default()
        },
    );
    spawn_regiment(
        world,
        31,
        "Rim Guard".to_string(),
        0,
        march,
        rimhold,
        RegimentState {
            cost: 900.0,
            upkeep: 35.0,
        },
    );

    world
        .get_mut::<EmpireResearch>(terra)
        .unwrap()
        .queue
        .extend([
            ResearchProject::new(100, "Ion Drives", 120.0),
            ResearchProject::new(101, "Deep Scanners", 200.0),
            ResearchProject::new(102, "Arc Shielding", 400.0),
            ResearchProject::new(103, "Gauss Artillery", 350.0),
        ]);

    for _ in 0..25 {
        app.world_mut().run_schedule(EconTick);
    }

    for empire in [terra, march] {
        let sim = app.world().get::<SimEntity>(empire).unwrap();
        let ledger = app.world().get::<EmpireLedger>(empire).unwrap();
        let posture = app.world().get::<EmpirePosture>(empire).unwrap();
        let budget = app.world().get::<EmpireBudget>(empire).unwrap();
        let research = app.world().get::<EmpireResearch>(empire).unwrap();
        eprintln!(
            "{}: balance={:.1} posture={} buckets={:.1} completed_research={:?}",
            sim.name,
            ledger.balance,
            posture.mode,
            budget.total(),
            research.completed,
        );
    }

    let log = app.world().resource::<EventLog>();
    eprintln!("telemetry: {} events", log.events.len());
    for event in log.events.iter().rev().take(8).rev() {
        eprintln!("  [turn {:>2}] {} {}", event.turn, event.kind, event.description);
    }

    let out = std::path::Path::new("output");
    flush_events(log, out).expect("flush events");
    eprintln!("event log flushed to {}", out.join("events.jsonl").display());
}
