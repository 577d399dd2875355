//! End-to-end allocation scenarios over the full per-turn pipeline.

mod common;

use common::{balance, build_app, colony_with_income, empire_with_balance, tick};
use dominion_econ::ecs::components::{EmpireBudget, EmpirePosture, ShipState, StructureState};
use dominion_econ::ecs::resources::{EventLog, SpendRegistry};
use dominion_econ::ecs::spawn::{spawn_fleet, spawn_ship, spawn_structure};
use dominion_econ::model::{BudgetCategory, EconEventKind, EmpireMode, ExecutorKind};

/// Rich empire with healthy income: expansion ratios govern the surplus
/// split, and the starved-inflow stimulus stays out of the way.
#[test]
fn expansion_cycle_distributes_surplus_by_ratio() {
    let mut app = build_app(42);
    let empire = empire_with_balance(&mut app, 1, 60_000.0);
    let colony = colony_with_income(&mut app, 2, empire, 1_000.0);
    spawn_structure(
        app.world_mut(),
        3,
        "Habitat".to_string(),
        0,
        colony,
        StructureState {
            cost: 2_000.0,
            upkeep: 500.0,
            ..StructureState::default()
        },
    );
    tick(&mut app, 1);

    assert_eq!(
        app.world().get::<EmpirePosture>(empire).unwrap().mode,
        EmpireMode::Expansion
    );

    // Inflow 500 split 0.20/0.50/0.18/0.12, then the wealthy-but-starved
    // stimulus (inflow 500 < 2000) injects 4000 more as 1600/1600/800.
    let budget = app.world().get::<EmpireBudget>(empire).unwrap();
    assert!((budget.amount(BudgetCategory::Research) - 100.0).abs() < 1e-9);
    assert!((budget.amount(BudgetCategory::Construction) - 1_850.0).abs() < 1e-9);
    assert!((budget.amount(BudgetCategory::Navy) - 1_690.0).abs() < 1e-9);
    assert!((budget.amount(BudgetCategory::Army) - 860.0).abs() < 1e-9);
    assert!((balance(&app, empire) - 56_000.0).abs() < 1e-9);

    let log = app.world().resource::<EventLog>();
    assert_eq!(log.of_kind(EconEventKind::BudgetAllocation).count(), 1);
    assert_eq!(log.of_kind(EconEventKind::Stimulus).count(), 1);
}

/// Money is conserved across the cycle: the inflow lands either in buckets
/// or stays in the ledger, nothing more, nothing less.
#[test]
fn inflow_is_conserved_between_ledger_and_buckets() {
    let mut app = build_app(7);
    let empire = empire_with_balance(&mut app, 1, 30_000.0);
    colony_with_income(&mut app, 2, empire, 3_000.0);
    for turn in 0..10 {
        let before_balance = balance(&app, empire);
        let before_buckets = app.world().get::<EmpireBudget>(empire).unwrap().total();
        tick(&mut app, 1);
        let after_balance = balance(&app, empire);
        let after_buckets = app.world().get::<EmpireBudget>(empire).unwrap().total();
        // No upkeep, no tribute, no spending: income in, nothing out.
        let inflow = 3_000.0;
        let delta = (after_balance - before_balance) + (after_buckets - before_buckets);
        assert!(
            (delta - inflow).abs() < 1e-6,
            "turn {turn}: delta {delta} != inflow {inflow}"
        );
    }
}

/// Per-category spend never exceeds the bucket's pre-spend value, whatever
/// the executor claims.
#[test]
fn spend_cannot_overdraw_a_bucket() {
    let mut app = build_app(11);
    let empire = empire_with_balance(&mut app, 1, 30_000.0);
    colony_with_income(&mut app, 2, empire, 3_000.0);
    app.world_mut().resource_mut::<SpendRegistry>().register(
        ExecutorKind::Construction,
        Box::new(|_empire: u64, offered: f64, _mode: EmpireMode| offered * 3.0),
    );
    for _ in 0..5 {
        tick(&mut app, 1);
        let budget = app.world().get::<EmpireBudget>(empire).unwrap();
        for (&category, &value) in &budget.buckets {
            assert!(value >= 0.0, "{category} bucket went negative: {value}");
        }
    }
}

/// Buckets keep accumulating across cycles while no executor drains them.
#[test]
fn unspent_buckets_accumulate() {
    let mut app = build_app(3);
    let empire = empire_with_balance(&mut app, 1, 30_000.0);
    colony_with_income(&mut app, 2, empire, 3_000.0);
    tick(&mut app, 1);
    let first = app
        .world()
        .get::<EmpireBudget>(empire)
        .unwrap()
        .amount(BudgetCategory::Construction);
    tick(&mut app, 3);
    let later = app
        .world()
        .get::<EmpireBudget>(empire)
        .unwrap()
        .amount(BudgetCategory::Construction);
    assert!(later > first * 2.5, "buckets should accumulate: {first} -> {later}");
}

/// An over-cap navy stops receiving fresh allocation while the empire is
/// solvent, and the redirected half tops up construction instead.
#[test]
fn over_cap_navy_receives_no_fresh_allocation() {
    let mut app = build_app(19);
    let empire = empire_with_balance(&mut app, 1, 20_000.0);
    let home = colony_with_income(&mut app, 2, empire, 1_000.0);
    let fleet = spawn_fleet(
        app.world_mut(),
        3,
        "Wall of Iron".to_string(),
        0,
        empire,
        home,
        dominion_econ::ecs::components::FleetState::default(),
    );
    // 45% of income on fleet upkeep: over the 40% cap, under the 90%
    // sustainability threshold.
    spawn_ship(
        app.world_mut(),
        4,
        "Bastion".to_string(),
        0,
        fleet,
        ShipState {
            cost: 10_000.0,
            upkeep: 450.0,
        },
    );
    tick(&mut app, 1);
    let budget = app.world().get::<EmpireBudget>(empire).unwrap();
    assert_eq!(budget.amount(BudgetCategory::Navy), 0.0);
    // Consolidation: construction 0.45 + redirected 0.05 of 550 inflow.
    assert!((budget.amount(BudgetCategory::Construction) - 275.0).abs() < 1e-9);
}
