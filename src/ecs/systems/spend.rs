//! Executor drain — final pipeline stage.
//!
//! Runs only for empires whose post-insolvency balance is positive. Each
//! registered executor is offered its bucket's current value in the fixed
//! order research, construction, navy-commission, navy-production,
//! army-production (the two navy executors share the navy bucket). The
//! bucket decrement is clamped to what was offered; an overspending
//! executor is clamped and logged, never propagated.

use bevy_ecs::query::With;
use bevy_ecs::system::{Query, ResMut};
use tracing::{debug, warn};

use crate::ecs::components::{Empire, EmpireBudget, EmpireLedger, EmpirePosture, SimEntity};
use crate::ecs::resources::SpendRegistry;
use crate::model::ExecutorKind;

pub fn execute_spending(
    mut registry: ResMut<SpendRegistry>,
    mut empires: Query<(&SimEntity, &EmpireLedger, &mut EmpireBudget, &EmpirePosture), With<Empire>>,
) {
    if registry.is_empty() {
        return;
    }
    for (sim, ledger, mut budget, posture) in empires.iter_mut() {
        if !sim.is_alive() || ledger.balance <= 0.0 {
            continue;
        }
        for kind in ExecutorKind::DRAIN_ORDER {
            let Some(executor) = registry.get_mut(kind) else {
                continue;
            };
            let offered = budget.amount(kind.bucket());
            if offered <= 0.0 {
                continue;
            }
            let reported = executor.spend(sim.id, offered, posture.mode);
            if reported > offered {
                warn!(
                    empire = sim.id,
                    executor = %kind,
                    reported,
                    offered,
                    "executor overspend clamped"
                );
            }
            let spent = reported.clamp(0.0, offered);
            if spent > 0.0 {
                budget.withdraw_clamped(kind.bucket(), spent);
                debug!(empire = sim.id, executor = %kind, spent, "budget drained");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use bevy_app::App;
    use bevy_ecs::entity::Entity;

    use super::*;
    use crate::ecs::app::build_econ_app;
    use crate::ecs::components::EmpireDiplomacy;
    use crate::ecs::spawn::spawn_empire;
    use crate::ecs::test_helpers::tick_turns;
    use crate::model::{BudgetCategory, EmpireMode};

    fn setup(balance: f64) -> (App, Entity) {
        let mut app = build_econ_app(42);
        let empire = spawn_empire(
            app.world_mut(),
            1,
            "Spender".to_string(),
            0,
            crate::ecs::components::EmpireLedger {
                balance,
                ..Default::default()
            },
            EmpireDiplomacy::default(),
        );
        (app, empire)
    }

    fn credit(app: &mut App, empire: Entity, category: BudgetCategory, amount: f64) {
        app.world_mut()
            .get_mut::<EmpireBudget>(empire)
            .unwrap()
            .credit(category, amount);
    }

    fn bucket(app: &App, empire: Entity, category: BudgetCategory) -> f64 {
        app.world()
            .get::<EmpireBudget>(empire)
            .unwrap()
            .amount(category)
    }

    fn register_fixed(app: &mut App, kind: ExecutorKind, spend: f64) {
        app.world_mut().resource_mut::<SpendRegistry>().register(
            kind,
            Box::new(move |_empire: u64, offered: f64, _mode: EmpireMode| spend.min(offered)),
        );
    }

    #[test]
    fn executors_drain_their_buckets_in_order() {
        let (mut app, empire) = setup(1_000.0);
        credit(&mut app, empire, BudgetCategory::Research, 100.0);
        credit(&mut app, empire, BudgetCategory::Navy, 200.0);
        register_fixed(&mut app, ExecutorKind::Research, 60.0);
        register_fixed(&mut app, ExecutorKind::NavyCommission, 150.0);
        register_fixed(&mut app, ExecutorKind::NavyProduction, 150.0);
        tick_turns(&mut app, 1);
        assert_eq!(bucket(&app, empire, BudgetCategory::Research), 40.0);
        // Commission takes 150, production gets the remaining 50.
        assert_eq!(bucket(&app, empire, BudgetCategory::Navy), 0.0);
    }

    #[test]
    fn overspend_reports_are_clamped_to_the_offer() {
        let (mut app, empire) = setup(1_000.0);
        credit(&mut app, empire, BudgetCategory::Construction, 80.0);
        app.world_mut().resource_mut::<SpendRegistry>().register(
            ExecutorKind::Construction,
            Box::new(|_empire: u64, _offered: f64, _mode: EmpireMode| 10_000.0),
        );
        tick_turns(&mut app, 1);
        assert_eq!(bucket(&app, empire, BudgetCategory::Construction), 0.0);
    }

    #[test]
    fn empires_without_a_positive_balance_spend_nothing() {
        // Balance exactly zero: the debt path leaves buckets alone, but the
        // spend gate still refuses to drain them.
        let (mut app, empire) = setup(0.0);
        credit(&mut app, empire, BudgetCategory::Research, 100.0);
        let calls = Arc::new(Mutex::new(0u32));
        let calls_clone = calls.clone();
        app.world_mut().resource_mut::<SpendRegistry>().register(
            ExecutorKind::Research,
            Box::new(move |_empire: u64, offered: f64, _mode: EmpireMode| {
                *calls_clone.lock().unwrap() += 1;
                offered
            }),
        );
        tick_turns(&mut app, 1);
        assert_eq!(*calls.lock().unwrap(), 0);
        assert_eq!(bucket(&app, empire, BudgetCategory::Research), 100.0);
    }

    #[test]
    fn executors_see_the_current_posture() {
        let (mut app, empire) = setup(60_000.0);
        credit(&mut app, empire, BudgetCategory::Research, 10.0);
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        app.world_mut().resource_mut::<SpendRegistry>().register(
            ExecutorKind::Research,
            Box::new(move |_empire: u64, offered: f64, mode: EmpireMode| {
                *seen_clone.lock().unwrap() = Some(mode);
                offered
            }),
        );
        tick_turns(&mut app, 1);
        assert_eq!(*seen.lock().unwrap(), Some(EmpireMode::Expansion));
        let _ = empire;
    }
}
