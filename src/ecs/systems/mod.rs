//! The five-stage economic pipeline, registered onto the `EconTick`
//! schedule in strict order:
//!
//! ```text
//! Aggregate → Classify → Allocate → Insolvency → Spend
//! ```

use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule};

pub mod aggregate;
pub mod allocate;
pub mod insolvency;
pub mod posture;
pub mod research;
pub mod spend;

pub use aggregate::rebuild_snapshots;
pub use allocate::{
    BudgetShares, allocate_budgets, budget_shares, collect_tribute, inject_stimulus,
    settle_ledgers,
};
pub use insolvency::resolve_insolvency;
pub use posture::classify_postures;
pub use research::advance_research;
pub use spend::execute_spending;

use super::schedule::StageSet;

/// Register the full pipeline on an `EconTick` schedule.
pub fn add_engine_systems(schedule: &mut Schedule) {
    schedule.add_systems(rebuild_snapshots.in_set(StageSet::Aggregate));
    schedule.add_systems(classify_postures.in_set(StageSet::Classify));
    schedule.add_systems(
        (
            collect_tribute,
            allocate_budgets,
            advance_research,
            inject_stimulus,
            settle_ledgers,
        )
            .chain()
            .in_set(StageSet::Allocate),
    );
    schedule.add_systems(resolve_insolvency.in_set(StageSet::Insolvency));
    schedule.add_systems(execute_spending.in_set(StageSet::Spend));
}
