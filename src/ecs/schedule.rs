use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::clock::advance_clock;

/// Schedule label for one economic cycle.
/// Run manually each turn via `app.world_mut().run_schedule(EconTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct EconTick;

/// Ordered phases within each cycle.
///
/// Systems are assigned to phases via `.in_set(SimPhase::Update)` etc.
/// Phases run in declaration order: Update < Last.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimPhase {
    Update,
    Last,
}

/// The five pipeline stages within `SimPhase::Update`, strictly chained:
///
/// ```text
/// Aggregate → Classify → Allocate → Insolvency → Spend
/// ```
///
/// Every stage iterates empires in deterministic query order before the next
/// stage starts, so no empire reads another's in-progress cycle state.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum StageSet {
    Aggregate,
    Classify,
    Allocate,
    Insolvency,
    Spend,
}

/// Build a configured `EconTick` schedule with phase and stage ordering.
///
/// The executor is always single-threaded: deterministic iteration and RNG
/// consumption order is a contract of the engine, not an option.
pub fn configure_econ_schedule() -> Schedule {
    let mut schedule = Schedule::new(EconTick);
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.configure_sets((SimPhase::Update, SimPhase::Last).chain());
    schedule.configure_sets(
        (
            StageSet::Aggregate,
            StageSet::Classify,
            StageSet::Allocate,
            StageSet::Insolvency,
            StageSet::Spend,
        )
            .chain()
            .in_set(SimPhase::Update),
    );
    schedule.add_systems(advance_clock.in_set(SimPhase::Last));
    schedule
}
