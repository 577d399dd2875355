pub mod app;
pub mod clock;
pub mod components;
pub mod relationships;
pub mod resources;
pub mod schedule;
pub mod spawn;
pub mod systems;
pub mod test_helpers;

pub use app::{build_econ_app, build_econ_app_with_config};
pub use clock::SimClock;
pub use components::{
    Colony, ColonyEconomy, Empire, EmpireBudget, EmpireDiplomacy, EmpireLedger, EmpirePosture,
    EmpireResearch, Fleet, FleetState, LedgerSnapshot, RecoveryEpisode, Regiment, RegimentState,
    ResearchProject, Ship, ShipState, SimEntity, Structure, StructureState,
};
pub use relationships::{GarrisonedAt, InFleet, InFleetShips, LocatedIn, OwnedBy, StationedAt};
pub use resources::{
    EventLog, SimEntityMap, SimRng, SpendRegistry, SpendingExecutor, scoped_rng,
};
pub use schedule::{EconTick, SimPhase, StageSet, configure_econ_schedule};
