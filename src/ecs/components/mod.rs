pub mod colony;
pub mod common;
pub mod empire;
pub mod force;
pub mod structure;

pub use colony::ColonyEconomy;
pub use common::{Colony, Empire, Fleet, Regiment, Ship, SimEntity, Structure};
pub use empire::{
    EmpireBudget, EmpireDiplomacy, EmpireLedger, EmpirePosture, EmpireResearch, LedgerSnapshot,
    RecoveryEpisode, ResearchProject,
};
pub use force::{FleetState, RegimentState, ShipState};
pub use structure::StructureState;
