pub mod ecs;
pub mod flush;
pub mod id;
pub mod model;

pub use id::IdGenerator;
pub use model::{
    BudgetCategory, DebtSeverity, EconEvent, EconEventKind, EconomyConfig, EmpireMode,
    ExecutorKind, ForceClass, IncomeSource, StructureClass, UpkeepClass,
};
