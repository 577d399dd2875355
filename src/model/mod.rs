#[macro_use]
mod macros;

pub mod categories;
pub mod config;
pub mod event;

pub use categories::{
    BudgetCategory, DebtSeverity, EmpireMode, ExecutorKind, ForceClass, IncomeSource,
    StructureClass, UpkeepClass,
};
pub use config::{EconomyConfig, PostureRatios, RecoveryShares};
pub use event::{EconEvent, EconEventKind};
