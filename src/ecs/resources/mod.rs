pub mod entity_map;
pub mod event_log;
pub mod executors;
pub mod sim_resources;

pub use entity_map::SimEntityMap;
pub use event_log::EventLog;
pub use executors::{SpendRegistry, SpendingExecutor};
pub use sim_resources::{SimRng, scoped_rng};
