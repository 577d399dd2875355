use bevy_app::App;

use crate::model::EconomyConfig;

use super::clock::SimClock;
use super::resources::{EventLog, SimEntityMap, SimRng, SpendRegistry};
use super::schedule::configure_econ_schedule;
use super::systems::add_engine_systems;

/// Build a headless app with the full economic pipeline and default
/// configuration.
///
/// Manual turn control:
/// ```no_run
/// # use dominion_econ::ecs::{build_econ_app, EconTick};
/// let mut app = build_econ_app(42);
/// for _ in 0..100 {
///     app.world_mut().run_schedule(EconTick);
/// }
/// ```
pub fn build_econ_app(seed: u64) -> App {
    build_econ_app_with_config(seed, EconomyConfig::default())
}

/// Build a headless app with an explicit configuration instance.
///
/// The config is the only tuning surface — one object per engine instance,
/// no process-wide tables. The schedule executor is single-threaded so runs
/// with identical seeds and worlds are bit-identical.
pub fn build_econ_app_with_config(seed: u64, config: EconomyConfig) -> App {
    let mut app = App::empty();

    app.insert_resource(SimClock::new(0));
    app.insert_resource(EventLog::new());
    app.insert_resource(SimEntityMap::new());
    app.insert_resource(SimRng::from_seed(seed));
    app.insert_resource(SpendRegistry::new());
    app.insert_resource(config);

    let mut schedule = configure_econ_schedule();
    add_engine_systems(&mut schedule);
    app.add_schedule(schedule);
    app
}
