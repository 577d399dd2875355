use bevy_app::App;

use crate::ecs::clock::SimClock;
use crate::ecs::schedule::EconTick;

/// Run `n` full economic cycles.
pub fn tick_turns(app: &mut App, n: u64) {
    for _ in 0..n {
        app.world_mut().run_schedule(EconTick);
    }
}

/// Current turn from the clock resource.
pub fn current_turn(app: &App) -> u64 {
    app.world().resource::<SimClock>().turn
}
