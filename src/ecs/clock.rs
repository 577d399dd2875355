use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

/// Simulation clock tracking the current turn.
///
/// Advances by one turn per schedule run. The `advance_clock` system moves the
/// clock forward at the end of each tick (in `SimPhase::Last`), so every
/// pipeline stage sees the current turn before it advances.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SimClock {
    pub turn: u64,
}

impl SimClock {
    pub fn new(start_turn: u64) -> Self {
        Self { turn: start_turn }
    }

    /// Advance the clock by one turn.
    pub fn advance(&mut self) {
        self.turn += 1;
    }
}

/// Bevy system that advances the clock. Registered in `SimPhase::Last` so all
/// pipeline stages see the current turn before it advances.
pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clock_starts_at_given_turn() {
        let clock = SimClock::new(10);
        assert_eq!(clock.turn, 10);
    }

    #[test]
    fn advance_increments_turn() {
        let mut clock = SimClock::new(0);
        clock.advance();
        clock.advance();
        assert_eq!(clock.turn, 2);
    }
}
