use std::hash::{DefaultHasher, Hash, Hasher};

use bevy_ecs::resource::Resource;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Deterministic RNG root for the run.
///
/// Systems that need randomness do not draw from `rng` directly during the
/// pipeline — they derive a scoped generator via [`scoped_rng`] so the
/// consumption order of one subsystem can never perturb another. The direct
/// `rng` is for world construction (spawn-time variation).
#[derive(Resource)]
pub struct SimRng {
    pub rng: SmallRng,
    pub seed: u64,
}

impl SimRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Derive a deterministic RNG scoped to (run seed, subsystem, turn, empire).
///
/// Identical seeds and world state reproduce identical draws per empire and
/// subsystem on every run, regardless of what any other subsystem consumed.
pub fn scoped_rng(seed: u64, subsystem: &str, turn: u64, empire_id: u64) -> SmallRng {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    subsystem.hash(&mut hasher);
    turn.hash(&mut hasher);
    empire_id.hash(&mut hasher);
    SmallRng::seed_from_u64(hasher.finish())
}
