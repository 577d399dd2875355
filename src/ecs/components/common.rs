use bevy_ecs::component::Component;

/// Core identity component present on every simulation entity.
///
/// Entities are never despawned mid-cycle; removal sets `end` to the turn of
/// death and every system filters on `is_alive()`. This keeps iteration order
/// and entity references stable inside a cycle.
#[derive(Component, Debug, Clone)]
pub struct SimEntity {
    pub id: u64,
    pub name: String,
    pub origin: u64,
    pub end: Option<u64>,
}

impl SimEntity {
    pub fn new(id: u64, name: impl Into<String>, origin: u64) -> Self {
        Self {
            id,
            name: name.into(),
            origin,
            end: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.end.is_none()
    }

    /// Soft-delete at the given turn. Idempotent: an already-dead entity
    /// keeps its original end turn.
    pub fn kill(&mut self, turn: u64) {
        if self.end.is_none() {
            self.end = Some(turn);
        }
    }
}

// ---------------------------------------------------------------------------
// Marker components — one per entity kind
// ---------------------------------------------------------------------------

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Empire;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Colony;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Fleet;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Ship;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Regiment;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Structure;
