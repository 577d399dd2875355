use bevy_ecs::resource::Resource;

use crate::id::IdGenerator;
use crate::model::{EconEvent, EconEventKind};

/// Accumulates telemetry events between flushes.
///
/// Absence of any consumer never changes engine behavior: systems append
/// records here and move on. `flush::jsonl` drains to disk when the
/// embedding simulation wants a trace.
#[derive(Resource, Debug, Default)]
pub struct EventLog {
    pub events: Vec<EconEvent>,
    ids: IdGenerator,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record, assigning it the next event id.
    pub fn record(
        &mut self,
        kind: EconEventKind,
        turn: u64,
        empire: u64,
        description: impl Into<String>,
        data: serde_json::Value,
    ) -> u64 {
        let id = self.ids.next_id();
        self.events.push(EconEvent {
            id,
            kind,
            turn,
            empire,
            description: description.into(),
            data,
        });
        id
    }

    /// Events of one kind, in emission order.
    pub fn of_kind(&self, kind: EconEventKind) -> impl Iterator<Item = &EconEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
