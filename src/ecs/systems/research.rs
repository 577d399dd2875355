//! Research point distribution — runs inside the allocate stage, after the
//! currency split.
//!
//! Research points are a parallel, non-monetary currency: the stockpile
//! grows from the snapshot's research income, fills up to the configured
//! number of parallel slots from a FIFO queue, and splits evenly across
//! active slots each cycle. Overflow past a project's remaining cost stays
//! in the stockpile. Runs regardless of solvency.

use bevy_ecs::query::With;
use bevy_ecs::system::{Query, Res, ResMut};
use serde_json::json;
use tracing::debug;

use crate::ecs::clock::SimClock;
use crate::ecs::components::{Empire, EmpireResearch, LedgerSnapshot, SimEntity};
use crate::ecs::resources::EventLog;
use crate::model::{EconEventKind, EconomyConfig};

pub fn advance_research(
    clock: Res<SimClock>,
    config: Res<EconomyConfig>,
    mut log: ResMut<EventLog>,
    mut empires: Query<(&SimEntity, &mut EmpireResearch, &LedgerSnapshot), With<Empire>>,
) {
    let max_slots = config.research.max_slots;
    for (sim, mut research, snapshot) in empires.iter_mut() {
        if !sim.is_alive() {
            continue;
        }
        research.stockpile += snapshot.research;

        // Fill open slots from the queue, FIFO.
        while research.active.len() < max_slots {
            match research.queue.pop_front() {
                Some(project) => research.active.push(project),
                None => break,
            }
        }

        if !research.active.is_empty() && research.stockpile > 0.0 {
            let share = research.stockpile / research.active.len() as f64;
            let mut invested = 0.0;
            for project in &mut research.active {
                let add = share.min(project.remaining());
                project.invested += add;
                invested += add;
            }
            // Whatever a near-finished project could not absorb stays banked.
            research.stockpile -= invested;
        }

        // Complete, unlock, and free the slot.
        let mut finished = Vec::new();
        research.active.retain(|project| {
            if project.is_complete() {
                finished.push((project.id, project.name.clone()));
                false
            } else {
                true
            }
        });
        for (project_id, name) in finished {
            research.completed.push(project_id);
            debug!(empire = sim.id, project = project_id, "research complete");
            log.record(
                EconEventKind::ResearchComplete,
                clock.turn,
                sim.id,
                format!("{} completes {name}", sim.name),
                json!({ "project": project_id, "name": name }),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
