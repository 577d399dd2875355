use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;

use crate::model::{EmpireMode, ExecutorKind};

/// External spending collaborator for one executor slot.
///
/// The engine offers the current bucket value; the executor performs its
/// construction/recruitment work and reports what it actually spent. A
/// report outside `0..=offered` is clamped by the spend stage, never
/// propagated.
pub trait SpendingExecutor: Send + Sync {
    fn spend(&mut self, empire_id: u64, offered: f64, mode: EmpireMode) -> f64;
}

impl<F> SpendingExecutor for F
where
    F: FnMut(u64, f64, EmpireMode) -> f64 + Send + Sync,
{
    fn spend(&mut self, empire_id: u64, offered: f64, mode: EmpireMode) -> f64 {
        self(empire_id, offered, mode)
    }
}

/// Registry of spending executors, drained in `ExecutorKind::DRAIN_ORDER`
/// by the spend stage. An empty registry is valid: nothing is spent and
/// buckets keep accumulating.
#[derive(Resource, Default)]
pub struct SpendRegistry {
    executors: BTreeMap<ExecutorKind, Box<dyn SpendingExecutor>>,
}

impl SpendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ExecutorKind, executor: Box<dyn SpendingExecutor>) {
        self.executors.insert(kind, executor);
    }

    pub fn get_mut(&mut self, kind: ExecutorKind) -> Option<&mut Box<dyn SpendingExecutor>> {
        self.executors.get_mut(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}
