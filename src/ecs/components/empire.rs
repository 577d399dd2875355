use std::collections::{BTreeMap, BTreeSet, VecDeque};

use bevy_ecs::component::Component;

use crate::model::{BudgetCategory, EmpireMode, IncomeSource, UpkeepClass};

/// Treasury balance and deficit bookkeeping.
#[derive(Component, Debug, Clone)]
pub struct EmpireLedger {
    /// Signed currency stockpile. Negative means debt.
    pub balance: f64,
    /// Consecutive cycles with negative net cash flow.
    pub deficit_streak: u32,
    /// Per-empire multiplier applied to every upkeep class.
    pub maintenance_multiplier: f64,
}

impl Default for EmpireLedger {
    fn default() -> Self {
        Self {
            balance: 0.0,
            deficit_streak: 0,
            maintenance_multiplier: 1.0,
        }
    }
}

/// Persistent, categorized spending buckets. Buckets accumulate across
/// cycles until an executor drains them.
#[derive(Component, Debug, Clone, Default)]
pub struct EmpireBudget {
    pub buckets: BTreeMap<BudgetCategory, f64>,
}

impl EmpireBudget {
    pub fn amount(&self, category: BudgetCategory) -> f64 {
        self.buckets.get(&category).copied().unwrap_or(0.0)
    }

    pub fn credit(&mut self, category: BudgetCategory, amount: f64) {
        if amount != 0.0 {
            *self.buckets.entry(category).or_insert(0.0) += amount;
        }
    }

    /// Withdraw up to `amount` from a bucket, clamped so the bucket never
    /// goes negative. Returns what was actually taken.
    pub fn withdraw_clamped(&mut self, category: BudgetCategory, amount: f64) -> f64 {
        let available = self.amount(category).max(0.0);
        let taken = amount.max(0.0).min(available);
        if taken > 0.0 {
            self.buckets.insert(category, available - taken);
        }
        taken
    }

    /// Reset any negative bucket to zero. Idempotent.
    pub fn normalize(&mut self) {
        for value in self.buckets.values_mut() {
            if *value < 0.0 {
                *value = 0.0;
            }
        }
    }

    /// Drain every positive bucket, returning the total taken.
    pub fn forfeit_all(&mut self) -> f64 {
        let mut total = 0.0;
        for value in self.buckets.values_mut() {
            if *value > 0.0 {
                total += *value;
                *value = 0.0;
            }
        }
        total
    }

    pub fn total(&self) -> f64 {
        self.buckets.values().sum()
    }
}

/// Bookkeeping for one RECOVERY episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryEpisode {
    pub started_turn: u64,
    /// Deepest debt observed during the episode, as a positive magnitude.
    pub max_debt: f64,
}

/// Current posture and state-machine bookkeeping.
#[derive(Component, Debug, Clone)]
pub struct EmpirePosture {
    pub mode: EmpireMode,
    pub since_turn: u64,
    pub recovery: Option<RecoveryEpisode>,
}

impl Default for EmpirePosture {
    fn default() -> Self {
        Self {
            mode: EmpireMode::Consolidation,
            since_turn: 0,
            recovery: None,
        }
    }
}

/// Treaty-facing state the engine reads: vassalage, trade partners,
/// hostilities. Maintained by the embedding simulation.
#[derive(Component, Debug, Clone, Default)]
pub struct EmpireDiplomacy {
    /// Sim id of the overlord when this empire is a vassal.
    pub overlord: Option<u64>,
    /// Sim ids of live trade/alliance partners.
    pub trade_partners: BTreeSet<u64>,
    pub at_war: bool,
}

/// A queued or active research project.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchProject {
    pub id: u64,
    pub name: String,
    pub cost: f64,
    pub invested: f64,
}

impl ResearchProject {
    pub fn new(id: u64, name: impl Into<String>, cost: f64) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            invested: 0.0,
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.cost - self.invested).max(0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.invested >= self.cost
    }
}

/// Research point stockpile, project queue, and parallel slots.
#[derive(Component, Debug, Clone, Default)]
pub struct EmpireResearch {
    pub stockpile: f64,
    pub queue: VecDeque<ResearchProject>,
    pub active: Vec<ResearchProject>,
    /// Ids of finished (unlocked) projects.
    pub completed: Vec<u64>,
}

/// Per-cycle income/upkeep snapshot. Lives on the empire entity and is
/// rebuilt in place by the aggregator at the start of every cycle, so no
/// later stage can read a stale copy.
#[derive(Component, Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub income: BTreeMap<IncomeSource, f64>,
    pub upkeep: BTreeMap<UpkeepClass, f64>,
    /// Research point income this cycle (not currency).
    pub research: f64,
    /// Tribute forwarded to an overlord this cycle.
    pub tribute_paid: f64,
    /// Currency moved into buckets this cycle; settled against the ledger
    /// at the end of the allocate stage.
    pub allocated: f64,
}

impl LedgerSnapshot {
    pub fn reset(&mut self) {
        self.income.clear();
        self.upkeep.clear();
        self.research = 0.0;
        self.tribute_paid = 0.0;
        self.allocated = 0.0;
    }

    pub fn add_income(&mut self, source: IncomeSource, amount: f64) {
        if amount != 0.0 {
            *self.income.entry(source).or_insert(0.0) += amount;
        }
    }

    pub fn add_upkeep(&mut self, class: UpkeepClass, amount: f64) {
        if amount != 0.0 {
            *self.upkeep.entry(class).or_insert(0.0) += amount;
        }
    }

    /// Scale every upkeep class by the same factor (oversize penalty,
    /// maintenance multiplier), keeping the class split consistent with
    /// the total.
    pub fn scale_upkeep(&mut self, factor: f64) {
        for value in self.upkeep.values_mut() {
            *value *= factor;
        }
    }

    pub fn income_from(&self, source: IncomeSource) -> f64 {
        self.income.get(&source).copied().unwrap_or(0.0)
    }

    pub fn upkeep_of(&self, class: UpkeepClass) -> f64 {
        self.upkeep.get(&class).copied().unwrap_or(0.0)
    }

    pub fn gross_income(&self) -> f64 {
        self.income.values().sum()
    }

    /// Gross income minus tribute paid — the figure every downstream
    /// allocation step works from.
    pub fn net_income(&self) -> f64 {
        self.gross_income() - self.tribute_paid
    }

    pub fn total_upkeep(&self) -> f64 {
        self.upkeep.values().sum()
    }

    /// Income/upkeep ratio with the denominator floored at 1.
    pub fn margin(&self) -> f64 {
        self.gross_income() / self.total_upkeep().max(1.0)
    }
}
