//! Engine configuration surface.
//!
//! One `EconomyConfig` is injected per app instance at construction — there
//! are no process-wide mutable tables. Every field carries a documented
//! default; a config deserialized from partial JSON fills the gaps from
//! those defaults, and a missing posture ratio table falls back at lookup
//! time with a `debug!` log.

use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;
use serde::Deserialize;
use tracing::debug;

use super::categories::{DebtSeverity, EmpireMode, ForceClass};

// ---------------------------------------------------------------------------
// Defaults — Income
// ---------------------------------------------------------------------------

const SIEGE_PENALTY: f64 = 0.5;
const MIN_COLONY_INCOME: f64 = 5.0;
const TRADE_INCOME_MULTIPLIER: f64 = 1.0;
const TRADE_PARTNER_BONUS: f64 = 0.05;
const RAID_RATE: f64 = 0.10;
const RAID_CAP_PER_FLEET: f64 = 500.0;
const RAID_FULL_STRENGTH: u32 = 5;

// ---------------------------------------------------------------------------
// Defaults — Upkeep
// ---------------------------------------------------------------------------

const ORBIT_DISCOUNT: f64 = 0.5;
const GARRISON_DISCOUNT: f64 = 0.5;
const FLEET_MAINTENANCE_SCALAR: f64 = 1.0;
const FLEETS_PER_COLONY: f64 = 4.0;
const OVERSIZE_PENALTY_PER_FLEET: f64 = 0.10;
const OVERSIZE_PENALTY_CAP: f64 = 1.0;

// ---------------------------------------------------------------------------
// Defaults — Posture thresholds
// ---------------------------------------------------------------------------

const RICH_THRESHOLD: f64 = 50_000.0;
const LOSING_MARGIN: f64 = 0.3;
const STREAK_LIMIT: u32 = 5;
const MILD_DEBT_FLOOR: f64 = -5_000.0;
const SEVERE_DEBT_FLOOR: f64 = -20_000.0;

// ---------------------------------------------------------------------------
// Defaults — Allocation
// ---------------------------------------------------------------------------

const TRIBUTE_RATE: f64 = 0.20;
const COLONIZATION_RESERVE: f64 = 60_000.0;
const FORCED_SAVINGS_RATE: f64 = 0.80;
const LEGACY_NAVY_SHARE: f64 = 0.40;
const NAVY_CAP: f64 = 0.40;
const ARMY_CAP: f64 = 0.30;

// ---------------------------------------------------------------------------
// Defaults — Stimulus
// ---------------------------------------------------------------------------

const WEALTHY_THRESHOLD: f64 = 50_000.0;
const STARVED_INFLOW: f64 = 2_000.0;
const STIMULUS_RATE: f64 = 0.10;
const SAFETY_BUFFER: f64 = 20_000.0;
const STIMULUS_CAP: f64 = 10_000.0;

// ---------------------------------------------------------------------------
// Defaults — Insolvency
// ---------------------------------------------------------------------------

const SUSTAINABILITY_THRESHOLD: f64 = 0.90;
const DISBAND_REFUND: f64 = 0.25;
const DEEP_DEBT_FLOOR: f64 = -10_000.0;
const RESTART_THRESHOLD: f64 = 2_000.0;

// ---------------------------------------------------------------------------
// Ratio tables
// ---------------------------------------------------------------------------

/// Budget shares for one posture. `recruitment` splits further into
/// navy/army via `navy_share`. Shares may sum below 1.0 — the remainder
/// stays in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostureRatios {
    pub recruitment: f64,
    pub construction: f64,
    pub research: f64,
    pub navy_share: f64,
}

impl Default for PostureRatios {
    fn default() -> Self {
        // Consolidation baseline.
        Self {
            recruitment: 0.20,
            construction: 0.45,
            research: 0.35,
            navy_share: 0.5,
        }
    }
}

/// Recruitment share of recovery spending per debt severity tier.
/// Construction takes the remainder; research gets nothing in recovery.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecoveryShares {
    pub mild: f64,
    pub moderate: f64,
    pub severe: f64,
    /// Navy share of whatever recruitment survives in recovery.
    pub navy_share: f64,
}

impl Default for RecoveryShares {
    fn default() -> Self {
        Self {
            mild: 0.40,
            moderate: 0.25,
            severe: 0.10,
            navy_share: 0.5,
        }
    }
}

impl RecoveryShares {
    pub fn for_severity(&self, severity: DebtSeverity) -> f64 {
        match severity {
            DebtSeverity::Mild => self.mild,
            DebtSeverity::Moderate => self.moderate,
            DebtSeverity::Severe => self.severe,
        }
    }
}

fn default_ratio_tables() -> BTreeMap<EmpireMode, PostureRatios> {
    BTreeMap::from([
        (
            EmpireMode::Expansion,
            PostureRatios {
                recruitment: 0.30,
                construction: 0.50,
                research: 0.20,
                navy_share: 0.6,
            },
        ),
        (
            EmpireMode::War,
            PostureRatios {
                recruitment: 0.60,
                construction: 0.25,
                research: 0.15,
                navy_share: 0.5,
            },
        ),
        (
            EmpireMode::DesperateDefense,
            PostureRatios {
                recruitment: 0.70,
                construction: 0.25,
                research: 0.05,
                navy_share: 0.4,
            },
        ),
        (EmpireMode::Consolidation, PostureRatios::default()),
    ])
}

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IncomeConfig {
    /// Multiplier on colony output while the colony is under siege.
    pub siege_penalty: f64,
    /// Income floor credited per colony each cycle, siege or not.
    pub min_colony_income: f64,
    /// Global multiplier on the trade income formula.
    pub trade_income_multiplier: f64,
    /// Trade bonus contributed per live trade/alliance partner.
    pub trade_partner_bonus: f64,
    /// Fraction of a raided colony's production value taken per cycle.
    pub raid_rate: f64,
    /// Per-fleet cap on raid income before size scaling.
    pub raid_cap_per_fleet: f64,
    /// Ship count at which a fleet raids at full effectiveness.
    pub raid_full_strength: u32,
}

impl Default for IncomeConfig {
    fn default() -> Self {
        Self {
            siege_penalty: SIEGE_PENALTY,
            min_colony_income: MIN_COLONY_INCOME,
            trade_income_multiplier: TRADE_INCOME_MULTIPLIER,
            trade_partner_bonus: TRADE_PARTNER_BONUS,
            raid_rate: RAID_RATE,
            raid_cap_per_fleet: RAID_CAP_PER_FLEET,
            raid_full_strength: RAID_FULL_STRENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpkeepConfig {
    /// Ship upkeep multiplier while the owning fleet sits in orbit.
    pub orbit_discount: f64,
    /// Regiment upkeep multiplier for garrisoned slots within capacity.
    pub garrison_discount: f64,
    /// Global scalar on all fleet upkeep.
    pub fleet_maintenance_scalar: f64,
    /// Living fleets allowed per owned colony before the oversize penalty.
    pub fleets_per_colony: f64,
    /// Penalty slope per fleet over the limit.
    pub oversize_penalty_per_fleet: f64,
    /// Cap on the oversize penalty term.
    pub oversize_penalty_cap: f64,
}

impl Default for UpkeepConfig {
    fn default() -> Self {
        Self {
            orbit_discount: ORBIT_DISCOUNT,
            garrison_discount: GARRISON_DISCOUNT,
            fleet_maintenance_scalar: FLEET_MAINTENANCE_SCALAR,
            fleets_per_colony: FLEETS_PER_COLONY,
            oversize_penalty_per_fleet: OVERSIZE_PENALTY_PER_FLEET,
            oversize_penalty_cap: OVERSIZE_PENALTY_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Balance above which a solvent empire expands.
    pub rich_threshold: f64,
    /// Income/upkeep margin below which an empire digs in.
    pub losing_margin: f64,
    /// Consecutive deficit cycles before the streak branch fires.
    pub streak_limit: u32,
    /// Balances above this (but below zero) are mild debt.
    pub mild_debt_floor: f64,
    /// Balances at or below this are severe debt.
    pub severe_debt_floor: f64,
    /// Recovery recruitment share per severity tier.
    pub recovery: RecoveryShares,
    /// Per-mode budget ratio tables. Recovery is computed, not tabled.
    pub ratios: BTreeMap<EmpireMode, PostureRatios>,
    /// Ratio table for the streak-driven consolidation branch.
    pub consolidation_catchup: PostureRatios,
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            rich_threshold: RICH_THRESHOLD,
            losing_margin: LOSING_MARGIN,
            streak_limit: STREAK_LIMIT,
            mild_debt_floor: MILD_DEBT_FLOOR,
            severe_debt_floor: SEVERE_DEBT_FLOOR,
            recovery: RecoveryShares::default(),
            ratios: default_ratio_tables(),
            consolidation_catchup: PostureRatios {
                recruitment: 0.15,
                construction: 0.35,
                research: 0.50,
                navy_share: 0.5,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Fraction of gross income a vassal forwards to its overlord.
    pub tribute_rate: f64,
    /// Balance an expanding empire saves toward before allocating freely.
    pub colonization_reserve: f64,
    /// Inflow fraction withheld while saving for colonization.
    pub forced_savings_rate: f64,
    /// Navy share of a migrated legacy recruitment bucket (army gets the rest).
    pub legacy_navy_share: f64,
    /// Fleet upkeep / income above which navy gets no new allocation.
    pub navy_cap: f64,
    /// Army upkeep / income above which army gets no new allocation.
    pub army_cap: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            tribute_rate: TRIBUTE_RATE,
            colonization_reserve: COLONIZATION_RESERVE,
            forced_savings_rate: FORCED_SAVINGS_RATE,
            legacy_navy_share: LEGACY_NAVY_SHARE,
            navy_cap: NAVY_CAP,
            army_cap: ARMY_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StimulusConfig {
    /// Balance above which a starved empire qualifies for stimulus.
    pub wealthy_threshold: f64,
    /// Cycle inflow below which income counts as starved.
    pub starved_inflow: f64,
    /// Fraction of the unbuffered balance injected.
    pub rate: f64,
    /// Balance slice never touched by stimulus.
    pub safety_buffer: f64,
    /// Hard cap on a single injection.
    pub cap: f64,
    /// Split of the injection across construction/navy/army.
    pub construction_share: f64,
    pub navy_share: f64,
    pub army_share: f64,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            wealthy_threshold: WEALTHY_THRESHOLD,
            starved_inflow: STARVED_INFLOW,
            rate: STIMULUS_RATE,
            safety_buffer: SAFETY_BUFFER,
            cap: STIMULUS_CAP,
            construction_share: 0.4,
            navy_share: 0.4,
            army_share: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsolvencyConfig {
    /// Upkeep / income ratio above which a solvent empire still sheds forces.
    pub sustainability_threshold: f64,
    /// Fraction of an asset's base cost refunded on disband or sale.
    pub disband_refund: f64,
    /// Balance below which infrastructure liquidation starts regardless of flow.
    pub deep_debt_floor: f64,
    /// Liquidation stops once the balance climbs past this.
    pub restart_threshold: f64,
}

impl Default for InsolvencyConfig {
    fn default() -> Self {
        Self {
            sustainability_threshold: SUSTAINABILITY_THRESHOLD,
            disband_refund: DISBAND_REFUND,
            deep_debt_floor: DEEP_DEBT_FLOOR,
            restart_threshold: RESTART_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Parallel project slots filled from the FIFO queue.
    pub max_slots: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self { max_slots: 3 }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Complete engine configuration, inserted as a resource at app construction.
#[derive(Resource, Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub income: IncomeConfig,
    pub upkeep: UpkeepConfig,
    pub posture: PostureConfig,
    pub allocation: AllocationConfig,
    pub stimulus: StimulusConfig,
    pub insolvency: InsolvencyConfig,
    pub research: ResearchConfig,
}

impl EconomyConfig {
    /// Parse a config from JSON. Missing fields take the documented defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Ratio table for a non-recovery mode. A mode missing from the table
    /// falls back to the consolidation baseline.
    pub fn ratios_for(&self, mode: EmpireMode) -> PostureRatios {
        match self.posture.ratios.get(&mode) {
            Some(r) => *r,
            None => {
                debug!(mode = %mode, "no ratio table configured, using consolidation baseline");
                PostureRatios::default()
            }
        }
    }

    /// Maintenance cap fraction for a force class.
    pub fn cap_for(&self, class: ForceClass) -> f64 {
        match class {
            ForceClass::Navy => self.allocation.navy_cap,
            ForceClass::Army => self.allocation.army_cap,
        }
    }

    /// Debt severity tier for a negative balance.
    pub fn debt_severity(&self, balance: f64) -> DebtSeverity {
        if balance <= self.posture.severe_debt_floor {
            DebtSeverity::Severe
        } else if balance <= self.posture.mild_debt_floor {
            DebtSeverity::Moderate
        } else {
            DebtSeverity::Mild
        }
    }
}
