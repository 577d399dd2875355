//! Budget allocation — third pipeline stage.
//!
//! Chained step order per cycle:
//! 1. `collect_tribute` — vassals forward a gross-income cut to their overlord
//! 2. `allocate_budgets` — inflow, forced savings, normalization, legacy
//!    bucket migration, then either the debt path (forfeit buckets) or the
//!    surplus path (cap-checked allocation per posture ratios)
//! 3. `advance_research` (separate module)
//! 4. `inject_stimulus` — wealthy-but-starved empires prime their buckets
//! 5. `settle_ledgers` — unconditional income/upkeep/allocation settlement
//!
//! Allocation credits buckets immediately but is settled against the ledger
//! once, in `settle_ledgers`, so every step before that sees the cycle's
//! opening balance.

use bevy_ecs::entity::Entity;
use bevy_ecs::query::With;
use bevy_ecs::system::{Query, Res, ResMut};
use serde_json::json;
use tracing::debug;

use crate::ecs::clock::SimClock;
use crate::ecs::components::{
    Empire, EmpireBudget, EmpireDiplomacy, EmpireLedger, EmpirePosture, LedgerSnapshot, SimEntity,
};
use crate::ecs::resources::{EventLog, SimEntityMap};
use crate::model::{BudgetCategory, EconEventKind, EconomyConfig, EmpireMode, ForceClass};

// ---------------------------------------------------------------------------
// Tribute
// ---------------------------------------------------------------------------

#[allow(clippy::type_complexity)]
pub fn collect_tribute(
    clock: Res<SimClock>,
    config: Res<EconomyConfig>,
    map: Res<SimEntityMap>,
    mut log: ResMut<EventLog>,
    mut empires: Query<
        (
            Entity,
            &SimEntity,
            &mut EmpireLedger,
            &EmpireDiplomacy,
            &mut LedgerSnapshot,
        ),
        With<Empire>,
    >,
) {
    struct Transfer {
        vassal: Entity,
        vassal_id: u64,
        vassal_name: String,
        overlord: Entity,
        overlord_id: u64,
        amount: f64,
    }

    // Pass 1: read-only sweep collecting transfers, so the credit side never
    // observes a half-applied cycle.
    let mut transfers: Vec<Transfer> = Vec::new();
    for (entity, sim, _, diplomacy, snapshot) in empires.iter() {
        if !sim.is_alive() {
            continue;
        }
        let Some(overlord_id) = diplomacy.overlord else {
            continue;
        };
        let Some(overlord) = map.get_entity(overlord_id) else {
            continue;
        };
        if overlord == entity {
            continue;
        }
        let amount = snapshot.gross_income() * config.allocation.tribute_rate;
        if amount <= 0.0 {
            continue;
        }
        let overlord_alive = empires
            .get(overlord)
            .is_ok_and(|(_, overlord_sim, _, _, _)| overlord_sim.is_alive());
        if !overlord_alive {
            continue;
        }
        transfers.push(Transfer {
            vassal: entity,
            vassal_id: sim.id,
            vassal_name: sim.name.clone(),
            overlord,
            overlord_id,
            amount,
        });
    }

    // Pass 2: debit payers, credit payees, one event per transfer.
    for transfer in transfers {
        if let Ok((_, _, _, _, mut snapshot)) = empires.get_mut(transfer.vassal) {
            snapshot.tribute_paid = transfer.amount;
        }
        if let Ok((_, _, mut ledger, _, _)) = empires.get_mut(transfer.overlord) {
            ledger.balance += transfer.amount;
        }
        debug!(
            vassal = transfer.vassal_id,
            overlord = transfer.overlord_id,
            amount = transfer.amount,
            "tribute transfer"
        );
        log.record(
            EconEventKind::TributeTransfer,
            clock.turn,
            transfer.vassal_id,
            format!("{} pays tribute", transfer.vassal_name),
            json!({
                "overlord": transfer.overlord_id,
                "amount": transfer.amount,
            }),
        );
    }
}

// ---------------------------------------------------------------------------
// Discretionary allocation
// ---------------------------------------------------------------------------

/// Final per-bucket shares for one cycle, after mode/tier resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetShares {
    pub research: f64,
    pub construction: f64,
    pub navy: f64,
    pub army: f64,
}

/// Resolve the share table for an empire's current posture.
///
/// Recovery shares come from the debt-severity tier, the streak-driven
/// consolidation branch uses the catch-up table, everything else reads the
/// configured per-mode table.
pub fn budget_shares(
    config: &EconomyConfig,
    mode: EmpireMode,
    streak: u32,
    balance: f64,
) -> BudgetShares {
    match mode {
        EmpireMode::Recovery => {
            let severity = config.debt_severity(balance.min(0.0));
            let recruitment = config.posture.recovery.for_severity(severity);
            let navy_share = config.posture.recovery.navy_share;
            BudgetShares {
                research: 0.0,
                construction: 1.0 - recruitment,
                navy: recruitment * navy_share,
                army: recruitment * (1.0 - navy_share),
            }
        }
        mode => {
            let ratios = if mode == EmpireMode::Consolidation && streak > config.posture.streak_limit
            {
                config.posture.consolidation_catchup
            } else {
                config.ratios_for(mode)
            };
            BudgetShares {
                research: ratios.research,
                construction: ratios.construction,
                navy: ratios.recruitment * ratios.navy_share,
                army: ratios.recruitment * (1.0 - ratios.navy_share),
            }
        }
    }
}

#[allow(clippy::type_complexity)]
pub fn allocate_budgets(
    clock: Res<SimClock>,
    config: Res<EconomyConfig>,
    mut log: ResMut<EventLog>,
    mut empires: Query<
        (
            &SimEntity,
            &mut EmpireLedger,
            &mut EmpireBudget,
            &EmpirePosture,
            &mut LedgerSnapshot,
        ),
        With<Empire>,
    >,
) {
    let turn = clock.turn;
    for (sim, mut ledger, mut budget, posture, mut snapshot) in empires.iter_mut() {
        if !sim.is_alive() {
            continue;
        }

        let inflow = (snapshot.net_income() - snapshot.total_upkeep()).max(0.0);

        // Forced savings: an expanding empire short of the colonization
        // reserve banks most of the cycle.
        let mut available = inflow;
        let mut withheld = 0.0;
        if posture.mode == EmpireMode::Expansion
            && ledger.balance < config.allocation.colonization_reserve
        {
            withheld = inflow * config.allocation.forced_savings_rate;
            available = inflow - withheld;
            if withheld > 0.0 {
                log.record(
                    EconEventKind::ForcedSavings,
                    turn,
                    sim.id,
                    format!("{} banks toward colonization", sim.name),
                    json!({ "withheld": withheld }),
                );
            }
        }

        budget.normalize();

        // One-time migration of the legacy combined recruitment bucket.
        let legacy = budget.amount(BudgetCategory::Recruitment);
        if legacy > 0.0 {
            let taken = budget.withdraw_clamped(BudgetCategory::Recruitment, legacy);
            let navy_cut = taken * config.allocation.legacy_navy_share;
            budget.credit(BudgetCategory::Navy, navy_cut);
            budget.credit(BudgetCategory::Army, taken - navy_cut);
        }
        budget.buckets.remove(&BudgetCategory::Recruitment);

        if ledger.balance < 0.0 {
            // Debt path: every positive bucket goes to the creditors; no
            // discretionary allocation this cycle.
            let forfeited = budget.forfeit_all();
            if forfeited > 0.0 {
                ledger.balance += forfeited;
                log.record(
                    EconEventKind::DebtForfeiture,
                    turn,
                    sim.id,
                    format!("{} forfeits budgets against debt", sim.name),
                    json!({ "forfeited": forfeited }),
                );
            }
            continue;
        }

        // Surplus path: maintenance-cap check per force class, then the
        // posture ratio split.
        let mut shares = budget_shares(&config, posture.mode, ledger.deficit_streak, ledger.balance);
        let income_floor = snapshot.gross_income().max(1.0);
        for class in [ForceClass::Navy, ForceClass::Army] {
            let ratio = snapshot.upkeep_of(class.upkeep_class()) / income_floor;
            if ratio >= config.cap_for(class) {
                let share = match class {
                    ForceClass::Navy => &mut shares.navy,
                    ForceClass::Army => &mut shares.army,
                };
                let redirected = *share / 2.0;
                *share = 0.0;
                shares.construction += redirected;
                debug!(
                    empire = sim.id,
                    class = %class,
                    ratio,
                    "category over maintenance cap, no new allocation"
                );
            }
        }

        let amounts = [
            (BudgetCategory::Research, shares.research * available),
            (BudgetCategory::Construction, shares.construction * available),
            (BudgetCategory::Navy, shares.navy * available),
            (BudgetCategory::Army, shares.army * available),
        ];
        let mut allocated = 0.0;
        for (category, amount) in amounts {
            if amount > 0.0 {
                budget.credit(category, amount);
                allocated += amount;
            }
        }
        snapshot.allocated = allocated;

        if inflow > 0.0 {
            log.record(
                EconEventKind::BudgetAllocation,
                turn,
                sim.id,
                format!("{} allocates surplus as {}", sim.name, posture.mode),
                json!({
                    "inflow": inflow,
                    "withheld": withheld,
                    "research": amounts[0].1,
                    "construction": amounts[1].1,
                    "navy": amounts[2].1,
                    "army": amounts[3].1,
                }),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Stimulus
// ---------------------------------------------------------------------------

#[allow(clippy::type_complexity)]
pub fn inject_stimulus(
    clock: Res<SimClock>,
    config: Res<EconomyConfig>,
    mut log: ResMut<EventLog>,
    mut empires: Query<
        (
            &SimEntity,
            &mut EmpireLedger,
            &mut EmpireBudget,
            &LedgerSnapshot,
        ),
        With<Empire>,
    >,
) {
    let cfg = &config.stimulus;
    for (sim, mut ledger, mut budget, snapshot) in empires.iter_mut() {
        if !sim.is_alive() {
            continue;
        }
        let inflow = (snapshot.net_income() - snapshot.total_upkeep()).max(0.0);
        if ledger.balance <= cfg.wealthy_threshold || inflow >= cfg.starved_inflow {
            continue;
        }
        let amount = (cfg.rate * (ledger.balance - cfg.safety_buffer))
            .min(cfg.cap)
            .max(0.0);
        if amount <= 0.0 {
            continue;
        }
        ledger.balance -= amount;
        budget.credit(BudgetCategory::Construction, amount * cfg.construction_share);
        budget.credit(BudgetCategory::Navy, amount * cfg.navy_share);
        budget.credit(BudgetCategory::Army, amount * cfg.army_share);
        debug!(empire = sim.id, amount, "stimulus injection");
        log.record(
            EconEventKind::Stimulus,
            clock.turn,
            sim.id,
            format!("{} primes its idle economy", sim.name),
            json!({
                "amount": amount,
                "construction": amount * cfg.construction_share,
                "navy": amount * cfg.navy_share,
                "army": amount * cfg.army_share,
            }),
        );
    }
}

// ---------------------------------------------------------------------------
// Ledger settlement
// ---------------------------------------------------------------------------

/// Unconditional end-of-allocation settlement: income in, upkeep out, and
/// the cycle's bucket allocations paid for. Applies to solvent and
/// insolvent empires alike.
pub fn settle_ledgers(
    mut empires: Query<(&SimEntity, &mut EmpireLedger, &LedgerSnapshot), With<Empire>>,
) {
    for (sim, mut ledger, snapshot) in empires.iter_mut() {
        if !sim.is_alive() {
            continue;
        }
        ledger.balance += snapshot.net_income() - snapshot.total_upkeep() - snapshot.allocated;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
