//! Mode classification — second pipeline stage.
//!
//! A first-match state machine over ledger ratios and streak counters:
//! 1. RECOVERY when the balance is negative
//! 2. streak branch: DESPERATE_DEFENSE at war, catch-up CONSOLIDATION otherwise
//! 3. EXPANSION above the rich threshold
//! 4. WAR while hostilities are active
//! 5. DESPERATE_DEFENSE below the losing margin
//! 6. CONSOLIDATION
//!
//! Exactly one posture is active per empire per cycle; a transition emits
//! exactly one mode-change event. RECOVERY episodes track their start turn
//! and the deepest debt seen, reported once on exit.

use bevy_ecs::query::With;
use bevy_ecs::system::{Query, Res, ResMut};
use serde_json::json;
use tracing::debug;

use crate::ecs::clock::SimClock;
use crate::ecs::components::{
    Empire, EmpireDiplomacy, EmpireLedger, EmpirePosture, LedgerSnapshot, RecoveryEpisode,
    SimEntity,
};
use crate::ecs::resources::EventLog;
use crate::model::{EconEventKind, EconomyConfig, EmpireMode};

/// Pure mode decision, first match wins.
fn decide_mode(
    config: &EconomyConfig,
    balance: f64,
    streak: u32,
    at_war: bool,
    margin: f64,
) -> EmpireMode {
    if balance < 0.0 {
        return EmpireMode::Recovery;
    }
    if streak > config.posture.streak_limit {
        return if at_war {
            EmpireMode::DesperateDefense
        } else {
            EmpireMode::Consolidation
        };
    }
    if balance > config.posture.rich_threshold {
        return EmpireMode::Expansion;
    }
    if at_war {
        return EmpireMode::War;
    }
    if margin < config.posture.losing_margin {
        return EmpireMode::DesperateDefense;
    }
    EmpireMode::Consolidation
}

#[allow(clippy::type_complexity)]
pub fn classify_postures(
    clock: Res<SimClock>,
    config: Res<EconomyConfig>,
    mut log: ResMut<EventLog>,
    mut empires: Query<
        (
            &SimEntity,
            &mut EmpireLedger,
            &EmpireDiplomacy,
            &LedgerSnapshot,
            &mut EmpirePosture,
        ),
        With<Empire>,
    >,
) {
    let turn = clock.turn;
    for (sim, mut ledger, diplomacy, snapshot, mut posture) in empires.iter_mut() {
        if !sim.is_alive() {
            continue;
        }

        // Streak first: the streak branch below reads the updated counter.
        let net_flow = snapshot.net_income() - snapshot.total_upkeep();
        if net_flow < 0.0 {
            ledger.deficit_streak += 1;
        } else {
            ledger.deficit_streak = 0;
        }

        let mode = decide_mode(
            &config,
            ledger.balance,
            ledger.deficit_streak,
            diplomacy.at_war,
            snapshot.margin(),
        );

        let previous = posture.mode;
        if mode != previous {
            if previous == EmpireMode::Recovery {
                if let Some(episode) = posture.recovery.take() {
                    let duration = turn.saturating_sub(episode.started_turn);
                    log.record(
                        EconEventKind::RecoveryComplete,
                        turn,
                        sim.id,
                        format!("{} recovers after {duration} turns", sim.name),
                        json!({
                            "duration_turns": duration,
                            "max_debt": episode.max_debt,
                        }),
                    );
                }
            }
            posture.mode = mode;
            posture.since_turn = turn;
            debug!(empire = sim.id, from = %previous, to = %mode, "posture change");
            log.record(
                EconEventKind::ModeChange,
                turn,
                sim.id,
                format!("{} shifts from {previous} to {mode}", sim.name),
                json!({
                    "previous": previous.as_str(),
                    "new": mode.as_str(),
                    "stockpile": ledger.balance,
                }),
            );
        }

        if mode == EmpireMode::Recovery {
            let debt = -ledger.balance;
            match &mut posture.recovery {
                Some(episode) => episode.max_debt = episode.max_debt.max(debt),
                None => {
                    posture.recovery = Some(RecoveryEpisode {
                        started_turn: turn,
                        max_debt: debt,
                    });
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
