use serde::{Deserialize, Serialize};

/// Telemetry event kinds emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EconEventKind {
    ModeChange,
    RecoveryComplete,
    TributeTransfer,
    BudgetAllocation,
    DebtForfeiture,
    ForcedSavings,
    Stimulus,
    ResearchComplete,
    InsolvencySweep,
    Liquidation,
}

string_enum!(EconEventKind {
    ModeChange => "mode_change",
    RecoveryComplete => "recovery_complete",
    TributeTransfer => "tribute_transfer",
    BudgetAllocation => "budget_allocation",
    DebtForfeiture => "debt_forfeiture",
    ForcedSavings => "forced_savings",
    Stimulus => "stimulus",
    ResearchComplete => "research_complete",
    InsolvencySweep => "insolvency_sweep",
    Liquidation => "liquidation",
});

/// One telemetry record: what happened, to which empire, on which turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconEvent {
    pub id: u64,
    pub kind: EconEventKind,
    pub turn: u64,
    pub empire: u64,
    pub description: String,
    /// Kind-specific structured payload.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_snake_case_kind() {
        let event = EconEvent {
            id: 7,
            kind: EconEventKind::ModeChange,
            turn: 12,
            empire: 3,
            description: "Terra shifts to war".to_string(),
            data: serde_json::json!({"previous": "consolidation", "new": "war"}),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""kind":"mode_change""#));
        let back: EconEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn null_data_is_omitted() {
        let event = EconEvent {
            id: 1,
            kind: EconEventKind::Liquidation,
            turn: 0,
            empire: 1,
            description: String::new(),
            data: serde_json::Value::Null,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("data"));
    }
}
