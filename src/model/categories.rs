use serde::{Deserialize, Serialize};

/// Operating posture of an empire, decided once per cycle by the mode
/// classifier. Governs which budget ratio table the allocator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EmpireMode {
    Expansion,
    War,
    DesperateDefense,
    Consolidation,
    Recovery,
}

string_enum!(EmpireMode {
    Expansion => "expansion",
    War => "war",
    DesperateDefense => "desperate_defense",
    Consolidation => "consolidation",
    Recovery => "recovery",
});

/// How deep in debt a RECOVERY empire is. Picks the recruitment share
/// of the recovery ratio split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DebtSeverity {
    Mild,
    Moderate,
    Severe,
}

string_enum!(DebtSeverity {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

/// Persistent spending bucket keys. `Recruitment` is a legacy combined
/// bucket that migrates once into Navy/Army on the next allocation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum BudgetCategory {
    Research,
    Construction,
    Navy,
    Army,
    Recruitment,
}

string_enum!(BudgetCategory {
    Research => "research",
    Construction => "construction",
    Navy => "navy",
    Army => "army",
    Recruitment => "recruitment",
});

/// Gross income source tags on the ledger snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum IncomeSource {
    Tax,
    Mining,
    Trade,
    Raid,
}

string_enum!(IncomeSource {
    Tax => "tax",
    Mining => "mining",
    Trade => "trade",
    Raid => "raid",
});

/// Upkeep subcategory tags on the ledger snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum UpkeepClass {
    Fleet,
    Army,
    Infrastructure,
}

string_enum!(UpkeepClass {
    Fleet => "fleet",
    Army => "army",
    Infrastructure => "infrastructure",
});

/// Force class of a disbandable asset (ships are NAVY, regiments are ARMY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ForceClass {
    Navy,
    Army,
}

string_enum!(ForceClass {
    Navy => "navy",
    Army => "army",
});

impl ForceClass {
    /// The snapshot upkeep class this force class accrues against.
    pub fn upkeep_class(self) -> UpkeepClass {
        match self {
            ForceClass::Navy => UpkeepClass::Fleet,
            ForceClass::Army => UpkeepClass::Army,
        }
    }
}

/// Structure role tag. Economy structures are protected from liquidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StructureClass {
    Economy,
    Industry,
    Military,
    Science,
}

string_enum!(StructureClass {
    Economy => "economy",
    Industry => "industry",
    Military => "military",
    Science => "science",
});

/// One spending executor slot. The two navy executors drain the same
/// `BudgetCategory::Navy` bucket in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ExecutorKind {
    Research,
    Construction,
    NavyCommission,
    NavyProduction,
    ArmyProduction,
}

string_enum!(ExecutorKind {
    Research => "research",
    Construction => "construction",
    NavyCommission => "navy_commission",
    NavyProduction => "navy_production",
    ArmyProduction => "army_production",
});

impl ExecutorKind {
    /// Fixed drain order for the spend stage.
    pub const DRAIN_ORDER: [ExecutorKind; 5] = [
        ExecutorKind::Research,
        ExecutorKind::Construction,
        ExecutorKind::NavyCommission,
        ExecutorKind::NavyProduction,
        ExecutorKind::ArmyProduction,
    ];

    /// The bucket this executor draws from.
    pub fn bucket(self) -> BudgetCategory {
        match self {
            ExecutorKind::Research => BudgetCategory::Research,
            ExecutorKind::Construction => BudgetCategory::Construction,
            ExecutorKind::NavyCommission | ExecutorKind::NavyProduction => BudgetCategory::Navy,
            ExecutorKind::ArmyProduction => BudgetCategory::Army,
        }
    }
}
