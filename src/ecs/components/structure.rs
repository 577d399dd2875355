use bevy_ecs::component::Component;

use crate::model::StructureClass;

/// Infrastructure on a colony. Output bonuses add to the colony's base
/// production; upkeep accrues to the Infrastructure class. Economy-class
/// structures are protected from liquidation.
#[derive(Component, Debug, Clone)]
pub struct StructureState {
    pub class: StructureClass,
    pub cost: f64,
    pub upkeep: f64,
    pub tax_bonus: f64,
    pub mining_bonus: f64,
    pub research_bonus: f64,
}

impl Default for StructureState {
    fn default() -> Self {
        Self {
            class: StructureClass::Industry,
            cost: 0.0,
            upkeep: 0.0,
            tax_bonus: 0.0,
            mining_bonus: 0.0,
            research_bonus: 0.0,
        }
    }
}
