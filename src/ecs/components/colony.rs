use bevy_ecs::component::Component;

/// Production-site state for one colony.
///
/// Base outputs are per-cycle figures before structure bonuses and the siege
/// penalty. `garrison_capacity` is the number of garrisoned regiments that
/// qualify for the garrison upkeep discount.
#[derive(Component, Debug, Clone)]
pub struct ColonyEconomy {
    pub tax_output: f64,
    pub mining_output: f64,
    pub research_output: f64,
    pub under_siege: bool,
    pub garrison_capacity: usize,
}

impl Default for ColonyEconomy {
    fn default() -> Self {
        Self {
            tax_output: 0.0,
            mining_output: 0.0,
            research_output: 0.0,
            under_siege: false,
            garrison_capacity: 2,
        }
    }
}

impl ColonyEconomy {
    /// Raw production value of the colony, the base for raid income.
    pub fn production_value(&self) -> f64 {
        self.tax_output + self.mining_output
    }
}
