use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::services::one_rep_max::OneRepMaxFormula;

/// Default plate weight in kg; the loadable step is one plate per side.
pub const DEFAULT_PLATE_WEIGHT_KG: Decimal = Decimal::from_parts(125, 0, 0, false, 2);

/// Movements a mesocycle is generated for when the caller names none.
pub const MAIN_EXERCISES: [&str; 3] = ["Barbell Back Squat", "Barbell Bench Press", "Deadlift"];

/// Engine knobs that callers may override from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSettings {
    pub formula: OneRepMaxFormula,
    pub plate_weight: Decimal,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            formula: OneRepMaxFormula::DEFAULT,
            plate_weight: DEFAULT_PLATE_WEIGHT_KG,
        }
    }
}

impl TrainingSettings {
    /// Smallest symmetric load change: one plate on each side of the bar.
    pub fn plate_step(&self) -> Decimal {
        self.plate_weight * Decimal::from(2)
    }
}
