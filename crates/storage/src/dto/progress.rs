use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub estimated_1rm: Decimal,
}

/// Chart-ready series for one exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressChart {
    pub exercise_id: i64,
    pub exercise: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Decimal>,
}

impl ProgressChart {
    pub fn new(exercise_id: i64, exercise: String, points: &[ProgressPoint]) -> Self {
        Self {
            exercise_id,
            exercise,
            dates: points.iter().map(|p| p.date).collect(),
            values: points.iter().map(|p| p.estimated_1rm).collect(),
        }
    }
}
