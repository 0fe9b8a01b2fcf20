use std::borrow::Cow;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const MAX_REPS: i32 = 30;

/// Heaviest weight accepted for a single set, in kg.
pub const MAX_WEIGHT_KG: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Request payload for recording a set against a user's best
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitSetRequest {
    pub exercise_id: i64,

    #[validate(custom(function = "validate_weight"))]
    pub weight: Decimal,

    #[validate(range(min = 1, max = 30, message = "Repetitions must be between 1 and 30"))]
    pub reps: i32,
}

/// Outcome of a submitted set. A rejection is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptResult {
    pub accepted: bool,
    pub message: String,
    pub estimated_1rm: Decimal,
}

/// Current best set joined with its exercise name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSetResponse {
    pub best_set_id: i64,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub weight: Decimal,
    pub reps: i32,
    pub estimated_1rm: Decimal,
    pub updated_at: NaiveDateTime,
}

/// Superseded best set, as shown newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryResponse {
    pub weight: Decimal,
    pub reps: i32,
    pub estimated_1rm: Decimal,
    pub created_at: NaiveDateTime,
}

impl From<crate::models::BestSetHistory> for HistoryEntryResponse {
    fn from(entry: crate::models::BestSetHistory) -> Self {
        Self {
            weight: entry.weight,
            reps: entry.reps,
            estimated_1rm: entry.estimated_1rm,
            created_at: entry.created_at,
        }
    }
}

fn validate_weight(weight: &Decimal) -> Result<(), ValidationError> {
    if *weight <= Decimal::ZERO {
        return Err(weight_error("weight_not_positive", "Weight must be greater than 0"));
    }
    if *weight > MAX_WEIGHT_KG {
        return Err(weight_error("weight_too_large", "Weight must not exceed 1000 kg"));
    }
    if weight.normalize().scale() > 2 {
        return Err(weight_error(
            "weight_precision",
            "Weight must have at most 2 decimal places",
        ));
    }
    Ok(())
}

fn weight_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
