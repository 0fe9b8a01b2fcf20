use std::borrow::Cow;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{Result, StorageError};
use crate::models::Mesocycle;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of days from a mesocycle's first day to its last.
pub const MESOCYCLE_SPAN_DAYS: u64 = 27;

/// Request payload for generating a 4-week plan
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GeneratePlanRequest {
    #[validate(custom(function = "validate_start_date"))]
    pub start_date: String,

    #[validate(length(min = 1, message = "Select at least one exercise"))]
    pub exercise_ids: Vec<i64>,
}

impl GeneratePlanRequest {
    pub fn parsed_start_date(&self) -> Result<NaiveDate> {
        parse_start_date(&self.start_date)
    }
}

pub fn parse_start_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        StorageError::Validation(format!(
            "Invalid start date '{}', expected YYYY-MM-DD",
            value
        ))
    })
}

fn validate_start_date(value: &str) -> std::result::Result<(), ValidationError> {
    if NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).is_ok() {
        return Ok(());
    }
    let mut error = ValidationError::new("invalid_date");
    error.message = Some(Cow::Borrowed("Start date must be a valid YYYY-MM-DD date"));
    Err(error)
}

/// One planned week with its derived calendar bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWeekResponse {
    pub week: i32,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub rpe: i32,
    pub rir: i32,
    pub target_weight: Decimal,
    pub target_reps_min: i32,
    pub target_reps_max: i32,
}

impl From<&Mesocycle> for PlanWeekResponse {
    fn from(row: &Mesocycle) -> Self {
        Self {
            week: row.week,
            week_start: row.week_start(),
            week_end: row.week_end(),
            rpe: row.rpe,
            rir: row.rir,
            target_weight: row.target_weight,
            target_reps_min: row.target_reps_min,
            target_reps_max: row.target_reps_max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExercisePlanResponse {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub weeks: Vec<PlanWeekResponse>,
}

/// A full mesocycle batch grouped by exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub exercises: Vec<ExercisePlanResponse>,
}

impl PlanResponse {
    /// Groups rows already ordered by exercise name then week.
    pub fn from_rows(start_date: NaiveDate, rows: &[(Mesocycle, String)]) -> Self {
        let mut exercises: Vec<ExercisePlanResponse> = Vec::new();

        for (row, exercise_name) in rows {
            match exercises.last_mut() {
                Some(plan) if plan.exercise_id == row.exercise_id => {
                    plan.weeks.push(PlanWeekResponse::from(row));
                }
                _ => exercises.push(ExercisePlanResponse {
                    exercise_id: row.exercise_id,
                    exercise_name: exercise_name.clone(),
                    weeks: vec![PlanWeekResponse::from(row)],
                }),
            }
        }

        Self {
            start_date,
            end_date: start_date + Days::new(MESOCYCLE_SPAN_DAYS),
            exercises,
        }
    }

    pub fn row_count(&self) -> usize {
        self.exercises.iter().map(|e| e.weeks.len()).sum()
    }
}

/// Result of a successful generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub created_count: usize,
    pub plan: PlanResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_date_validation() {
        let ok = GeneratePlanRequest {
            start_date: "2026-11-02".to_string(),
            exercise_ids: vec![1],
        };
        assert!(ok.validate().is_ok());
        assert_eq!(
            ok.parsed_start_date().unwrap(),
            NaiveDate::from_ymd_opt(2026, 11, 2).unwrap()
        );

        for bad in ["2026-13-01", "02.11.2026", "", "2026-02-30"] {
            let request = GeneratePlanRequest {
                start_date: bad.to_string(),
                exercise_ids: vec![1],
            };
            assert!(request.validate().is_err(), "{bad}");
            assert!(request.parsed_start_date().is_err());
        }
    }

    #[test]
    fn test_empty_exercise_list_is_rejected() {
        let request = GeneratePlanRequest {
            start_date: "2026-11-02".to_string(),
            exercise_ids: vec![],
        };
        let err = StorageError::from(request.validate().unwrap_err());
        assert_eq!(err.to_string(), "Select at least one exercise");
    }

    #[test]
    fn test_plan_end_date_spans_four_weeks() {
        let start = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
        let plan = PlanResponse::from_rows(start, &[]);
        assert_eq!(plan.end_date, NaiveDate::from_ymd_opt(2026, 11, 29).unwrap());
        assert_eq!(plan.row_count(), 0);
    }
}
