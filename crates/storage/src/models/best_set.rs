use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::decimal_column;

/// A user's current best set for one exercise.
///
/// There is at most one row per (user, exercise). `estimated_1rm` is always
/// derived from `weight` and `reps` when the row is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSet {
    pub best_set_id: i64,
    pub user_id: i64,
    pub exercise_id: i64,
    pub weight: Decimal,
    pub reps: i32,
    pub estimated_1rm: Decimal,
    pub updated_at: NaiveDateTime,
}

impl<'r> FromRow<'r, SqliteRow> for BestSet {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            best_set_id: row.try_get("best_set_id")?,
            user_id: row.try_get("user_id")?,
            exercise_id: row.try_get("exercise_id")?,
            weight: decimal_column(row, "weight")?,
            reps: row.try_get("reps")?,
            estimated_1rm: decimal_column(row, "estimated_1rm")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
