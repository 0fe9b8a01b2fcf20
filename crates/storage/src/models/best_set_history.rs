use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::decimal_column;

/// Snapshot of a best set taken at the moment it was superseded.
///
/// Rows are append-only; they disappear only when the best set they track
/// is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSetHistory {
    pub history_id: i64,
    pub user_id: i64,
    pub exercise_id: i64,
    pub weight: Decimal,
    pub reps: i32,
    pub estimated_1rm: Decimal,
    pub created_at: NaiveDateTime,
}

impl<'r> FromRow<'r, SqliteRow> for BestSetHistory {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            history_id: row.try_get("history_id")?,
            user_id: row.try_get("user_id")?,
            exercise_id: row.try_get("exercise_id")?,
            weight: decimal_column(row, "weight")?,
            reps: row.try_get("reps")?,
            estimated_1rm: decimal_column(row, "estimated_1rm")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
