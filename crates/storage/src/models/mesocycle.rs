use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::decimal_column;

/// One week of a generated mesocycle for one exercise.
///
/// Unique on (user, exercise, start_date, week); `week` is 1..=4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mesocycle {
    pub mesocycle_id: i64,
    pub user_id: i64,
    pub exercise_id: i64,
    pub start_date: NaiveDate,
    pub week: i32,
    pub rpe: i32,
    pub rir: i32,
    pub target_weight: Decimal,
    pub target_reps_min: i32,
    pub target_reps_max: i32,
    pub created_at: NaiveDateTime,
}

impl Mesocycle {
    /// First calendar day of this row's week.
    pub fn week_start(&self) -> NaiveDate {
        week_start(self.start_date, self.week)
    }

    /// Last calendar day of this row's week.
    pub fn week_end(&self) -> NaiveDate {
        self.week_start() + Days::new(6)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Mesocycle {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            mesocycle_id: row.try_get("mesocycle_id")?,
            user_id: row.try_get("user_id")?,
            exercise_id: row.try_get("exercise_id")?,
            start_date: row.try_get("start_date")?,
            week: row.try_get("week")?,
            rpe: row.try_get("rpe")?,
            rir: row.try_get("rir")?,
            target_weight: decimal_column(row, "target_weight")?,
            target_reps_min: row.try_get("target_reps_min")?,
            target_reps_max: row.try_get("target_reps_max")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A planned week before it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMesocycle {
    pub exercise_id: i64,
    pub week: i32,
    pub rpe: i32,
    pub rir: i32,
    pub target_weight: Decimal,
    pub target_reps_min: i32,
    pub target_reps_max: i32,
}

pub(crate) fn week_start(start_date: NaiveDate, week: i32) -> NaiveDate {
    let offset = u64::try_from(week.saturating_sub(1)).unwrap_or(0) * 7;
    start_date + Days::new(offset)
}
