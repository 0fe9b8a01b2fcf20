use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{FromRow, Row, Sqlite, SqlitePool, Transaction};

use crate::error::Result;
use crate::models::{Mesocycle, NewMesocycle, decimal_text};

const PLAN_ROWS_QUERY: &str = r#"
    SELECT m.mesocycle_id, m.user_id, m.exercise_id, m.start_date, m.week,
           m.rpe, m.rir, m.target_weight, m.target_reps_min, m.target_reps_max,
           m.created_at, e.name AS exercise_name
    FROM mesocycles m
    JOIN exercises e ON e.exercise_id = m.exercise_id
    WHERE m.user_id = $1 AND m.start_date = $2
    ORDER BY e.name, m.week
"#;

/// Repository for generated mesocycle weeks
pub struct MesocycleRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MesocycleRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Remove a user's batch for one start date; returns the rows removed
    pub async fn delete_batch(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        start_date: NaiveDate,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM mesocycles WHERE user_id = $1 AND start_date = $2")
            .bind(user_id)
            .bind(start_date)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert_batch(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        start_date: NaiveDate,
        weeks: &[NewMesocycle],
        now: NaiveDateTime,
    ) -> Result<u64> {
        let mut inserted = 0u64;

        for week in weeks {
            let result = sqlx::query(
                r#"
                INSERT INTO mesocycles (
                    user_id, exercise_id, start_date, week, rpe, rir,
                    target_weight, target_reps_min, target_reps_max, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(user_id)
            .bind(week.exercise_id)
            .bind(start_date)
            .bind(week.week)
            .bind(week.rpe)
            .bind(week.rir)
            .bind(decimal_text(week.target_weight))
            .bind(week.target_reps_min)
            .bind(week.target_reps_max)
            .bind(now)
            .execute(&mut **tx)
            .await?;

            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Rows of a batch with exercise names, read inside the writing transaction
    pub async fn list_batch_in_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        start_date: NaiveDate,
    ) -> Result<Vec<(Mesocycle, String)>> {
        let rows = sqlx::query(PLAN_ROWS_QUERY)
            .bind(user_id)
            .bind(start_date)
            .fetch_all(&mut **tx)
            .await?;

        Ok(decode_plan_rows(&rows)?)
    }

    /// Rows of a batch with exercise names, ordered by exercise name then week
    pub async fn list_batch(
        &self,
        user_id: i64,
        start_date: NaiveDate,
    ) -> Result<Vec<(Mesocycle, String)>> {
        let rows = sqlx::query(PLAN_ROWS_QUERY)
            .bind(user_id)
            .bind(start_date)
            .fetch_all(self.pool)
            .await?;

        Ok(decode_plan_rows(&rows)?)
    }

    /// Start date of the batch the user generated last
    pub async fn latest_generated_start_date(&self, user_id: i64) -> Result<Option<NaiveDate>> {
        let start_date = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT start_date FROM mesocycles
            WHERE user_id = $1
            ORDER BY created_at DESC, mesocycle_id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(start_date)
    }

    pub async fn count_for_user(&self, user_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mesocycles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

fn decode_plan_rows(
    rows: &[sqlx::sqlite::SqliteRow],
) -> std::result::Result<Vec<(Mesocycle, String)>, sqlx::Error> {
    rows.iter()
        .map(|row| Ok((Mesocycle::from_row(row)?, row.try_get("exercise_name")?)))
        .collect()
}
