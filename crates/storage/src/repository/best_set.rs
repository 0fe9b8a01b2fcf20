use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::dto::best_set::BestSetResponse;
use crate::error::Result;
use crate::models::{BestSet, BestSetHistory, decimal_column, decimal_text};

const BEST_SET_COLUMNS: &str =
    "best_set_id, user_id, exercise_id, weight, reps, estimated_1rm, updated_at";

const HISTORY_COLUMNS: &str =
    "history_id, user_id, exercise_id, weight, reps, estimated_1rm, created_at";

/// Values written to a best set row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetValues {
    pub weight: Decimal,
    pub reps: i32,
    pub estimated_1rm: Decimal,
}

/// Repository for best sets and their append-only history
pub struct BestSetRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BestSetRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: i64, exercise_id: i64) -> Result<Option<BestSet>> {
        let best_set = sqlx::query_as::<_, BestSet>(&format!(
            "SELECT {BEST_SET_COLUMNS} FROM best_sets WHERE user_id = $1 AND exercise_id = $2"
        ))
        .bind(user_id)
        .bind(exercise_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(best_set)
    }

    /// Current best sets with exercise names, ordered by exercise name
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<BestSetResponse>> {
        let rows = sqlx::query(
            r#"
            SELECT b.best_set_id, b.exercise_id, e.name AS exercise_name,
                   b.weight, b.reps, b.estimated_1rm, b.updated_at
            FROM best_sets b
            JOIN exercises e ON e.exercise_id = b.exercise_id
            WHERE b.user_id = $1
            ORDER BY e.name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let best_sets = rows
            .iter()
            .map(best_set_response)
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?;

        Ok(best_sets)
    }

    /// History for one exercise, newest first
    pub async fn list_history(&self, user_id: i64, exercise_id: i64) -> Result<Vec<BestSetHistory>> {
        let history = sqlx::query_as::<_, BestSetHistory>(&format!(
            r#"
            SELECT {HISTORY_COLUMNS}
            FROM best_set_history
            WHERE user_id = $1 AND exercise_id = $2
            ORDER BY created_at DESC, history_id DESC
            "#
        ))
        .bind(user_id)
        .bind(exercise_id)
        .fetch_all(self.pool)
        .await?;

        Ok(history)
    }

    /// History for one exercise, oldest first
    pub async fn list_history_chronological(
        &self,
        user_id: i64,
        exercise_id: i64,
    ) -> Result<Vec<BestSetHistory>> {
        let history = sqlx::query_as::<_, BestSetHistory>(&format!(
            r#"
            SELECT {HISTORY_COLUMNS}
            FROM best_set_history
            WHERE user_id = $1 AND exercise_id = $2
            ORDER BY created_at, history_id
            "#
        ))
        .bind(user_id)
        .bind(exercise_id)
        .fetch_all(self.pool)
        .await?;

        Ok(history)
    }

    /// Take the write lock for the transaction before anything is read.
    ///
    /// SQLite starts a write transaction on the first write statement even
    /// when it matches no rows, so two submissions for the same pair queue
    /// here instead of both reading the old best.
    pub async fn lock_for_update(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        exercise_id: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE best_sets SET updated_at = updated_at
            WHERE user_id = $1 AND exercise_id = $2
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    pub async fn find_in_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        exercise_id: i64,
    ) -> Result<Option<BestSet>> {
        let best_set = sqlx::query_as::<_, BestSet>(&format!(
            "SELECT {BEST_SET_COLUMNS} FROM best_sets WHERE user_id = $1 AND exercise_id = $2"
        ))
        .bind(user_id)
        .bind(exercise_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(best_set)
    }

    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        exercise_id: i64,
        values: SetValues,
        now: NaiveDateTime,
    ) -> Result<BestSet> {
        let best_set = sqlx::query_as::<_, BestSet>(&format!(
            r#"
            INSERT INTO best_sets (user_id, exercise_id, weight, reps, estimated_1rm, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BEST_SET_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(exercise_id)
        .bind(decimal_text(values.weight))
        .bind(values.reps)
        .bind(decimal_text(values.estimated_1rm))
        .bind(now)
        .fetch_one(&mut **tx)
        .await?;

        Ok(best_set)
    }

    /// Copy the current values of a best set into the history log
    pub async fn archive(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        current: &BestSet,
        now: NaiveDateTime,
    ) -> Result<BestSetHistory> {
        let entry = sqlx::query_as::<_, BestSetHistory>(&format!(
            r#"
            INSERT INTO best_set_history (user_id, exercise_id, weight, reps, estimated_1rm, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {HISTORY_COLUMNS}
            "#
        ))
        .bind(current.user_id)
        .bind(current.exercise_id)
        .bind(decimal_text(current.weight))
        .bind(current.reps)
        .bind(decimal_text(current.estimated_1rm))
        .bind(now)
        .fetch_one(&mut **tx)
        .await?;

        Ok(entry)
    }

    /// Overwrite a best set in place, keeping its identity
    pub async fn overwrite(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        best_set_id: i64,
        values: SetValues,
        now: NaiveDateTime,
    ) -> Result<BestSet> {
        let best_set = sqlx::query_as::<_, BestSet>(&format!(
            r#"
            UPDATE best_sets
            SET weight = $2, reps = $3, estimated_1rm = $4, updated_at = $5
            WHERE best_set_id = $1
            RETURNING {BEST_SET_COLUMNS}
            "#
        ))
        .bind(best_set_id)
        .bind(decimal_text(values.weight))
        .bind(values.reps)
        .bind(decimal_text(values.estimated_1rm))
        .bind(now)
        .fetch_one(&mut **tx)
        .await?;

        Ok(best_set)
    }

    /// Delete a best set only if it belongs to `user_id`.
    /// Returns the exercise it tracked, or `None` when nothing matched.
    pub async fn delete_owned(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        best_set_id: i64,
    ) -> Result<Option<i64>> {
        let exercise_id = sqlx::query_scalar::<_, i64>(
            "DELETE FROM best_sets WHERE best_set_id = $1 AND user_id = $2 RETURNING exercise_id",
        )
        .bind(best_set_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(exercise_id)
    }

    pub async fn delete_history(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        exercise_id: i64,
    ) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM best_set_history WHERE user_id = $1 AND exercise_id = $2")
                .bind(user_id)
                .bind(exercise_id)
                .execute(&mut **tx)
                .await?;

        Ok(result.rows_affected())
    }
}

fn best_set_response(row: &SqliteRow) -> std::result::Result<BestSetResponse, sqlx::Error> {
    Ok(BestSetResponse {
        best_set_id: row.try_get("best_set_id")?,
        exercise_id: row.try_get("exercise_id")?,
        exercise_name: row.try_get("exercise_name")?,
        weight: decimal_column(row, "weight")?,
        reps: row.try_get("reps")?,
        estimated_1rm: decimal_column(row, "estimated_1rm")?,
        updated_at: row.try_get("updated_at")?,
    })
}

