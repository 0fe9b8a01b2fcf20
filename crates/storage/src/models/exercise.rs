use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Shared reference data; names are unique and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub exercise_id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
}
