use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::models::Exercise;

/// Movements seeded into a fresh catalogue
pub const DEFAULT_EXERCISES: &[&str] = &[
    "Barbell Back Squat",
    "Barbell Bench Press",
    "Incline Barbell Bench Press",
    "Deadlift",
    "Romanian Deadlift",
    "Overhead Barbell Press",
    "Seated Dumbbell Shoulder Press",
    "Dumbbell Lateral Raises",
    "Cable Lateral Raises",
    "Weighted Pull-Ups",
    "Bent-Over Barbell Row",
    "Seated Cable Row",
    "Lat Pulldown",
    "Barbell Hip Thrust",
    "Leg Press",
    "Standing Calf Raises",
    "Seated Calf Raises",
    "Dumbbell Bench Press",
    "Incline Dumbbell Bench Press",
    "Dumbbell Flyes",
    "Weighted Dips",
    "Barbell Curl",
    "Dumbbell Curl",
    "Incline Bench Dumbbell Curl",
    "Hammer Curl",
    "Skull Crushers",
    "Cable Triceps Pushdown",
    "Leg Extension",
    "Leg Curl",
];

pub struct ExerciseRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ExerciseRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all exercises by name
    pub async fn list(&self) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT exercise_id, name, created_at FROM exercises ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(exercises)
    }

    pub async fn find_by_id(&self, exercise_id: i64) -> Result<Exercise> {
        let exercise = sqlx::query_as::<_, Exercise>(
            "SELECT exercise_id, name, created_at FROM exercises WHERE exercise_id = $1",
        )
        .bind(exercise_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(exercise)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Exercise> {
        let exercise = sqlx::query_as::<_, Exercise>(
            "SELECT exercise_id, name, created_at FROM exercises WHERE name = $1",
        )
        .bind(name.trim())
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(exercise)
    }

    pub async fn get_or_create(&self, name: &str) -> Result<Exercise> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::Validation(
                "Exercise name must not be empty".to_string(),
            ));
        }

        sqlx::query(
            "INSERT INTO exercises (name, created_at) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(Utc::now().naive_utc())
        .execute(self.pool)
        .await?;

        self.find_by_name(name).await
    }

    /// Insert the default catalogue, skipping names that already exist.
    /// Returns how many exercises were created.
    pub async fn seed_defaults(&self) -> Result<u64> {
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;
        let mut created = 0u64;

        for name in DEFAULT_EXERCISES {
            let result = sqlx::query(
                "INSERT INTO exercises (name, created_at) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING",
            )
            .bind(*name)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() > 0 {
                tracing::debug!("Created exercise: {}", name);
                created += 1;
            }
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Exercises for which the user has a current best set or any history
    pub async fn list_with_records(&self, user_id: i64) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT e.exercise_id, e.name, e.created_at
            FROM exercises e
            WHERE EXISTS (
                    SELECT 1 FROM best_sets b
                    WHERE b.exercise_id = e.exercise_id AND b.user_id = $1
                )
               OR EXISTS (
                    SELECT 1 FROM best_set_history h
                    WHERE h.exercise_id = e.exercise_id AND h.user_id = $1
                )
            ORDER BY e.name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(exercises)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn test_seed_defaults_is_idempotent() {
        let db = test_db().await;
        let repo = ExerciseRepository::new(db.pool());

        let first = repo.seed_defaults().await.unwrap();
        assert_eq!(first, DEFAULT_EXERCISES.len() as u64);
        assert_eq!(repo.seed_defaults().await.unwrap(), 0);
        assert_eq!(repo.list().await.unwrap().len(), DEFAULT_EXERCISES.len());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let db = test_db().await;
        let repo = ExerciseRepository::new(db.pool());
        for name in ["Deadlift", "Barbell Curl", "Leg Press"] {
            repo.get_or_create(name).await.unwrap();
        }

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Barbell Curl", "Deadlift", "Leg Press"]);
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_existing_name() {
        let db = test_db().await;
        let repo = ExerciseRepository::new(db.pool());

        let first = repo.get_or_create("Deadlift").await.unwrap();
        let second = repo.get_or_create(" Deadlift ").await.unwrap();
        assert_eq!(first, second);
        assert!(repo.get_or_create("   ").await.is_err());
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = test_db().await;
        let repo = ExerciseRepository::new(db.pool());
        assert!(matches!(
            repo.find_by_id(404).await,
            Err(StorageError::NotFound)
        ));
    }
}
