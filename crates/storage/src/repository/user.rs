use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::dto::user::CreateUserRequest;
use crate::error::{Result, StorageError};
use crate::models::{User, UserProfile};

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user and their profile in one transaction
    pub async fn create_with_profile(&self, req: &CreateUserRequest) -> Result<User> {
        req.validate()?;

        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, created_at)
            VALUES ($1, $2, $3)
            RETURNING user_id, username, email, created_at
            "#,
        )
        .bind(req.username.trim())
        .bind(req.email.trim().to_lowercase())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::from)
        .map_err(|e| {
            if e.is_unique_violation() {
                StorageError::ConstraintViolation(
                    "A user with this username or email already exists".to_string(),
                )
            } else {
                e
            }
        })?;

        sqlx::query("INSERT INTO user_profiles (user_id, created_at) VALUES ($1, $2)")
            .bind(user.user_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Created user {} with profile", user.username);
        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, username, email, created_at FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, username, email, created_at FROM users WHERE username = $1",
        )
        .bind(username.trim())
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT user_id, created_at FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(profile)
    }
}
