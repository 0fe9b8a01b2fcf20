pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub use error::{Result, StorageError};
pub use settings::TrainingSettings;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle over the SQLite pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::connect(database_url, 5).await
    }

    /// Opens the pool. In-memory databases live and die with their connection,
    /// so they get exactly one that is never recycled.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let in_memory = is_in_memory(database_url);

        let mut options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect_with(options)
                .await?
        };

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:plans?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://liftlog.db"));
    }

    #[tokio::test]
    async fn test_migrations_apply_to_fresh_database() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.run_migrations().await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name != 'sqlite_sequence' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(
            tables,
            vec![
                "best_set_history",
                "best_sets",
                "exercises",
                "mesocycles",
                "user_profiles",
                "users"
            ]
        );
    }
}
