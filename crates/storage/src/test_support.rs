use tempfile::TempDir;

use crate::Database;
use crate::dto::user::CreateUserRequest;
use crate::models::{Exercise, User};
use crate::repository::exercise::ExerciseRepository;
use crate::repository::user::UserRepository;

/// Fresh in-memory database with migrations applied.
pub(crate) async fn test_db() -> Database {
    let db = Database::new("sqlite::memory:").await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

/// File-backed database in a temporary directory, for tests that need
/// several connections contending for the write lock. Keep the `TempDir`
/// alive for as long as the database is used.
pub(crate) async fn file_db(max_connections: u32) -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("liftlog.db").display());
    let db = Database::connect(&url, max_connections).await.unwrap();
    db.run_migrations().await.unwrap();
    (dir, db)
}

pub(crate) async fn create_user(db: &Database, username: &str) -> User {
    UserRepository::new(db.pool())
        .create_with_profile(&CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
        })
        .await
        .unwrap()
}

pub(crate) async fn create_exercise(db: &Database, name: &str) -> Exercise {
    ExerciseRepository::new(db.pool())
        .get_or_create(name)
        .await
        .unwrap()
}
