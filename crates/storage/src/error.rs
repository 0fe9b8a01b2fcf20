use thiserror::Error;
use validator::ValidationErrors;

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("{0}")]
    Validation(String),

    #[error("No best set recorded for: {}", missing.join(", "))]
    MissingBaseline { missing: Vec<String> },

    #[error("The record is being modified by another request, please retry")]
    Conflict,
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e)) if e.is_unique_violation()
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e)) if e.is_foreign_key_violation()
        )
    }

    /// True when SQLite refused the statement because another connection
    /// holds the write lock (SQLITE_BUSY / SQLITE_LOCKED and their extended codes).
    pub fn is_busy(&self) -> bool {
        match self {
            StorageError::Database(sqlx::Error::Database(e)) => e
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)),
            StorageError::Conflict => true,
            _ => false,
        }
    }

    /// Errors the caller can safely retry.
    pub fn is_transient(&self) -> bool {
        self.is_busy()
    }
}

impl From<ValidationErrors> for StorageError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{}: {}", field, e.code))
                })
            })
            .collect();
        messages.sort();

        StorageError::Validation(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_baseline_lists_every_exercise() {
        let err = StorageError::MissingBaseline {
            missing: vec!["Barbell Bench Press".to_string(), "Deadlift".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "No best set recorded for: Barbell Bench Press, Deadlift"
        );
    }

    #[test]
    fn test_conflict_is_transient() {
        assert!(StorageError::Conflict.is_transient());
        assert!(!StorageError::NotFound.is_transient());
        assert!(!StorageError::Validation("bad".to_string()).is_transient());
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = StorageError::Validation("Weight must be greater than 0".to_string());
        assert_eq!(err.to_string(), "Weight must be greater than 0");
    }
}
