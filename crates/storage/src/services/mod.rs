pub mod best_set;
pub mod mesocycle;
pub mod one_rep_max;
pub mod progress;

use std::future::Future;

use crate::error::{Result, StorageError};

/// Run a store operation, retrying once if SQLite reports the database busy.
/// A second busy error surfaces as [`StorageError::Conflict`].
pub(crate) async fn retry_once<T, F, Fut>(operation: &str, mut run: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match run().await {
        Err(e) if e.is_busy() => {
            tracing::warn!("{} hit a busy database, retrying once: {}", operation, e);
            match run().await {
                Err(e) if e.is_busy() => {
                    tracing::warn!("{} still contended after retry", operation);
                    Err(StorageError::Conflict)
                }
                other => other,
            }
        }
        other => other,
    }
}
