use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use validator::Validate;

use crate::dto::best_set::{AttemptResult, BestSetResponse, HistoryEntryResponse, SubmitSetRequest};
use crate::error::{Result, StorageError};
use crate::models::{BestSet, Exercise};
use crate::repository::best_set::{BestSetRepository, SetValues};
use crate::repository::exercise::ExerciseRepository;
use crate::services::retry_once;
use crate::settings::TrainingSettings;

/// What to do with a submitted set given the current best.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptDecision<'a> {
    /// No best set yet.
    Create,
    /// The new estimate is at least as good; archive `current` and overwrite it.
    Supersede(&'a BestSet),
    /// The new estimate is worse; leave `current` alone.
    Reject(&'a BestSet),
}

/// An equal estimate supersedes: only a strictly worse set is rejected.
pub fn decide_attempt(current: Option<&BestSet>, new_estimate: Decimal) -> AttemptDecision<'_> {
    match current {
        None => AttemptDecision::Create,
        Some(best) if new_estimate < best.estimated_1rm => AttemptDecision::Reject(best),
        Some(best) => AttemptDecision::Supersede(best),
    }
}

/// Record a set; it replaces the user's best for the exercise unless its
/// estimated 1RM is lower.
pub async fn submit_attempt(
    pool: &SqlitePool,
    settings: &TrainingSettings,
    user_id: i64,
    req: &SubmitSetRequest,
) -> Result<AttemptResult> {
    req.validate()?;

    let exercise = ExerciseRepository::new(pool)
        .find_by_id(req.exercise_id)
        .await?;

    let values = SetValues {
        weight: req.weight.normalize(),
        reps: req.reps,
        estimated_1rm: settings.formula.estimate(req.weight, req.reps),
    };

    retry_once("submit_attempt", || {
        try_submit(pool, user_id, &exercise, values)
    })
    .await
    .map_err(|e| {
        if e.is_foreign_key_violation() {
            StorageError::NotFound
        } else {
            e
        }
    })
}

async fn try_submit(
    pool: &SqlitePool,
    user_id: i64,
    exercise: &Exercise,
    values: SetValues,
) -> Result<AttemptResult> {
    let repo = BestSetRepository::new(pool);
    let now = Utc::now().naive_utc();
    let mut tx = pool.begin().await?;

    repo.lock_for_update(&mut tx, user_id, exercise.exercise_id)
        .await?;
    let existing = repo
        .find_in_tx(&mut tx, user_id, exercise.exercise_id)
        .await?;

    match decide_attempt(existing.as_ref(), values.estimated_1rm) {
        AttemptDecision::Create => {
            repo.insert(&mut tx, user_id, exercise.exercise_id, values, now)
                .await?;
            tx.commit().await?;

            tracing::info!(
                "User {} set first best for {}: {} kg x {} (1RM {})",
                user_id,
                exercise.name,
                values.weight,
                values.reps,
                values.estimated_1rm
            );
            Ok(AttemptResult {
                accepted: true,
                message: format!(
                    "Set for '{}' added! 1RM: {} kg",
                    exercise.name, values.estimated_1rm
                ),
                estimated_1rm: values.estimated_1rm,
            })
        }
        AttemptDecision::Reject(current) => {
            let current_estimate = current.estimated_1rm;
            tx.rollback().await?;

            tracing::info!(
                "User {} set for {} rejected: {} < {}",
                user_id,
                exercise.name,
                values.estimated_1rm,
                current_estimate
            );
            Ok(AttemptResult {
                accepted: false,
                message: format!(
                    "New set for '{}' is worse than current (new 1RM: {}kg < current: {}kg). Set not updated.",
                    exercise.name, values.estimated_1rm, current_estimate
                ),
                estimated_1rm: values.estimated_1rm,
            })
        }
        AttemptDecision::Supersede(current) => {
            repo.archive(&mut tx, current, now).await?;
            repo.overwrite(&mut tx, current.best_set_id, values, now)
                .await?;
            tx.commit().await?;

            tracing::info!(
                "User {} improved {}: {} -> {}",
                user_id,
                exercise.name,
                current.estimated_1rm,
                values.estimated_1rm
            );
            Ok(AttemptResult {
                accepted: true,
                message: format!(
                    "Set for '{}' updated! 1RM: {} kg",
                    exercise.name, values.estimated_1rm
                ),
                estimated_1rm: values.estimated_1rm,
            })
        }
    }
}

/// Delete a user's best set and all history for its exercise.
/// Returns the exercise name.
pub async fn delete_record(pool: &SqlitePool, user_id: i64, best_set_id: i64) -> Result<String> {
    let exercise_id = retry_once("delete_record", || try_delete(pool, user_id, best_set_id)).await?;

    let exercise = ExerciseRepository::new(pool).find_by_id(exercise_id).await?;
    Ok(exercise.name)
}

async fn try_delete(pool: &SqlitePool, user_id: i64, best_set_id: i64) -> Result<i64> {
    let repo = BestSetRepository::new(pool);
    let mut tx = pool.begin().await?;

    let exercise_id = repo
        .delete_owned(&mut tx, user_id, best_set_id)
        .await?
        .ok_or(StorageError::NotFound)?;
    let removed = repo.delete_history(&mut tx, user_id, exercise_id).await?;

    tx.commit().await?;

    tracing::info!(
        "User {} deleted best set {} and {} history entries",
        user_id,
        best_set_id,
        removed
    );
    Ok(exercise_id)
}

/// A user's current best sets, ordered by exercise name
pub async fn list_best_sets(pool: &SqlitePool, user_id: i64) -> Result<Vec<BestSetResponse>> {
    BestSetRepository::new(pool).list_for_user(user_id).await
}

/// Superseded sets for one exercise, newest first
pub async fn list_history(
    pool: &SqlitePool,
    user_id: i64,
    exercise_id: i64,
) -> Result<Vec<HistoryEntryResponse>> {
    ExerciseRepository::new(pool).find_by_id(exercise_id).await?;

    let history = BestSetRepository::new(pool)
        .list_history(user_id, exercise_id)
        .await?;

    Ok(history.into_iter().map(HistoryEntryResponse::from).collect())
}
