use sqlx::SqlitePool;

use crate::dto::progress::{ProgressChart, ProgressPoint};
use crate::error::Result;
use crate::models::{BestSet, BestSetHistory};
use crate::repository::best_set::BestSetRepository;
use crate::repository::exercise::ExerciseRepository;

/// Merge superseded sets and the current best into a date-ordered series.
///
/// History comes first in (created_at, id) order and the current best is
/// appended, so entries sharing a date keep history before current.
pub fn build_series(history: &[BestSetHistory], current: Option<&BestSet>) -> Vec<ProgressPoint> {
    let mut ordered: Vec<&BestSetHistory> = history.iter().collect();
    ordered.sort_by_key(|h| (h.created_at, h.history_id));

    let mut points: Vec<ProgressPoint> = ordered
        .into_iter()
        .map(|h| ProgressPoint {
            date: h.created_at.date(),
            estimated_1rm: h.estimated_1rm,
        })
        .collect();

    if let Some(best) = current {
        points.push(ProgressPoint {
            date: best.updated_at.date(),
            estimated_1rm: best.estimated_1rm,
        });
    }

    // stable
    points.sort_by_key(|p| p.date);
    points
}

pub async fn build_progress_series(
    pool: &SqlitePool,
    user_id: i64,
    exercise_id: i64,
) -> Result<Vec<ProgressPoint>> {
    ExerciseRepository::new(pool).find_by_id(exercise_id).await?;

    let repo = BestSetRepository::new(pool);
    let history = repo.list_history_chronological(user_id, exercise_id).await?;
    let current = repo.find(user_id, exercise_id).await?;

    Ok(build_series(&history, current.as_ref()))
}

/// One chart per exercise the user has any record for, ordered by name
pub async fn progress_charts(pool: &SqlitePool, user_id: i64) -> Result<Vec<ProgressChart>> {
    let exercises = ExerciseRepository::new(pool)
        .list_with_records(user_id)
        .await?;
    let repo = BestSetRepository::new(pool);

    let mut charts = Vec::with_capacity(exercises.len());
    for exercise in exercises {
        let history = repo
            .list_history_chronological(user_id, exercise.exercise_id)
            .await?;
        let current = repo.find(user_id, exercise.exercise_id).await?;
        let points = build_series(&history, current.as_ref());

        tracing::debug!(
            "Progress for user {} on {}: {} points",
            user_id,
            exercise.name,
            points.len()
        );
        charts.push(ProgressChart::new(exercise.exercise_id, exercise.name, &points));
    }

    Ok(charts)
}
