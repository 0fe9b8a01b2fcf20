use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::SqlitePool;
use validator::Validate;

use crate::dto::mesocycle::{GeneratePlanRequest, GeneratedPlan, PlanResponse};
use crate::error::{Result, StorageError};
use crate::models::{Exercise, NewMesocycle};
use crate::repository::best_set::BestSetRepository;
use crate::repository::exercise::ExerciseRepository;
use crate::repository::mesocycle::MesocycleRepository;
use crate::services::retry_once;
use crate::settings::{MAIN_EXERCISES, TrainingSettings};

/// Targets for one week of a mesocycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekConfig {
    pub week: i32,
    pub rpe: i32,
    pub rir: i32,
    /// Share of the baseline 1RM, in percent.
    pub intensity_pct: i64,
    pub reps_min: i32,
    pub reps_max: i32,
}

impl WeekConfig {
    pub fn multiplier(&self) -> Decimal {
        Decimal::new(self.intensity_pct, 2)
    }
}

/// Three loading weeks peaking in week 3, then a deload below week 1.
pub const MESOCYCLE_WEEKS: [WeekConfig; 4] = [
    WeekConfig { week: 1, rpe: 7, rir: 3, intensity_pct: 75, reps_min: 8, reps_max: 12 },
    WeekConfig { week: 2, rpe: 8, rir: 2, intensity_pct: 80, reps_min: 6, reps_max: 10 },
    WeekConfig { week: 3, rpe: 10, rir: 0, intensity_pct: 90, reps_min: 4, reps_max: 7 },
    WeekConfig { week: 4, rpe: 5, rir: 5, intensity_pct: 60, reps_min: 10, reps_max: 15 },
];

/// Round a load to the nearest multiple of `step`; ties go to the even multiple.
pub fn round_to_increment(raw: Decimal, step: Decimal) -> Decimal {
    if step <= Decimal::ZERO {
        return raw.normalize();
    }
    let steps = (raw / step).round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    (steps * step).normalize()
}

/// The four planned weeks for one exercise.
pub fn plan_exercise(
    exercise_id: i64,
    baseline: Decimal,
    settings: &TrainingSettings,
) -> Vec<NewMesocycle> {
    let step = settings.plate_step();

    MESOCYCLE_WEEKS
        .iter()
        .map(|config| NewMesocycle {
            exercise_id,
            week: config.week,
            rpe: config.rpe,
            rir: config.rir,
            target_weight: round_to_increment(baseline * config.multiplier(), step),
            target_reps_min: config.reps_min,
            target_reps_max: config.reps_max,
        })
        .collect()
}

/// Ids of the main lifts, for callers that do not pick exercises.
pub async fn main_exercise_ids(pool: &SqlitePool) -> Result<Vec<i64>> {
    let repo = ExerciseRepository::new(pool);
    let mut ids = Vec::with_capacity(MAIN_EXERCISES.len());

    for name in MAIN_EXERCISES {
        ids.push(repo.find_by_name(name).await?.exercise_id);
    }

    Ok(ids)
}

/// Build and store a 4-week plan, replacing any plan the user already has
/// for the same start date.
///
/// Nothing is written unless every exercise has a best set.
pub async fn generate_plan(
    pool: &SqlitePool,
    settings: &TrainingSettings,
    user_id: i64,
    req: &GeneratePlanRequest,
) -> Result<GeneratedPlan> {
    req.validate()?;
    let start_date = req.parsed_start_date()?;

    let exercise_repo = ExerciseRepository::new(pool);
    let ids: BTreeSet<i64> = req.exercise_ids.iter().copied().collect();
    let mut exercises = Vec::with_capacity(ids.len());
    for id in ids {
        exercises.push(exercise_repo.find_by_id(id).await?);
    }
    exercises.sort_by(|a, b| a.name.cmp(&b.name));

    retry_once("generate_plan", || {
        try_generate(pool, settings, user_id, start_date, &exercises)
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

async fn try_generate(
    pool: &SqlitePool,
    settings: &TrainingSettings,
    user_id: i64,
    start_date: NaiveDate,
    exercises: &[Exercise],
) -> Result<GeneratedPlan> {
    let best_sets = BestSetRepository::new(pool);
    let mesocycles = MesocycleRepository::new(pool);
    let now = Utc::now().naive_utc();
    let mut tx = pool.begin().await?;

    let replaced = mesocycles.delete_batch(&mut tx, user_id, start_date).await?;

    let mut weeks = Vec::with_capacity(exercises.len() * MESOCYCLE_WEEKS.len());
    let mut missing = Vec::new();
    for exercise in exercises {
        match best_sets
            .find_in_tx(&mut tx, user_id, exercise.exercise_id)
            .await?
        {
            Some(best) => weeks.extend(plan_exercise(
                exercise.exercise_id,
                best.estimated_1rm,
                settings,
            )),
            None => missing.push(exercise.name.clone()),
        }
    }

    if !missing.is_empty() {
        tx.rollback().await?;
        tracing::info!(
            "Plan for user {} starting {} refused, no baseline for {:?}",
            user_id,
            start_date,
            missing
        );
        return Err(StorageError::MissingBaseline { missing });
    }

    let created = mesocycles
        .insert_batch(&mut tx, user_id, start_date, &weeks, now)
        .await?;
    let rows = mesocycles
        .list_batch_in_tx(&mut tx, user_id, start_date)
        .await?;

    tx.commit().await?;

    tracing::info!(
        "Generated plan for user {} starting {}: {} rows ({} replaced)",
        user_id,
        start_date,
        created,
        replaced
    );

    Ok(GeneratedPlan {
        created_count: rows.len(),
        plan: PlanResponse::from_rows(start_date, &rows),
    })
}

/// The batch the user generated most recently, whatever its start date.
pub async fn get_current_plan(pool: &SqlitePool, user_id: i64) -> Result<Option<PlanResponse>> {
    let repo = MesocycleRepository::new(pool);

    let Some(start_date) = repo.latest_generated_start_date(user_id).await? else {
        return Ok(None);
    };

    let rows = repo.list_batch(user_id, start_date).await?;
    Ok(Some(PlanResponse::from_rows(start_date, &rows)))
}
