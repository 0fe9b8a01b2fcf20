use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;
use storage::dto::best_set::{AttemptResult, BestSetResponse, HistoryEntryResponse};
use storage::dto::mesocycle::{GeneratedPlan, PlanResponse};
use storage::dto::progress::{ProgressChart, ProgressPoint};
use storage::models::{Exercise, User};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Serialize)]
pub struct Seeded {
    pub created: u64,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub best_set_id: i64,
    pub exercise: String,
}

/// Print `value` as pretty JSON, or as the text `human` renders for it.
pub fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    human: impl FnOnce(&T) -> String,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", human(value));
    }
    Ok(())
}

// Writing into a String cannot fail, so the fmt::Results below are dropped.

pub fn user(user: &User) -> String {
    format!(
        "Created user '{}' <{}> (id {})\n",
        user.username, user.email, user.user_id
    )
}

pub fn seeded(seeded: &Seeded) -> String {
    format!("Added {} exercises\n", seeded.created)
}

pub fn exercises(exercises: &[Exercise]) -> String {
    let mut out = String::new();
    for exercise in exercises {
        let _ = writeln!(out, "{:>4}  {}", exercise.exercise_id, exercise.name);
    }
    out
}

pub fn attempt(result: &AttemptResult) -> String {
    format!("{}\n", result.message)
}

pub fn deleted(deleted: &Deleted) -> String {
    format!(
        "Set for '{}' deleted along with its history\n",
        deleted.exercise
    )
}

pub fn best_sets(best_sets: &[BestSetResponse]) -> String {
    if best_sets.is_empty() {
        return "No best sets recorded yet\n".to_string();
    }
    let mut out = String::new();
    for best in best_sets {
        let _ = writeln!(
            out,
            "{:>4}  {:<32} {} kg x {}  1RM {} kg  ({})",
            best.best_set_id,
            best.exercise_name,
            best.weight,
            best.reps,
            best.estimated_1rm,
            best.updated_at.format(TIMESTAMP_FORMAT)
        );
    }
    out
}

pub fn history(history: &[HistoryEntryResponse]) -> String {
    if history.is_empty() {
        return "No earlier best sets\n".to_string();
    }
    let mut out = String::new();
    for entry in history {
        let _ = writeln!(
            out,
            "{}  {} kg x {}  1RM {} kg",
            entry.created_at.format(TIMESTAMP_FORMAT),
            entry.weight,
            entry.reps,
            entry.estimated_1rm
        );
    }
    out
}

pub fn generated(generated: &GeneratedPlan) -> String {
    format!(
        "Created {} plan rows\n{}",
        generated.created_count,
        plan(&generated.plan)
    )
}

pub fn current_plan(current: &Option<PlanResponse>) -> String {
    match current {
        Some(current) => plan(current),
        None => "No mesocycle planned yet\n".to_string(),
    }
}

fn plan(plan: &PlanResponse) -> String {
    let mut out = format!("Mesocycle {} to {}\n", plan.start_date, plan.end_date);
    for exercise in &plan.exercises {
        let _ = writeln!(out, "\n{}", exercise.exercise_name);
        for week in &exercise.weeks {
            let _ = writeln!(
                out,
                "  Week {} ({} - {}): {} kg x {}-{} @ RPE {} / RIR {}",
                week.week,
                week.week_start,
                week.week_end,
                week.target_weight,
                week.target_reps_min,
                week.target_reps_max,
                week.rpe,
                week.rir
            );
        }
    }
    out
}

pub fn series(points: &[ProgressPoint]) -> String {
    if points.is_empty() {
        return "No records for this exercise\n".to_string();
    }
    let mut out = String::new();
    for point in points {
        let _ = writeln!(out, "{}  {} kg", point.date, point.estimated_1rm);
    }
    out
}

pub fn charts(charts: &[ProgressChart]) -> String {
    if charts.is_empty() {
        return "No records yet\n".to_string();
    }
    let mut out = String::new();
    for chart in charts {
        let _ = writeln!(out, "{}", chart.exercise);
        for (date, value) in chart.dates.iter().zip(&chart.values) {
            let _ = writeln!(out, "  {}  {} kg", date, value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use storage::dto::mesocycle::{ExercisePlanResponse, PlanWeekResponse};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn squat_plan() -> PlanResponse {
        PlanResponse {
            start_date: date(11, 2),
            end_date: date(11, 29),
            exercises: vec![ExercisePlanResponse {
                exercise_id: 1,
                exercise_name: "Squat".to_string(),
                weeks: vec![
                    PlanWeekResponse {
                        week: 1,
                        week_start: date(11, 2),
                        week_end: date(11, 8),
                        rpe: 7,
                        rir: 3,
                        target_weight: Decimal::new(85, 0),
                        target_reps_min: 8,
                        target_reps_max: 12,
                    },
                    PlanWeekResponse {
                        week: 3,
                        week_start: date(11, 16),
                        week_end: date(11, 22),
                        rpe: 10,
                        rir: 0,
                        target_weight: Decimal::new(1025, 1),
                        target_reps_min: 4,
                        target_reps_max: 7,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_plan_lines() {
        assert_eq!(
            current_plan(&Some(squat_plan())),
            "Mesocycle 2026-11-02 to 2026-11-29\n\
             \n\
             Squat\n\
             \x20 Week 1 (2026-11-02 - 2026-11-08): 85 kg x 8-12 @ RPE 7 / RIR 3\n\
             \x20 Week 3 (2026-11-16 - 2026-11-22): 102.5 kg x 4-7 @ RPE 10 / RIR 0\n"
        );
    }

    #[test]
    fn test_generated_plan_reports_row_count_first() {
        let text = generated(&GeneratedPlan {
            created_count: 2,
            plan: squat_plan(),
        });
        assert!(text.starts_with("Created 2 plan rows\nMesocycle 2026-11-02 to 2026-11-29\n"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(current_plan(&None), "No mesocycle planned yet\n");
        assert_eq!(best_sets(&[]), "No best sets recorded yet\n");
        assert_eq!(history(&[]), "No earlier best sets\n");
        assert_eq!(series(&[]), "No records for this exercise\n");
        assert_eq!(charts(&[]), "No records yet\n");
        assert_eq!(exercises(&[]), "");
    }

    #[test]
    fn test_chart_and_series_lines() {
        let chart = ProgressChart {
            exercise_id: 1,
            exercise: "Deadlift".to_string(),
            dates: vec![date(10, 1), date(10, 8)],
            values: vec![Decimal::new(18051, 2), Decimal::new(190, 0)],
        };
        assert_eq!(
            charts(&[chart]),
            "Deadlift\n  2026-10-01  180.51 kg\n  2026-10-08  190 kg\n"
        );

        let point = ProgressPoint {
            date: date(10, 8),
            estimated_1rm: Decimal::new(11251, 2),
        };
        assert_eq!(series(&[point]), "2026-10-08  112.51 kg\n");
    }

    #[test]
    fn test_attempt_message_is_printed_verbatim() {
        let result = AttemptResult {
            accepted: false,
            message: "New set for 'Squat' is worse than current (new 1RM: 101.26kg < current: 112.51kg). Set not updated.".to_string(),
            estimated_1rm: Decimal::new(10126, 2),
        };
        assert_eq!(attempt(&result), format!("{}\n", result.message));
    }
}
