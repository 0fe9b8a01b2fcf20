mod config;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use storage::Database;
use storage::dto::best_set::SubmitSetRequest;
use storage::dto::mesocycle::GeneratePlanRequest;
use storage::dto::user::CreateUserRequest;
use storage::models::{Exercise, User};
use storage::repository::exercise::ExerciseRepository;
use storage::repository::user::UserRepository;
use storage::services::{best_set, mesocycle, progress};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::render::{Deleted, Seeded, emit};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Best-set tracking, 1RM estimates and 4-week mesocycle plans", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a user together with their profile
    CreateUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,
    },
    /// Add the default exercise catalogue
    SeedExercises,
    /// List known exercises
    Exercises,
    /// Submit a set; it becomes the best set unless its 1RM is lower
    Submit {
        #[arg(short, long)]
        user: String,

        /// Exercise id or name
        #[arg(short, long)]
        exercise: String,

        #[arg(short, long)]
        weight: Decimal,

        #[arg(short, long)]
        reps: i32,
    },
    /// Delete a best set and its history
    Delete {
        #[arg(short, long)]
        user: String,

        #[arg(long)]
        record: i64,
    },
    /// Show current best sets
    Bests {
        #[arg(short, long)]
        user: String,
    },
    /// Show superseded best sets for one exercise, newest first
    History {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        exercise: String,
    },
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Estimated 1RM over time, for one exercise or all of them
    Progress {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        exercise: Option<String>,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Generate a 4-week plan, replacing any plan with the same start date
    Generate {
        #[arg(short, long)]
        user: String,

        /// First day of the plan, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Exercise id or name; defaults to the main lifts
        #[arg(short, long = "exercise")]
        exercises: Vec<String>,
    },
    /// Show the most recently generated plan
    Current {
        #[arg(short, long)]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("liftlog={},storage={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    let db = Database::connect(&cli.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    db.run_migrations()
        .await
        .context("Failed to run database migrations")?;

    tracing::debug!("Connected to {}", cli.database_url);

    run(cli.command, &db, &config, cli.json).await
}

async fn run(command: Commands, db: &Database, config: &Config, json: bool) -> Result<()> {
    let pool = db.pool();

    match command {
        Commands::CreateUser { username, email } => {
            let user = UserRepository::new(pool)
                .create_with_profile(&CreateUserRequest { username, email })
                .await
                .context("Failed to create user")?;
            emit(json, &user, render::user)
        }
        Commands::SeedExercises => {
            let created = ExerciseRepository::new(pool)
                .seed_defaults()
                .await
                .context("Failed to seed exercises")?;
            emit(json, &Seeded { created }, render::seeded)
        }
        Commands::Exercises => {
            let exercises = ExerciseRepository::new(pool).list().await?;
            emit(json, exercises.as_slice(), render::exercises)
        }
        Commands::Submit {
            user,
            exercise,
            weight,
            reps,
        } => {
            let user = resolve_user(db, &user).await?;
            let exercise = resolve_exercise(db, &exercise).await?;
            let result = best_set::submit_attempt(
                pool,
                &config.training,
                user.user_id,
                &SubmitSetRequest {
                    exercise_id: exercise.exercise_id,
                    weight,
                    reps,
                },
            )
            .await
            .context("Failed to submit set")?;
            emit(json, &result, render::attempt)
        }
        Commands::Delete { user, record } => {
            let user = resolve_user(db, &user).await?;
            let exercise = best_set::delete_record(pool, user.user_id, record)
                .await
                .with_context(|| format!("Failed to delete best set {}", record))?;
            emit(
                json,
                &Deleted {
                    best_set_id: record,
                    exercise,
                },
                render::deleted,
            )
        }
        Commands::Bests { user } => {
            let user = resolve_user(db, &user).await?;
            let best_sets = best_set::list_best_sets(pool, user.user_id).await?;
            emit(json, best_sets.as_slice(), render::best_sets)
        }
        Commands::History { user, exercise } => {
            let user = resolve_user(db, &user).await?;
            let exercise = resolve_exercise(db, &exercise).await?;
            let history = best_set::list_history(pool, user.user_id, exercise.exercise_id).await?;
            emit(json, history.as_slice(), render::history)
        }
        Commands::Plan {
            command:
                PlanCommands::Generate {
                    user,
                    start,
                    exercises,
                },
        } => {
            let user = resolve_user(db, &user).await?;
            let exercise_ids = if exercises.is_empty() {
                mesocycle::main_exercise_ids(pool)
                    .await
                    .context("Main lifts are missing, run seed-exercises first")?
            } else {
                let mut ids = Vec::with_capacity(exercises.len());
                for exercise in &exercises {
                    ids.push(resolve_exercise(db, exercise).await?.exercise_id);
                }
                ids
            };

            let generated = mesocycle::generate_plan(
                pool,
                &config.training,
                user.user_id,
                &GeneratePlanRequest {
                    start_date: start,
                    exercise_ids,
                },
            )
            .await
            .context("Failed to generate plan")?;
            emit(json, &generated, render::generated)
        }
        Commands::Plan {
            command: PlanCommands::Current { user },
        } => {
            let user = resolve_user(db, &user).await?;
            let current = mesocycle::get_current_plan(pool, user.user_id).await?;
            emit(json, &current, render::current_plan)
        }
        Commands::Progress { user, exercise } => {
            let user = resolve_user(db, &user).await?;
            match exercise {
                Some(exercise) => {
                    let exercise = resolve_exercise(db, &exercise).await?;
                    let series =
                        progress::build_progress_series(pool, user.user_id, exercise.exercise_id)
                            .await?;
                    emit(json, series.as_slice(), render::series)
                }
                None => {
                    let charts = progress::progress_charts(pool, user.user_id).await?;
                    emit(json, charts.as_slice(), render::charts)
                }
            }
        }
    }
}

async fn resolve_user(db: &Database, username: &str) -> Result<User> {
    UserRepository::new(db.pool())
        .find_by_username(username)
        .await
        .with_context(|| format!("Unknown user '{}'", username))
}

/// Look an exercise up by id when the argument is numeric, by name otherwise.
async fn resolve_exercise(db: &Database, exercise: &str) -> Result<Exercise> {
    let repo = ExerciseRepository::new(db.pool());
    let found = match exercise.trim().parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(exercise.trim()).await,
    };
    found.with_context(|| format!("Unknown exercise '{}'", exercise))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit() {
        let cli = Cli::try_parse_from([
            "liftlog",
            "--database-url",
            "sqlite::memory:",
            "submit",
            "--user",
            "anna",
            "--exercise",
            "Deadlift",
            "--weight",
            "182.5",
            "--reps",
            "3",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Submit {
                user,
                exercise,
                weight,
                reps,
            } => {
                assert_eq!(user, "anna");
                assert_eq!(exercise, "Deadlift");
                assert_eq!(weight, Decimal::new(1825, 1));
                assert_eq!(reps, 3);
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn test_parse_plan_generate_with_repeated_exercises() {
        let cli = Cli::try_parse_from([
            "liftlog",
            "--database-url",
            "sqlite::memory:",
            "plan",
            "generate",
            "-u",
            "anna",
            "--start",
            "2026-11-02",
            "-e",
            "1",
            "-e",
            "Deadlift",
        ])
        .unwrap();

        match cli.command {
            Commands::Plan {
                command: PlanCommands::Generate { start, exercises, .. },
            } => {
                assert_eq!(start, "2026-11-02");
                assert_eq!(exercises, vec!["1", "Deadlift"]);
            }
            _ => panic!("expected plan generate"),
        }
    }

    #[test]
    fn test_invalid_weight_is_rejected_by_the_parser() {
        let result = Cli::try_parse_from([
            "liftlog",
            "--database-url",
            "sqlite::memory:",
            "submit",
            "-u",
            "anna",
            "-e",
            "1",
            "-w",
            "heavy",
            "-r",
            "5",
        ]);
        assert!(result.is_err());
    }
}
