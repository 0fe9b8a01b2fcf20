pub mod best_set;
pub mod mesocycle;
pub mod progress;
pub mod user;
