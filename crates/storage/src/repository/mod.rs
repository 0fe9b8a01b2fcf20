pub mod best_set;
pub mod exercise;
pub mod mesocycle;
pub mod user;
