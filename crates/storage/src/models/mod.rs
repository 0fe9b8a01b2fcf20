mod best_set;
mod best_set_history;
mod exercise;
mod mesocycle;
mod user;

pub use best_set::BestSet;
pub use best_set_history::BestSetHistory;
pub use exercise::Exercise;
pub use mesocycle::{Mesocycle, NewMesocycle};
pub use user::{User, UserProfile};

use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Weights are persisted as decimal text; SQLite has no exact numeric type.
pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    raw.parse::<Decimal>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

/// Text form written for every decimal column.
pub(crate) fn decimal_text(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_text_is_canonical() {
        assert_eq!(decimal_text(Decimal::new(10000, 2)), "100");
        assert_eq!(decimal_text(Decimal::new(11251, 2)), "112.51");
        assert_eq!(decimal_text(Decimal::new(1025, 1)), "102.5");
    }
}
