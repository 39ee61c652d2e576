use std::str::FromStr;
use std::time::Duration;

use rusqlite::types::Type;
use rusqlite::{Row, Statement};
use rust_decimal::Decimal;

pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Decimals are stored as TEXT so they keep their exact digits.
pub(crate) fn get_decimal(row: &Row, column: &str) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(column)?;
    Decimal::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column_idx(row, column), Type::Text, Box::new(e))
    })
}

/// Durations are stored as whole microseconds.
pub(crate) fn get_duration(row: &Row, column: &str) -> rusqlite::Result<Option<Duration>> {
    let micros: Option<i64> = row.get(column)?;
    micros
        .map(|m| {
            u64::try_from(m).map(Duration::from_micros).map_err(|e| {
                let idx = column_idx(row, column);
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e))
            })
        })
        .transpose()
}

fn column_idx(row: &Row, column: &str) -> usize {
    let stmt: &Statement = row.as_ref();
    stmt.column_index(column).unwrap_or_default()
}

pub(crate) fn duration_to_micros(duration: Duration) -> Option<i64> {
    i64::try_from(duration.as_micros()).ok()
}
