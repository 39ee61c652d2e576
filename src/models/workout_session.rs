use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;
use crate::error::{AppError, Result};

/// One performance of a routine.
///
/// `date` is refreshed on every write, so it reads as "last touched" rather than
/// "started at".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub session_id: i64,
    pub routine_id: i64,
    pub date: DateTime<Utc>,
    pub duration: i32,
}

impl FromSqliteRow for WorkoutSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            session_id: row.get("session_id")?,
            routine_id: row.get("routine_id")?,
            date: row.get("date")?,
            duration: row.get("duration")?,
        })
    }
}

pub(crate) fn validate_duration(duration: i32) -> Result<()> {
    if duration < 0 {
        return Err(AppError::Validation(format!(
            "duration must not be negative (got {duration})"
        )));
    }
    Ok(())
}
