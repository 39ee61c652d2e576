use std::time::Duration;

use rusqlite::Row;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::from_row::{duration_to_micros, get_duration};
use super::nullable::deserialize_nullable;
use super::FromSqliteRow;
use crate::error::{AppError, Result};
use crate::validation;

pub const LOG_ID_MAX_CHARS: usize = 100;

/// One exercise's recorded performance within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: i64,
    pub log_id: String,
    pub session_id: i64,
    pub exercise_id: i64,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub time: Option<Duration>,
    pub calories_burned: Option<f64>,
    pub note: Option<String>,
}

impl FromSqliteRow for WorkoutLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            log_id: row.get("log_id")?,
            session_id: row.get("session_id")?,
            exercise_id: row.get("exercise_id")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            time: get_duration(row, "time")?,
            calories_burned: row.get("calories_burned")?,
            note: row.get("note")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateWorkoutLog {
    /// Generated when absent.
    pub log_id: Option<String>,
    pub exercise_id: i64,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub time: Option<Duration>,
    pub calories_burned: Option<f64>,
    pub note: Option<String>,
}

impl CreateWorkoutLog {
    pub fn new(exercise_id: i64) -> Self {
        Self {
            exercise_id,
            ..Default::default()
        }
    }

    /// The caller-supplied log id, or a fresh UUID.
    pub fn resolve_log_id(&self) -> String {
        self.log_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(log_id) = &self.log_id {
            validate_log_id(log_id)?;
        }
        validate_measurements(self.weight, self.time, self.calories_burned)
    }
}

/// Partial update of the performance fields. Nested `None` clears a value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkoutLog {
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub reps: Option<Option<u32>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub time: Option<Option<Duration>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub calories_burned: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub note: Option<Option<String>>,
}

impl WorkoutLog {
    pub(crate) fn time_micros(&self) -> Option<i64> {
        self.time.and_then(duration_to_micros)
    }

    pub fn apply(mut self, changes: &UpdateWorkoutLog) -> Result<Self> {
        if let Some(reps) = changes.reps {
            self.reps = reps;
        }
        if let Some(weight) = changes.weight {
            self.weight = weight;
        }
        if let Some(time) = changes.time {
            self.time = time;
        }
        if let Some(calories) = changes.calories_burned {
            self.calories_burned = calories;
        }
        if let Some(note) = &changes.note {
            self.note = note.clone();
        }
        validate_measurements(self.weight, self.time, self.calories_burned)?;
        Ok(self)
    }
}

fn validate_log_id(log_id: &str) -> Result<()> {
    validation::not_blank("log_id", log_id)?;
    validation::max_chars("log_id", log_id, LOG_ID_MAX_CHARS)
}

fn validate_measurements(
    weight: Option<f64>,
    time: Option<Duration>,
    calories_burned: Option<f64>,
) -> Result<()> {
    if let Some(weight) = weight {
        validation::finite("weight", weight)?;
    }
    if let Some(calories) = calories_burned {
        validation::finite("calories_burned", calories)?;
    }
    if let Some(time) = time {
        if duration_to_micros(time).is_none() {
            return Err(AppError::Validation("time is too long".to_string()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutLogWithExercise {
    pub id: i64,
    pub log_id: String,
    pub session_id: i64,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub time: Option<Duration>,
    pub calories_burned: Option<f64>,
    pub note: Option<String>,
}

impl FromSqliteRow for WorkoutLogWithExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            log_id: row.get("log_id")?,
            session_id: row.get("session_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            time: get_duration(row, "time")?,
            calories_burned: row.get("calories_burned")?,
            note: row.get("note")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_log_id_keeps_supplied_value() {
        let input = CreateWorkoutLog {
            log_id: Some("bench-1".to_string()),
            ..CreateWorkoutLog::new(1)
        };
        assert_eq!(input.resolve_log_id(), "bench-1");
    }

    #[test]
    fn test_resolve_log_id_generates_unique_ids() {
        let input = CreateWorkoutLog::new(1);
        let first = input.resolve_log_id();
        let second = input.resolve_log_id();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_log_id() {
        let input = CreateWorkoutLog {
            log_id: Some(String::new()),
            ..CreateWorkoutLog::new(1)
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_nan_weight() {
        let input = CreateWorkoutLog {
            weight: Some(f64::NAN),
            ..CreateWorkoutLog::new(1)
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_apply_clears_and_sets() {
        let log = WorkoutLog {
            id: 1,
            log_id: "a".to_string(),
            session_id: 1,
            exercise_id: 1,
            reps: Some(10),
            weight: Some(60.0),
            time: None,
            calories_burned: None,
            note: Some("easy".to_string()),
        };

        let updated = log
            .apply(&UpdateWorkoutLog {
                reps: Some(Some(8)),
                note: Some(None),
                time: Some(Some(Duration::from_secs(90))),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.reps, Some(8));
        assert_eq!(updated.weight, Some(60.0));
        assert_eq!(updated.note, None);
        assert_eq!(updated.time_micros(), Some(90_000_000));
    }

    #[test]
    fn test_update_deserialize_null_clears() {
        let changes: UpdateWorkoutLog =
            serde_json::from_str(r#"{"note":null,"reps":12}"#).unwrap();

        assert_eq!(changes.note, Some(None));
        assert_eq!(changes.reps, Some(Some(12)));
        assert_eq!(changes.weight, None);
        assert_eq!(changes.time, None);
    }
}
