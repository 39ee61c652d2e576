use std::fmt;

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;
use crate::error::Result;
use crate::validation;

pub const ROUTINE_NAME_MAX_CHARS: usize = 100;
pub const ROUTINE_DESCRIPTION_MAX_CHARS: usize = 400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRoutine {
    pub routine_id: i64,
    pub user_id: i64,
    pub routine_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for WorkoutRoutine {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            routine_id: row.get("routine_id")?,
            user_id: row.get("user_id")?,
            routine_name: row.get("routine_name")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl fmt::Display for WorkoutRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.routine_name)
    }
}

/// Both fields may be left blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRoutine {
    #[serde(default)]
    pub routine_name: String,
    #[serde(default)]
    pub description: String,
}

impl CreateRoutine {
    pub fn validate(&self) -> Result<()> {
        validate_text(&self.routine_name, &self.description)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRoutine {
    pub routine_name: Option<String>,
    pub description: Option<String>,
}

impl WorkoutRoutine {
    /// `created_at` is never touched by an update.
    pub fn apply(mut self, changes: &UpdateRoutine) -> Result<Self> {
        if let Some(name) = &changes.routine_name {
            self.routine_name = name.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        validate_text(&self.routine_name, &self.description)?;
        Ok(self)
    }
}

fn validate_text(routine_name: &str, description: &str) -> Result<()> {
    validation::max_chars("routine_name", routine_name, ROUTINE_NAME_MAX_CHARS)?;
    validation::max_chars("description", description, ROUTINE_DESCRIPTION_MAX_CHARS)
}

/// Link between a routine and an exercise at a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub workout_exercise_id: i64,
    pub routine_id: i64,
    pub exercise_id: i64,
    pub order: u32,
}

impl FromSqliteRow for WorkoutExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            workout_exercise_id: row.get("workout_exercise_id")?,
            routine_id: row.get("routine_id")?,
            exercise_id: row.get("exercise_id")?,
            order: row.get("order")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutExerciseWithName {
    pub workout_exercise_id: i64,
    pub routine_id: i64,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub order: u32,
}

impl FromSqliteRow for WorkoutExerciseWithName {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            workout_exercise_id: row.get("workout_exercise_id")?,
            routine_id: row.get("routine_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            order: row.get("order")?,
        })
    }
}
