use std::collections::HashSet;

use chrono::Utc;
use rusqlite::{OptionalExtension, TransactionBehavior};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    CreateRoutine, FromSqliteRow, UpdateRoutine, WorkoutExercise, WorkoutExerciseWithName,
    WorkoutRoutine,
};

/// Routines and the ordered exercise links that make them up.
#[derive(Clone)]
pub struct RoutineRepository {
    pool: DbPool,
}

impl RoutineRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // Workout Routines
    pub async fn create(&self, user_id: i64, input: &CreateRoutine) -> Result<WorkoutRoutine> {
        input.validate()?;

        let pool = self.pool.clone();
        let input = input.clone();
        let routine = tokio::task::spawn_blocking(move || -> Result<WorkoutRoutine> {
            let conn = pool.get()?;
            let now = Utc::now();
            conn.execute(
                "INSERT INTO workout_routines (user_id, routine_name, description, created_at)
                 VALUES (?, ?, ?, ?)",
                rusqlite::params![user_id, input.routine_name, input.description, now],
            )?;
            Ok(WorkoutRoutine {
                routine_id: conn.last_insert_rowid(),
                user_id,
                routine_name: input.routine_name,
                description: input.description,
                created_at: now,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        tracing::debug!(routine_id = routine.routine_id, user_id, "Created routine");
        Ok(routine)
    }

    pub async fn find_by_id(&self, routine_id: i64) -> Result<Option<WorkoutRoutine>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workout_routines WHERE routine_id = ?")?;
            let result = stmt
                .query_row([routine_id], WorkoutRoutine::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<WorkoutRoutine>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workout_routines WHERE user_id = ?
                 ORDER BY created_at DESC, routine_id DESC",
            )?;
            let routines = stmt
                .query_map([user_id], WorkoutRoutine::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(routines)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn update(&self, routine_id: i64, changes: &UpdateRoutine) -> Result<WorkoutRoutine> {
        let pool = self.pool.clone();
        let changes = changes.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let current = tx
                .query_row(
                    "SELECT * FROM workout_routines WHERE routine_id = ?",
                    [routine_id],
                    WorkoutRoutine::from_row,
                )
                .optional()?
                .ok_or_else(|| AppError::not_found("Routine", routine_id))?;

            let routine = current.apply(&changes)?;
            tx.execute(
                "UPDATE workout_routines SET routine_name = ?, description = ? WHERE routine_id = ?",
                rusqlite::params![routine.routine_name, routine.description, routine_id],
            )?;
            tx.commit()?;
            Ok(routine)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Removes the routine's exercise links and sessions along with it.
    pub async fn delete(&self, routine_id: i64) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM workout_routines WHERE routine_id = ?",
                [routine_id],
            )?;
            if rows == 0 {
                return Err(AppError::not_found("Routine", routine_id));
            }
            tracing::debug!(routine_id, "Deleted routine");
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    // Routine exercises
    pub async fn add_exercise(
        &self,
        routine_id: i64,
        exercise_id: i64,
        order: u32,
    ) -> Result<WorkoutExercise> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                r#"INSERT INTO workout_exercises (routine_id, exercise_id, "order") VALUES (?, ?, ?)"#,
                rusqlite::params![routine_id, exercise_id, order],
            )?;
            Ok(WorkoutExercise {
                workout_exercise_id: conn.last_insert_rowid(),
                routine_id,
                exercise_id,
                order,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Add an exercise after the routine's current last one.
    pub async fn append_exercise(&self, routine_id: i64, exercise_id: i64) -> Result<WorkoutExercise> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let last: Option<u32> = tx.query_row(
                r#"SELECT MAX("order") FROM workout_exercises WHERE routine_id = ?"#,
                [routine_id],
                |row| row.get(0),
            )?;
            let order = match last {
                Some(n) => n.checked_add(1).ok_or_else(|| {
                    AppError::Validation(format!(
                        "routine {routine_id} has no order left after {n}"
                    ))
                })?,
                None => 0,
            };

            tx.execute(
                r#"INSERT INTO workout_exercises (routine_id, exercise_id, "order") VALUES (?, ?, ?)"#,
                rusqlite::params![routine_id, exercise_id, order],
            )?;
            let workout_exercise_id = tx.last_insert_rowid();
            tx.commit()?;

            Ok(WorkoutExercise {
                workout_exercise_id,
                routine_id,
                exercise_id,
                order,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// The routine's exercises in performing order.
    pub async fn find_exercises(&self, routine_id: i64) -> Result<Vec<WorkoutExerciseWithName>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                r#"SELECT we.workout_exercise_id, we.routine_id, we.exercise_id,
                          e.exercise_name, we."order"
                   FROM workout_exercises we
                   JOIN exercises e ON we.exercise_id = e.exercise_id
                   WHERE we.routine_id = ?
                   ORDER BY we."order", we.workout_exercise_id"#,
            )?;
            let exercises = stmt
                .query_map([routine_id], WorkoutExerciseWithName::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn set_order(&self, workout_exercise_id: i64, order: u32) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                r#"UPDATE workout_exercises SET "order" = ? WHERE workout_exercise_id = ?"#,
                rusqlite::params![order, workout_exercise_id],
            )?;
            if rows == 0 {
                return Err(AppError::not_found("Workout exercise", workout_exercise_id));
            }
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn remove_exercise(&self, workout_exercise_id: i64) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM workout_exercises WHERE workout_exercise_id = ?",
                [workout_exercise_id],
            )?;
            if rows == 0 {
                return Err(AppError::not_found("Workout exercise", workout_exercise_id));
            }
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Renumber the routine's links to `0..n` in the given sequence.
    ///
    /// `workout_exercise_ids` must list every link of the routine exactly once.
    pub async fn reorder(&self, routine_id: i64, workout_exercise_ids: &[i64]) -> Result<()> {
        let pool = self.pool.clone();
        let wanted = workout_exercise_ids.to_vec();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let exists: bool = tx.query_row(
                "SELECT COUNT(*) > 0 FROM workout_routines WHERE routine_id = ?",
                [routine_id],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(AppError::not_found("Routine", routine_id));
            }

            let current: HashSet<i64> = tx
                .prepare("SELECT workout_exercise_id FROM workout_exercises WHERE routine_id = ?")?
                .query_map([routine_id], |row| row.get(0))?
                .collect::<rusqlite::Result<_>>()?;
            let requested: HashSet<i64> = wanted.iter().copied().collect();
            if requested.len() != wanted.len() || requested != current {
                return Err(AppError::Validation(format!(
                    "reorder must list each exercise of routine {routine_id} exactly once"
                )));
            }

            // Park every link above the current maximum so the final positions never collide
            // with a not-yet-moved row.
            let max_order: Option<i64> = tx.query_row(
                r#"SELECT MAX("order") FROM workout_exercises WHERE routine_id = ?"#,
                [routine_id],
                |row| row.get(0),
            )?;
            let offset = max_order.unwrap_or(0) + 1;
            tx.execute(
                r#"UPDATE workout_exercises SET "order" = "order" + ? WHERE routine_id = ?"#,
                rusqlite::params![offset, routine_id],
            )?;

            {
                let mut stmt = tx.prepare(
                    r#"UPDATE workout_exercises SET "order" = ? WHERE workout_exercise_id = ?"#,
                )?;
                for (position, id) in wanted.iter().enumerate() {
                    stmt.execute(rusqlite::params![position as i64, id])?;
                }
            }

            tx.commit()?;
            tracing::debug!(routine_id, count = wanted.len(), "Reordered routine");
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
