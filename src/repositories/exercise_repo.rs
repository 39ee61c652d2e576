use rusqlite::{OptionalExtension, TransactionBehavior};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    CreateExercise, Exercise, ExerciseType, FromSqliteRow, MuscleGroup, UpdateExercise,
};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, exercise_id: i64) -> Result<Option<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercises WHERE exercise_id = ?")?;
            let result = stmt.query_row([exercise_id], Exercise::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_all(&self) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT * FROM exercises ORDER BY exercise_name, exercise_id")?;
            let exercises = stmt
                .query_map([], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_muscle_group(&self, muscle_group: MuscleGroup) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM exercises WHERE muscle_group = ? ORDER BY exercise_name",
            )?;
            let exercises = stmt
                .query_map([muscle_group], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_type(&self, exercise_type: ExerciseType) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT * FROM exercises WHERE type = ? ORDER BY exercise_name")?;
            let exercises = stmt
                .query_map([exercise_type], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, input: &CreateExercise) -> Result<Exercise> {
        input.validate()?;

        let pool = self.pool.clone();
        let input = input.clone();
        let exercise = tokio::task::spawn_blocking(move || -> Result<Exercise> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO exercises
                    (exercise_name, description, equipment_needed, level_of_difficulty, type, muscle_group)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    input.exercise_name,
                    input.description,
                    input.equipment_needed,
                    input.level_of_difficulty,
                    input.exercise_type,
                    input.muscle_group
                ],
            )?;
            Ok(Exercise {
                exercise_id: conn.last_insert_rowid(),
                exercise_name: input.exercise_name,
                description: input.description,
                equipment_needed: input.equipment_needed,
                level_of_difficulty: input.level_of_difficulty,
                exercise_type: input.exercise_type,
                muscle_group: input.muscle_group,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        tracing::debug!(exercise_id = exercise.exercise_id, "Created exercise {}", exercise);
        Ok(exercise)
    }

    pub async fn update(&self, exercise_id: i64, changes: &UpdateExercise) -> Result<Exercise> {
        let pool = self.pool.clone();
        let changes = changes.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let current = tx
                .query_row(
                    "SELECT * FROM exercises WHERE exercise_id = ?",
                    [exercise_id],
                    Exercise::from_row,
                )
                .optional()?
                .ok_or_else(|| AppError::not_found("Exercise", exercise_id))?;

            let exercise = current.apply(&changes)?;
            tx.execute(
                "UPDATE exercises
                 SET exercise_name = ?, description = ?, equipment_needed = ?,
                     level_of_difficulty = ?, type = ?, muscle_group = ?
                 WHERE exercise_id = ?",
                rusqlite::params![
                    exercise.exercise_name,
                    exercise.description,
                    exercise.equipment_needed,
                    exercise.level_of_difficulty,
                    exercise.exercise_type,
                    exercise.muscle_group,
                    exercise_id
                ],
            )?;
            tx.commit()?;
            Ok(exercise)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Also removes every routine link and log that references the exercise.
    pub async fn delete(&self, exercise_id: i64) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM exercises WHERE exercise_id = ?", [exercise_id])?;
            if rows == 0 {
                return Err(AppError::not_found("Exercise", exercise_id));
            }
            tracing::debug!(exercise_id, "Deleted exercise");
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
