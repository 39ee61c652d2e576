use chrono::Utc;
use rusqlite::{OptionalExtension, TransactionBehavior};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::workout_session::validate_duration;
use crate::models::{
    CreateWorkoutLog, FromSqliteRow, UpdateWorkoutLog, WorkoutLog, WorkoutLogWithExercise,
    WorkoutSession,
};

/// Sessions of a routine and the per-exercise logs recorded in them.
#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // Workout Sessions
    pub async fn create_session(&self, routine_id: i64, duration: i32) -> Result<WorkoutSession> {
        validate_duration(duration)?;

        let pool = self.pool.clone();
        let session = tokio::task::spawn_blocking(move || -> Result<WorkoutSession> {
            let conn = pool.get()?;
            let now = Utc::now();
            conn.execute(
                "INSERT INTO workout_sessions (routine_id, date, duration) VALUES (?, ?, ?)",
                rusqlite::params![routine_id, now, duration],
            )?;
            Ok(WorkoutSession {
                session_id: conn.last_insert_rowid(),
                routine_id,
                date: now,
                duration,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        tracing::debug!(session_id = session.session_id, routine_id, "Created session");
        Ok(session)
    }

    pub async fn find_session_by_id(&self, session_id: i64) -> Result<Option<WorkoutSession>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workout_sessions WHERE session_id = ?")?;
            let result = stmt
                .query_row([session_id], WorkoutSession::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_sessions_by_routine(&self, routine_id: i64) -> Result<Vec<WorkoutSession>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workout_sessions WHERE routine_id = ?
                 ORDER BY date DESC, session_id DESC",
            )?;
            let sessions = stmt
                .query_map([routine_id], WorkoutSession::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sessions)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_sessions_by_user(&self, user_id: i64) -> Result<Vec<WorkoutSession>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT ws.* FROM workout_sessions ws
                 JOIN workout_routines wr ON ws.routine_id = wr.routine_id
                 WHERE wr.user_id = ?
                 ORDER BY ws.date DESC, ws.session_id DESC",
            )?;
            let sessions = stmt
                .query_map([user_id], WorkoutSession::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sessions)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Change the duration. `date` is re-stamped with the current time on every update.
    pub async fn update_session(&self, session_id: i64, duration: i32) -> Result<WorkoutSession> {
        validate_duration(duration)?;

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let now = Utc::now();
            let rows = tx.execute(
                "UPDATE workout_sessions SET date = ?, duration = ? WHERE session_id = ?",
                rusqlite::params![now, duration, session_id],
            )?;
            if rows == 0 {
                return Err(AppError::not_found("Session", session_id));
            }
            let session = tx.query_row(
                "SELECT * FROM workout_sessions WHERE session_id = ?",
                [session_id],
                WorkoutSession::from_row,
            )?;
            tx.commit()?;
            Ok(session)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Removes the session's logs along with it.
    pub async fn delete_session(&self, session_id: i64) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM workout_sessions WHERE session_id = ?",
                [session_id],
            )?;
            if rows == 0 {
                return Err(AppError::not_found("Session", session_id));
            }
            tracing::debug!(session_id, "Deleted session");
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    // Workout Logs
    pub async fn create_log(&self, session_id: i64, input: &CreateWorkoutLog) -> Result<WorkoutLog> {
        input.validate()?;

        let log = WorkoutLog {
            id: 0,
            log_id: input.resolve_log_id(),
            session_id,
            exercise_id: input.exercise_id,
            reps: input.reps,
            weight: input.weight,
            time: input.time,
            calories_burned: input.calories_burned,
            note: input.note.clone(),
        };

        let pool = self.pool.clone();
        let log = tokio::task::spawn_blocking(move || -> Result<WorkoutLog> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workout_logs
                    (log_id, session_id, exercise_id, reps, weight, time, calories_burned, note)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    log.log_id,
                    log.session_id,
                    log.exercise_id,
                    log.reps,
                    log.weight,
                    log.time_micros(),
                    log.calories_burned,
                    log.note
                ],
            )?;
            Ok(WorkoutLog {
                id: conn.last_insert_rowid(),
                ..log
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        tracing::debug!(log_id = %log.log_id, session_id, "Created workout log");
        Ok(log)
    }

    pub async fn find_log_by_id(&self, id: i64) -> Result<Option<WorkoutLog>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workout_logs WHERE id = ?")?;
            let result = stmt.query_row([id], WorkoutLog::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_log_by_log_id(&self, log_id: &str) -> Result<Option<WorkoutLog>> {
        let pool = self.pool.clone();
        let log_id = log_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workout_logs WHERE log_id = ?")?;
            let result = stmt.query_row([&log_id], WorkoutLog::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_logs_by_session(&self, session_id: i64) -> Result<Vec<WorkoutLogWithExercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT wl.id, wl.log_id, wl.session_id, wl.exercise_id, e.exercise_name,
                        wl.reps, wl.weight, wl.time, wl.calories_burned, wl.note
                 FROM workout_logs wl
                 JOIN exercises e ON wl.exercise_id = e.exercise_id
                 WHERE wl.session_id = ?
                 ORDER BY wl.id",
            )?;
            let logs = stmt
                .query_map([session_id], WorkoutLogWithExercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(logs)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn update_log(&self, id: i64, changes: &UpdateWorkoutLog) -> Result<WorkoutLog> {
        let pool = self.pool.clone();
        let changes = changes.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let current = tx
                .query_row(
                    "SELECT * FROM workout_logs WHERE id = ?",
                    [id],
                    WorkoutLog::from_row,
                )
                .optional()?
                .ok_or_else(|| AppError::not_found("Workout log", id))?;

            let log = current.apply(&changes)?;
            tx.execute(
                "UPDATE workout_logs
                 SET reps = ?, weight = ?, time = ?, calories_burned = ?, note = ?
                 WHERE id = ?",
                rusqlite::params![
                    log.reps,
                    log.weight,
                    log.time_micros(),
                    log.calories_burned,
                    log.note,
                    id
                ],
            )?;
            tx.commit()?;
            Ok(log)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete_log(&self, id: i64) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM workout_logs WHERE id = ?", [id])?;
            if rows == 0 {
                return Err(AppError::not_found("Workout log", id));
            }
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
