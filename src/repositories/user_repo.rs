use rusqlite::{OptionalExtension, TransactionBehavior};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreateUser, FromSqliteRow, UpdateUser, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users WHERE user_id = ?")?;
            let result = stmt.query_row([user_id], User::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let user_name = user_name.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users WHERE user_name = ?")?;
            let result = stmt.query_row([&user_name], User::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_all(&self) -> Result<Vec<User>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users ORDER BY user_name")?;
            let users = stmt
                .query_map([], User::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(users)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, input: &CreateUser) -> Result<User> {
        input.validate()?;

        let pool = self.pool.clone();
        let input = input.clone();
        let user = tokio::task::spawn_blocking(move || -> Result<User> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO users (user_name, email, age, weight, height, gender, activity, goal)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    input.user_name,
                    input.email,
                    input.age,
                    input.weight.to_string(),
                    input.height.to_string(),
                    input.gender,
                    input.activity,
                    input.goal
                ],
            )?;
            Ok(User {
                user_id: conn.last_insert_rowid(),
                user_name: input.user_name,
                email: input.email,
                age: input.age,
                weight: input.weight,
                height: input.height,
                gender: input.gender,
                activity: input.activity,
                goal: input.goal,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        tracing::debug!(user_id = user.user_id, "Created user {}", user);
        Ok(user)
    }

    /// Apply a partial update, validating the merged row before writing it.
    pub async fn update(&self, user_id: i64, changes: &UpdateUser) -> Result<User> {
        let pool = self.pool.clone();
        let changes = changes.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let current = tx
                .query_row(
                    "SELECT * FROM users WHERE user_id = ?",
                    [user_id],
                    User::from_row,
                )
                .optional()?
                .ok_or_else(|| AppError::not_found("User", user_id))?;

            let user = current.apply(&changes)?;
            tx.execute(
                "UPDATE users
                 SET user_name = ?, email = ?, age = ?, weight = ?, height = ?,
                     gender = ?, activity = ?, goal = ?
                 WHERE user_id = ?",
                rusqlite::params![
                    user.user_name,
                    user.email,
                    user.age,
                    user.weight.to_string(),
                    user.height.to_string(),
                    user.gender,
                    user.activity,
                    user.goal,
                    user_id
                ],
            )?;
            tx.commit()?;
            Ok(user)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Deleting a user removes its routines and everything hanging off them.
    pub async fn delete(&self, user_id: i64) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM users WHERE user_id = ?", [user_id])?;
            if rows == 0 {
                return Err(AppError::not_found("User", user_id));
            }
            tracing::debug!(user_id, "Deleted user");
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
