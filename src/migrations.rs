//! Embedded database migrations
//!
//! The schema ships inside the binary, so no migration files are needed at runtime.

use crate::db::DbPool;

/// All migrations in order, each as (filename, sql_content)
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_users.sql",
        include_str!("../migrations/001_create_users.sql"),
    ),
    (
        "002_create_exercises.sql",
        include_str!("../migrations/002_create_exercises.sql"),
    ),
    (
        "003_create_workout_routines.sql",
        include_str!("../migrations/003_create_workout_routines.sql"),
    ),
    (
        "004_create_workout_exercises.sql",
        include_str!("../migrations/004_create_workout_exercises.sql"),
    ),
    (
        "005_create_workout_sessions.sql",
        include_str!("../migrations/005_create_workout_sessions.sql"),
    ),
    (
        "006_create_workout_logs.sql",
        include_str!("../migrations/006_create_workout_logs.sql"),
    ),
];

/// Tables created by [`MIGRATIONS`], parents before children.
pub const TABLES: &[&str] = &[
    "users",
    "exercises",
    "workout_routines",
    "workout_exercises",
    "workout_sessions",
    "workout_logs",
];

/// Run all pending migrations on the database pool.
///
/// Applied migrations are recorded in a `_migrations` table; each pending one runs in its
/// own transaction together with its bookkeeping row.
pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    tracing::info!("Running migrations...");

    let mut conn = pool.get()?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let mut applied = 0;
    for (filename, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?",
            [filename],
            |row| row.get(0),
        )?;

        if already_applied {
            tracing::debug!("Skipping already applied migration: {}", filename);
            continue;
        }

        tracing::info!("Running migration: {}", filename);

        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.execute("INSERT INTO _migrations (name) VALUES (?)", [filename])?;
        tx.commit()?;
        applied += 1;
    }

    tracing::info!(applied, "Migrations completed");
    Ok(())
}

/// Run all migrations without tracking.
///
/// Meant for in-memory test databases that are created fresh each time.
pub fn run_migrations_for_tests(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    for (_filename, sql) in MIGRATIONS {
        conn.execute_batch(sql)?;
    }

    Ok(())
}
