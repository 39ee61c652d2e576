#![allow(dead_code)]

use std::str::FromStr;

use rust_decimal::Decimal;

use fittrack::db::{create_memory_pool, DbPool};
use fittrack::migrations::run_migrations_for_tests;
use fittrack::models::{
    CreateExercise, CreateRoutine, CreateUser, CreateWorkoutLog, Exercise, User, WorkoutLog,
    WorkoutRoutine, WorkoutSession,
};
use fittrack::repositories::{
    ExerciseRepository, RoutineRepository, UserRepository, WorkoutRepository,
};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn count_rows(pool: &DbPool, table: &str) -> i64 {
    let conn = pool.get().unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

pub fn user_input(user_name: &str) -> CreateUser {
    CreateUser {
        user_name: user_name.to_string(),
        email: format!("{user_name}@example.com"),
        age: 34,
        weight: Decimal::from_str("82.40").unwrap(),
        height: Decimal::from_str("1.81").unwrap(),
        gender: Default::default(),
        activity: Default::default(),
        goal: Default::default(),
    }
}

// Test data creation helpers
pub async fn create_test_user(pool: &DbPool, user_name: &str) -> User {
    UserRepository::new(pool.clone())
        .create(&user_input(user_name))
        .await
        .unwrap()
}

pub async fn create_test_exercise(pool: &DbPool, name: &str) -> Exercise {
    ExerciseRepository::new(pool.clone())
        .create(&CreateExercise::new(name))
        .await
        .unwrap()
}

pub async fn create_test_routine(pool: &DbPool, user_id: i64, name: &str) -> WorkoutRoutine {
    RoutineRepository::new(pool.clone())
        .create(
            user_id,
            &CreateRoutine {
                routine_name: name.to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap()
}

pub async fn create_test_session(pool: &DbPool, routine_id: i64, duration: i32) -> WorkoutSession {
    WorkoutRepository::new(pool.clone())
        .create_session(routine_id, duration)
        .await
        .unwrap()
}

pub async fn create_test_log(pool: &DbPool, session_id: i64, exercise_id: i64) -> WorkoutLog {
    WorkoutRepository::new(pool.clone())
        .create_log(session_id, &CreateWorkoutLog::new(exercise_id))
        .await
        .unwrap()
}
