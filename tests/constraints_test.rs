mod common;

use std::str::FromStr;

use fittrack::error::AppError;
use fittrack::models::{
    CreateExercise, CreateRoutine, CreateWorkoutLog, ExerciseType, UpdateRoutine, UpdateUser,
};
use fittrack::repositories::{
    ExerciseRepository, RoutineRepository, UserRepository, WorkoutRepository,
};

#[tokio::test]
async fn test_user_age_is_bounded() {
    let pool = common::setup_test_db();
    let repo = UserRepository::new(pool.clone());

    for age in [0, 120] {
        let mut input = common::user_input(&format!("age{age}"));
        input.age = age;
        assert!(repo.create(&input).await.is_ok(), "age {age} should be accepted");
    }

    for age in [-1, 121] {
        let mut input = common::user_input(&format!("bad{}", age + 1));
        input.age = age;
        assert!(matches!(
            repo.create(&input).await,
            Err(AppError::Validation(_))
        ));
    }

    let user = repo.find_by_user_name("age0").await.unwrap().unwrap();
    let result = repo
        .update(
            user.user_id,
            &UpdateUser {
                age: Some(121),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(common::count_rows(&pool, "users"), 2);
}

#[tokio::test]
async fn test_user_name_is_unique() {
    let pool = common::setup_test_db();
    common::create_test_user(&pool, "ana").await;

    let result = UserRepository::new(pool.clone())
        .create(&common::user_input("ana"))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(common::count_rows(&pool, "users"), 1);
}

#[tokio::test]
async fn test_user_measurement_precision() {
    let pool = common::setup_test_db();
    let repo = UserRepository::new(pool);
    let mut input = common::user_input("ana");
    input.height = rust_decimal::Decimal::from_str("1.815").unwrap();

    assert!(matches!(
        repo.create(&input).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_user_email_shape() {
    let pool = common::setup_test_db();
    let repo = UserRepository::new(pool);
    let mut input = common::user_input("ana");
    input.email = "not-an-email".to_string();

    assert!(matches!(
        repo.create(&input).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_routine_description_limit() {
    let pool = common::setup_test_db();
    let ana = common::create_test_user(&pool, "ana").await;
    let repo = RoutineRepository::new(pool.clone());

    let result = repo
        .create(
            ana.user_id,
            &CreateRoutine {
                routine_name: "Long".to_string(),
                description: "x".repeat(401),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let routine = common::create_test_routine(&pool, ana.user_id, "Short").await;
    let result = repo
        .update(
            routine.routine_id,
            &UpdateRoutine {
                description: Some("y".repeat(401)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let stored = repo.find_by_id(routine.routine_id).await.unwrap().unwrap();
    assert_eq!(stored.description, "");
}

#[tokio::test]
async fn test_exercise_type_outside_categories_fails() {
    assert!(matches!(
        ExerciseType::from_str("Yoga"),
        Err(AppError::Validation(_))
    ));

    let parsed: Result<CreateExercise, _> =
        serde_json::from_str(r#"{"exercise_name":"Sun Salutation","type":"Yoga"}"#);
    assert!(parsed.is_err());

    let pool = common::setup_test_db();
    let conn = pool.get().unwrap();
    let err = conn
        .execute(
            "INSERT INTO exercises (exercise_name, type) VALUES ('Sun Salutation', 'Yoga')",
            [],
        )
        .unwrap_err();
    assert!(matches!(AppError::from(err), AppError::Validation(_)));
}

#[tokio::test]
async fn test_every_declared_exercise_type_is_storable() {
    let pool = common::setup_test_db();
    let repo = ExerciseRepository::new(pool);

    for exercise_type in ExerciseType::ALL {
        let created = repo
            .create(&CreateExercise {
                exercise_type: *exercise_type,
                ..CreateExercise::new(format!("{exercise_type} drill"))
            })
            .await
            .unwrap();
        assert_eq!(created.exercise_type, *exercise_type);
    }

    assert_eq!(repo.find_all().await.unwrap().len(), ExerciseType::ALL.len());
}

#[tokio::test]
async fn test_log_id_is_globally_unique() {
    let pool = common::setup_test_db();
    let ana = common::create_test_user(&pool, "ana").await;
    let squat = common::create_test_exercise(&pool, "Squat").await;
    let first_routine = common::create_test_routine(&pool, ana.user_id, "A").await;
    let second_routine = common::create_test_routine(&pool, ana.user_id, "B").await;
    let first = common::create_test_session(&pool, first_routine.routine_id, 20).await;
    let second = common::create_test_session(&pool, second_routine.routine_id, 25).await;
    let repo = WorkoutRepository::new(pool.clone());
    let input = CreateWorkoutLog {
        log_id: Some("2026-10-15-squat".to_string()),
        ..CreateWorkoutLog::new(squat.exercise_id)
    };

    repo.create_log(first.session_id, &input).await.unwrap();
    // Uniqueness spans sessions, not just one session
    let result = repo.create_log(second.session_id, &input).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(common::count_rows(&pool, "workout_logs"), 1);
}

#[tokio::test]
async fn test_routine_order_is_deterministic() {
    let pool = common::setup_test_db();
    let ana = common::create_test_user(&pool, "ana").await;
    let routine = common::create_test_routine(&pool, ana.user_id, "Full").await;
    let repo = RoutineRepository::new(pool.clone());

    let mut expected = Vec::new();
    for (name, order) in [("Row", 7), ("Squat", 2), ("Press", 4), ("Plank", 0)] {
        let exercise = common::create_test_exercise(&pool, name).await;
        repo.add_exercise(routine.routine_id, exercise.exercise_id, order)
            .await
            .unwrap();
        expected.push((order, name.to_string()));
    }
    expected.sort();

    let first: Vec<_> = repo
        .find_exercises(routine.routine_id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| (e.order, e.exercise_name))
        .collect();
    let second: Vec<_> = repo
        .find_exercises(routine.routine_id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| (e.order, e.exercise_name))
        .collect();

    assert_eq!(first, expected);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_parents_are_reported() {
    let pool = common::setup_test_db();

    let routine = RoutineRepository::new(pool.clone())
        .create(404, &CreateRoutine::default())
        .await;
    assert!(matches!(routine, Err(AppError::ForeignKey(_))));

    let session = WorkoutRepository::new(pool.clone())
        .create_session(404, 30)
        .await;
    assert!(matches!(session, Err(AppError::ForeignKey(_))));

    let deleted = UserRepository::new(pool.clone()).delete(404).await;
    assert!(matches!(deleted, Err(AppError::NotFound(_))));
}
