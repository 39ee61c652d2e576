mod common;

use fittrack::repositories::{RoutineRepository, WorkoutRepository};

#[tokio::test]
async fn test_find_sessions_by_user_only_returns_own_sessions() {
    let pool = common::setup_test_db();
    let ana = common::create_test_user(&pool, "ana").await;
    let bo = common::create_test_user(&pool, "bo").await;
    let legs = common::create_test_routine(&pool, ana.user_id, "Legs").await;
    let push = common::create_test_routine(&pool, ana.user_id, "Push").await;
    let bo_legs = common::create_test_routine(&pool, bo.user_id, "Legs").await;

    let first = common::create_test_session(&pool, legs.routine_id, 40).await;
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = common::create_test_session(&pool, push.routine_id, 30).await;
    let bo_session = common::create_test_session(&pool, bo_legs.routine_id, 50).await;

    let workouts = WorkoutRepository::new(pool.clone());
    let ana_sessions: Vec<_> = workouts
        .find_sessions_by_user(ana.user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.session_id)
        .collect();
    assert_eq!(ana_sessions, vec![second.session_id, first.session_id]);

    let bo_sessions = workouts.find_sessions_by_user(bo.user_id).await.unwrap();
    assert_eq!(bo_sessions, vec![bo_session]);
}

#[tokio::test]
async fn test_find_routines_by_user_newest_first() {
    let pool = common::setup_test_db();
    let ana = common::create_test_user(&pool, "ana").await;
    let bo = common::create_test_user(&pool, "bo").await;

    let older = common::create_test_routine(&pool, ana.user_id, "Legs").await;
    std::thread::sleep(std::time::Duration::from_millis(5));
    let newer = common::create_test_routine(&pool, ana.user_id, "Push").await;
    common::create_test_routine(&pool, bo.user_id, "Pull").await;

    let names: Vec<_> = RoutineRepository::new(pool.clone())
        .find_by_user(ana.user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.routine_name)
        .collect();

    assert_eq!(names, vec![newer.routine_name, older.routine_name]);
}
