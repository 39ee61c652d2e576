mod choices;
pub mod exercise;
pub mod from_row;
mod nullable;
pub mod user;
pub mod workout_log;
pub mod workout_routine;
pub mod workout_session;

pub use exercise::{CreateExercise, Difficulty, Exercise, ExerciseType, MuscleGroup, UpdateExercise};
pub use from_row::FromSqliteRow;
pub use user::{ActivityLevel, CreateUser, FitnessGoal, Gender, UpdateUser, User};
pub use workout_log::{CreateWorkoutLog, UpdateWorkoutLog, WorkoutLog, WorkoutLogWithExercise};
pub use workout_routine::{
    CreateRoutine, UpdateRoutine, WorkoutExercise, WorkoutExerciseWithName, WorkoutRoutine,
};
pub use workout_session::WorkoutSession;
