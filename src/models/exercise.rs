use std::fmt;

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::choices::choice_enum;
use super::nullable::deserialize_nullable;
use super::FromSqliteRow;
use crate::error::Result;
use crate::validation;

pub const EXERCISE_NAME_MAX_CHARS: usize = 100;

choice_enum! {
    pub enum Difficulty for "level_of_difficulty" {
        Easy => ("Easy", "Easy"),
        Medium => ("Medium", "Medium"),
        Hard => ("Hard", "Hard"),
    }
    default = Medium;
}

choice_enum! {
    pub enum ExerciseType for "type" {
        Strength => ("Strength", "Strength"),
        Cardio => ("Cardio", "Cardio"),
        Flexibility => ("Flexibility", "Flexibility"),
        Balance => ("Balance", "Balance"),
    }
    default = Strength;
}

choice_enum! {
    pub enum MuscleGroup for "muscle_group" {
        Chest => ("Chest", "Chest"),
        Back => ("Back", "Back"),
        Legs => ("Legs", "Legs"),
        Shoulders => ("Shoulders", "Shoulders"),
        Arms => ("Arms", "Arms"),
        Abs => ("Abs", "Abs"),
        Glutes => ("Glutes", "Glutes"),
        FullBody => ("Full Body", "Full Body"),
    }
    default = FullBody;
}

/// Shared catalog entry, not owned by any user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub description: Option<String>,
    pub equipment_needed: Option<String>,
    pub level_of_difficulty: Difficulty,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    pub muscle_group: MuscleGroup,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            description: row.get("description")?,
            equipment_needed: row.get("equipment_needed")?,
            level_of_difficulty: row.get("level_of_difficulty")?,
            exercise_type: row.get("type")?,
            muscle_group: row.get("muscle_group")?,
        })
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.exercise_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExercise {
    pub exercise_name: String,
    pub description: Option<String>,
    pub equipment_needed: Option<String>,
    #[serde(default)]
    pub level_of_difficulty: Difficulty,
    #[serde(default, rename = "type")]
    pub exercise_type: ExerciseType,
    #[serde(default)]
    pub muscle_group: MuscleGroup,
}

impl CreateExercise {
    pub fn new(exercise_name: impl Into<String>) -> Self {
        Self {
            exercise_name: exercise_name.into(),
            description: None,
            equipment_needed: None,
            level_of_difficulty: Difficulty::default(),
            exercise_type: ExerciseType::default(),
            muscle_group: MuscleGroup::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validation::not_blank("exercise_name", &self.exercise_name)?;
        validation::max_chars("exercise_name", &self.exercise_name, EXERCISE_NAME_MAX_CHARS)
    }
}

/// Partial update. Optional text columns use a nested `Option` so they can be cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExercise {
    pub exercise_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub equipment_needed: Option<Option<String>>,
    pub level_of_difficulty: Option<Difficulty>,
    #[serde(rename = "type")]
    pub exercise_type: Option<ExerciseType>,
    pub muscle_group: Option<MuscleGroup>,
}

impl Exercise {
    pub fn apply(mut self, changes: &UpdateExercise) -> Result<Self> {
        if let Some(name) = &changes.exercise_name {
            self.exercise_name = name.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(equipment) = &changes.equipment_needed {
            self.equipment_needed = equipment.clone();
        }
        self.level_of_difficulty = changes
            .level_of_difficulty
            .unwrap_or(self.level_of_difficulty);
        self.exercise_type = changes.exercise_type.unwrap_or(self.exercise_type);
        self.muscle_group = changes.muscle_group.unwrap_or(self.muscle_group);

        validation::not_blank("exercise_name", &self.exercise_name)?;
        validation::max_chars("exercise_name", &self.exercise_name, EXERCISE_NAME_MAX_CHARS)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::str::FromStr;

    #[test]
    fn test_exercise_type_rejects_unknown_category() {
        assert!(matches!(
            ExerciseType::from_str("Yoga"),
            Err(AppError::Validation(_))
        ));
        assert_eq!(ExerciseType::ALL.len(), 4);
    }

    #[test]
    fn test_full_body_stored_with_space() {
        assert_eq!(MuscleGroup::FullBody.as_str(), "Full Body");
        assert_eq!(MuscleGroup::parse("Full Body"), Some(MuscleGroup::FullBody));
        assert_eq!(MuscleGroup::parse("FullBody"), None);
    }

    #[test]
    fn test_new_uses_defaults() {
        let input = CreateExercise::new("Plank");
        assert_eq!(input.level_of_difficulty, Difficulty::Medium);
        assert_eq!(input.exercise_type, ExerciseType::Strength);
        assert_eq!(input.muscle_group, MuscleGroup::FullBody);
    }

    #[test]
    fn test_deserialize_type_field() {
        let input: CreateExercise = serde_json::from_str(
            r#"{"exercise_name":"Rowing","type":"Cardio","muscle_group":"Back"}"#,
        )
        .unwrap();
        assert_eq!(input.exercise_type, ExerciseType::Cardio);
        assert_eq!(input.muscle_group, MuscleGroup::Back);

        let invalid: std::result::Result<CreateExercise, _> =
            serde_json::from_str(r#"{"exercise_name":"Rowing","type":"Yoga"}"#);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(CreateExercise::new("Squat").validate().is_ok());
        assert!(CreateExercise::new("").validate().is_err());
        assert!(CreateExercise::new("x".repeat(101)).validate().is_err());
    }

    #[test]
    fn test_apply_clears_optional_text() {
        let exercise = Exercise {
            exercise_id: 1,
            exercise_name: "Squat".to_string(),
            description: Some("Back squat".to_string()),
            equipment_needed: Some("Barbell".to_string()),
            level_of_difficulty: Difficulty::Hard,
            exercise_type: ExerciseType::Strength,
            muscle_group: MuscleGroup::Legs,
        };

        let updated = exercise
            .apply(&UpdateExercise {
                equipment_needed: Some(None),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.equipment_needed, None);
        assert_eq!(updated.description.as_deref(), Some("Back squat"));
        assert_eq!(updated.to_string(), "Squat");
    }

    #[test]
    fn test_update_deserialize_null_clears() {
        let changes: UpdateExercise =
            serde_json::from_str(r#"{"description":null,"type":"Cardio"}"#).unwrap();

        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.equipment_needed, None);
        assert_eq!(changes.exercise_type, Some(ExerciseType::Cardio));
    }
}
