use std::fmt;

use rusqlite::Row;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::choices::choice_enum;
use super::from_row::get_decimal;
use super::FromSqliteRow;
use crate::error::Result;
use crate::validation;

pub const USER_NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const AGE_MIN: i32 = 0;
pub const AGE_MAX: i32 = 120;
/// Weight (kg) and height (m) share the same precision.
pub const MEASUREMENT_MAX_DIGITS: u32 = 5;
pub const MEASUREMENT_DECIMAL_PLACES: u32 = 2;

choice_enum! {
    pub enum Gender for "gender" {
        Male => ("M", "Male"),
        Female => ("F", "Female"),
    }
    default = Male;
}

choice_enum! {
    pub enum ActivityLevel for "activity" {
        Sedentary => ("sedentary", "Sedentary (little or no exercise)"),
        LightlyActive => ("lightly_active", "Lightly active (light exercise/sports 1-3 days/week)"),
        ModeratelyActive => (
            "moderately_active",
            "Moderately active (moderate exercise/sports 3-5 days/week)"
        ),
        VeryActive => ("very_active", "Very active (hard exercise/sports 6-7 days/week)"),
        SuperActive => (
            "super_active",
            "Super active (very hard exercise/sports & physical job or training twice a day)"
        ),
    }
    default = Sedentary;
}

choice_enum! {
    pub enum FitnessGoal for "goal" {
        WeightLoss => ("weight_loss", "Lose Weight"),
        MuscleGain => ("muscle_gain", "Gain Muscle"),
        ImproveEndurance => ("improve_endurance", "Improve Endurance"),
        MaintainWeight => ("maintain_weight", "Maintain Weight"),
        Flexibility => ("flexibility", "Increase Flexibility"),
        OverallHealth => ("overall_health", "Improve Overall Health"),
    }
    default = OverallHealth;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub user_name: String,
    pub email: String,
    pub age: i32,
    pub weight: Decimal,
    pub height: Decimal,
    pub gender: Gender,
    pub activity: ActivityLevel,
    pub goal: FitnessGoal,
}

impl FromSqliteRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            user_name: row.get("user_name")?,
            email: row.get("email")?,
            age: row.get("age")?,
            weight: get_decimal(row, "weight")?,
            height: get_decimal(row, "height")?,
            gender: row.get("gender")?,
            activity: row.get("activity")?,
            goal: row.get("goal")?,
        })
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub user_name: String,
    pub email: String,
    pub age: i32,
    pub weight: Decimal,
    pub height: Decimal,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub activity: ActivityLevel,
    #[serde(default)]
    pub goal: FitnessGoal,
}

impl CreateUser {
    pub fn validate(&self) -> Result<()> {
        validation::not_blank("user_name", &self.user_name)?;
        validation::max_chars("user_name", &self.user_name, USER_NAME_MAX_CHARS)?;
        validation::max_chars("email", &self.email, EMAIL_MAX_CHARS)?;
        validation::email("email", &self.email)?;
        validation::range("age", self.age, AGE_MIN, AGE_MAX)?;
        validation::decimal(
            "weight",
            self.weight,
            MEASUREMENT_MAX_DIGITS,
            MEASUREMENT_DECIMAL_PLACES,
        )?;
        validation::decimal(
            "height",
            self.height,
            MEASUREMENT_MAX_DIGITS,
            MEASUREMENT_DECIMAL_PLACES,
        )?;
        Ok(())
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub weight: Option<Decimal>,
    pub height: Option<Decimal>,
    pub gender: Option<Gender>,
    pub activity: Option<ActivityLevel>,
    pub goal: Option<FitnessGoal>,
}

impl User {
    /// Merge `changes` into this user and validate the result.
    pub fn apply(mut self, changes: &UpdateUser) -> Result<Self> {
        if let Some(user_name) = &changes.user_name {
            self.user_name = user_name.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        self.age = changes.age.unwrap_or(self.age);
        self.weight = changes.weight.unwrap_or(self.weight);
        self.height = changes.height.unwrap_or(self.height);
        self.gender = changes.gender.unwrap_or(self.gender);
        self.activity = changes.activity.unwrap_or(self.activity);
        self.goal = changes.goal.unwrap_or(self.goal);

        CreateUser::from(&self).validate()?;
        Ok(self)
    }
}

impl From<&User> for CreateUser {
    fn from(user: &User) -> Self {
        Self {
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            age: user.age,
            weight: user.weight,
            height: user.height,
            gender: user.gender,
            activity: user.activity,
            goal: user.goal,
        }
    }
}
