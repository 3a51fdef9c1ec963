//! User intake model — the attributes the form collects before a check.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Gender as collected by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Korean label used in the generator prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "남성",
            Gender::Female => "여성",
        }
    }
}

/// Calendar system the birthdate is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    Solar,
    Lunar,
}

impl CalendarSystem {
    /// Korean label used in the generator prompt.
    pub fn label(&self) -> &'static str {
        match self {
            CalendarSystem::Solar => "양력",
            CalendarSystem::Lunar => "음력",
        }
    }
}

/// User attributes collected by the intake form. Immutable once submitted,
/// passed by value to the generator client, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub gender: Gender,
    pub calendar: CalendarSystem,
    pub birthdate: NaiveDate,
}

impl UserProfile {
    /// Rejects profiles the intake form should never submit.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        Ok(())
    }
}
