use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(ProfileError::InvalidGender(s.to_string())),
        }
    }
}

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_year: i32,
    pub gender: Gender,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect()
    }

    pub fn age_in(&self, year: i32) -> i32 {
        year - self.birth_year
    }
}

/// Registration details collected before signup.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_year: i32,
    pub gender: Gender,
}

impl NewProfile {
    pub fn validate(&self, current_year: i32) -> Result<(), ProfileError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ProfileError::MissingName);
        }
        if !self.email.contains('@') {
            return Err(ProfileError::InvalidEmail(self.email.clone()));
        }
        if !(1900..=current_year).contains(&self.birth_year) {
            return Err(ProfileError::BirthYearOutOfRange(self.birth_year));
        }
        Ok(())
    }
}
