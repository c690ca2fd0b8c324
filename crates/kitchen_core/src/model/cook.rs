//! Cook (kitchen staff member) record.
//!
//! Credentials and sessions belong to the identity provider; this record only
//! carries the profile fields the kitchen cares about.

use super::validation::{limit_text, require_id, require_text, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a cook. Also the identity the provider hands over.
pub type CookId = Uuid;

pub const USERNAME_MAX_CHARS: usize = 150;
pub const PERSON_NAME_MAX_CHARS: usize = 150;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

/// Staff member with years of experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cook {
    pub id: CookId,
    /// Unique login name.
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// `None` when unknown; sorts before any number.
    pub years_of_experience: Option<i32>,
}

impl Cook {
    /// Creates a cook with a generated stable ID and empty profile fields.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            years_of_experience: None,
        }
    }

    /// Builder-style setter for first/last name.
    pub fn named(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Builder-style setter for years of experience.
    pub fn with_experience(mut self, years: Option<i32>) -> Self {
        self.years_of_experience = years;
        self
    }

    /// `"username: First Last"`, as shown in staff listings.
    pub fn display_name(&self) -> String {
        format!("{}: {} {}", self.username, self.first_name, self.last_name)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("id", self.id)?;
        require_text("username", &self.username, USERNAME_MAX_CHARS)?;
        if !USERNAME_RE.is_match(&self.username) {
            return Err(ValidationError::InvalidUsername);
        }
        limit_text("first_name", &self.first_name, PERSON_NAME_MAX_CHARS)?;
        limit_text("last_name", &self.last_name, PERSON_NAME_MAX_CHARS)?;
        if matches!(self.years_of_experience, Some(years) if years < 0) {
            return Err(ValidationError::NegativeExperience);
        }
        Ok(())
    }
}
