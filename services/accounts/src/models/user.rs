//! User model and related functionality

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-defined user preferences, kept in insertion order
pub type Preferences = Map<String, Value>;

/// User entity, identified by its email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
    /// Password hash produced by the caller, stored as is
    pub password: String,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

impl User {
    /// Create a user without preferences
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password: password.into(),
            preferences: None,
        }
    }

    /// Attach preferences to the user
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }
}
