//! Session model and related functionality

use serde::{Deserialize, Serialize};

/// Session entity, at most one per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Email of the owning user
    pub user_id: String,
    /// Opaque session token
    pub jwt: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, jwt: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            jwt: jwt.into(),
        }
    }
}
