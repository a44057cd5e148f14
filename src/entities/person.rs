//! Person entity type - responsible parties for projects and activities

use serde::{Deserialize, Serialize};

/// A person who can be assigned as responsible for records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Row id
    pub id: i64,

    /// Login-style username, unique across the store
    pub username: String,

    /// Display name
    pub full_name: String,

    /// Email address
    pub email: Option<String>,

    /// Privileged account flag; imports fall back to the first active admin
    pub is_admin: bool,

    /// Inactive people are skipped when resolving responsibles
    pub is_active: bool,
}

impl Person {
    /// Label used in human-readable listings
    pub fn label(&self) -> &str {
        if self.full_name.is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}
