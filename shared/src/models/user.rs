//! User models

use serde::{Deserialize, Serialize};

use crate::types::{ParseLabelError, RecordId};

/// A registered account. Owns crop cycles, fixed costs, machinery and improvements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub username: String,
    /// bcrypt hash, never the plaintext password
    pub password_hash: String,
    pub profile: UserProfile,
}

/// User as handed to callers after authentication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    pub id: RecordId,
    pub name: String,
    pub username: String,
    pub profile: UserProfile,
}

impl From<&User> for UserAccount {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            profile: user.profile,
        }
    }
}

/// Kind of account holder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum UserProfile {
    #[default]
    #[serde(rename = "Produtor")]
    Producer,
    #[serde(rename = "Técnico")]
    Technician,
}

impl UserProfile {
    pub fn label(&self) -> &'static str {
        match self {
            UserProfile::Producer => "Produtor",
            UserProfile::Technician => "Técnico",
        }
    }
}

impl std::fmt::Display for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for UserProfile {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "produtor" | "producer" => Ok(UserProfile::Producer),
            "técnico" | "tecnico" | "technician" => Ok(UserProfile::Technician),
            _ => Err(ParseLabelError::new("user profile", s)),
        }
    }
}

/// Input for registering a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserInput {
    pub name: String,
    pub username: String,
    pub password: String,
    pub profile: UserProfile,
}
