use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Record returned by the user directory. Only its existence matters to enrollment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Record returned by the course catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Failure reported by a lookup port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unexpected(String),
}

/// Confirms a user exists in the user directory.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn get(&self, id: &str) -> Result<User, LookupError>;
}

/// Confirms a course exists in the course catalog.
#[async_trait]
pub trait CourseLookup: Send + Sync {
    async fn get(&self, id: &str) -> Result<Course, LookupError>;
}
