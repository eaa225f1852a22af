use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status assigned to every enrollment at creation.
pub const STATUS_PENDING: &str = "P";

/// Status conventionally used once an enrollment is confirmed.
pub const STATUS_ACTIVE: &str = "A";

/// A user's enrollment in a course.
///
/// `id` stays empty until the repository stores the record. `status` is an opaque
/// code: no transition graph is enforced between values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    /// Unsaved pending enrollment linking `user_id` to `course_id`.
    pub fn pending(user_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.into(),
            course_id: course_id.into(),
            status: STATUS_PENDING.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Equality constraints applied by list and count queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub user_id: Option<String>,
    pub course_id: Option<String>,
}

impl Filters {
    /// Builds filters, treating empty values as "no constraint".
    pub fn new(user_id: Option<String>, course_id: Option<String>) -> Self {
        Self {
            user_id: user_id.filter(|value| !value.is_empty()),
            course_id: course_id.filter(|value| !value.is_empty()),
        }
    }

    pub fn matches(&self, enrollment: &Enrollment) -> bool {
        let user_matches = self
            .user_id
            .as_deref()
            .map_or(true, |user_id| enrollment.user_id == user_id);
        let course_matches = self
            .course_id
            .as_deref()
            .map_or(true, |course_id| enrollment.course_id == course_id);
        user_matches && course_matches
    }
}

/// Partial update of an enrollment. Only supplied fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentUpdate {
    pub status: Option<String>,
}

impl EnrollmentUpdate {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
    }
}
