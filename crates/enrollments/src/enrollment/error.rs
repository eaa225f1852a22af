use super::lookup::LookupError;

/// Missing required input, detected before any I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("user id is required")]
    UserIdRequired,
    #[error("course id is required")]
    CourseIdRequired,
    #[error("status is required")]
    StatusRequired,
}

impl ValidationError {
    /// Name of the request field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::UserIdRequired => "user_id",
            ValidationError::CourseIdRequired => "course_id",
            ValidationError::StatusRequired => "status",
        }
    }
}

/// Every failure the enrollment core can surface.
///
/// Messages of upstream and unexpected failures are carried through untouched so the
/// HTTP layer can report them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("enrollment '{id}' doesn't exist")]
    NotFound { id: String },
    #[error("{0}")]
    UpstreamNotFound(String),
    #[error("{0}")]
    Unexpected(String),
}

impl EnrollmentError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn unexpected(message: impl ToString) -> Self {
        Self::Unexpected(message.to_string())
    }
}

impl From<LookupError> for EnrollmentError {
    fn from(value: LookupError) -> Self {
        match value {
            LookupError::NotFound(message) => Self::UpstreamNotFound(message),
            LookupError::Unexpected(message) => Self::Unexpected(message),
        }
    }
}

impl From<sqlx::Error> for EnrollmentError {
    fn from(value: sqlx::Error) -> Self {
        Self::Unexpected(value.to_string())
    }
}
