use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{Enrollment, EnrollmentUpdate, Filters};
use super::error::{EnrollmentError, ValidationError};
use super::lookup::{CourseLookup, UserLookup};
use super::repository::EnrollmentRepository;

/// Business rules for enrolling users into courses.
pub struct EnrollmentService<R, U, C> {
    repository: Arc<R>,
    users: Arc<U>,
    courses: Arc<C>,
}

impl<R, U, C> EnrollmentService<R, U, C>
where
    R: EnrollmentRepository + 'static,
    U: UserLookup + 'static,
    C: CourseLookup + 'static,
{
    pub fn new(repository: Arc<R>, users: Arc<U>, courses: Arc<C>) -> Self {
        Self {
            repository,
            users,
            courses,
        }
    }

    /// Enroll `user_id` into `course_id` with a pending status.
    ///
    /// The user is checked before the course and both before anything is written, so a
    /// failure at any step leaves no partial state behind.
    pub async fn create(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Enrollment, EnrollmentError> {
        if user_id.is_empty() {
            return Err(ValidationError::UserIdRequired.into());
        }
        if course_id.is_empty() {
            return Err(ValidationError::CourseIdRequired.into());
        }

        self.users.get(user_id).await?;
        self.courses.get(course_id).await?;

        let mut enrollment = Enrollment::pending(user_id, course_id);
        self.repository.create(&mut enrollment).await?;

        info!(
            enrollment_id = %enrollment.id,
            user_id,
            course_id,
            "enrollment created"
        );
        Ok(enrollment)
    }

    pub async fn get_all(
        &self,
        filters: &Filters,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Enrollment>, EnrollmentError> {
        debug!(?filters, offset, limit, "listing enrollments");
        self.repository.get_all(filters, offset, limit).await
    }

    /// Apply `update` to the enrollment. Any status value is accepted, including a
    /// return to pending.
    pub async fn update(&self, id: &str, update: &EnrollmentUpdate) -> Result<(), EnrollmentError> {
        self.repository.update(id, update).await?;
        debug!(enrollment_id = %id, ?update, "enrollment updated");
        Ok(())
    }

    pub async fn count(&self, filters: &Filters) -> Result<usize, EnrollmentError> {
        self.repository.count(filters).await
    }
}
