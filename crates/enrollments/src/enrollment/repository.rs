use async_trait::async_trait;

use super::domain::{Enrollment, EnrollmentUpdate, Filters};
use super::error::EnrollmentError;

/// Storage abstraction so the service can be exercised in isolation.
///
/// Implementations report a missing row on update as [`EnrollmentError::NotFound`] and
/// every other storage failure as [`EnrollmentError::Unexpected`].
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Inserts `enrollment`, assigning its `id` (and timestamps) in place.
    async fn create(&self, enrollment: &mut Enrollment) -> Result<(), EnrollmentError>;

    /// Matching enrollments, newest first, windowed by `offset`/`limit`.
    async fn get_all(
        &self,
        filters: &Filters,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Enrollment>, EnrollmentError>;

    /// Applies the supplied fields of `update`. An empty update still fails with
    /// `NotFound` when `id` matches nothing.
    async fn update(&self, id: &str, update: &EnrollmentUpdate) -> Result<(), EnrollmentError>;

    async fn count(&self, filters: &Filters) -> Result<usize, EnrollmentError>;
}
