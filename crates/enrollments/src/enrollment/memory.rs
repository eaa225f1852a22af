use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use super::domain::{Enrollment, EnrollmentUpdate, Filters};
use super::error::EnrollmentError;
use super::repository::EnrollmentRepository;

/// Process-local repository used by `serve --in-memory` and tests.
#[derive(Default, Clone)]
pub struct InMemoryEnrollmentRepository {
    records: Arc<Mutex<Vec<Enrollment>>>,
}

impl InMemoryEnrollmentRepository {
    fn records(&self) -> Result<MutexGuard<'_, Vec<Enrollment>>, EnrollmentError> {
        self.records
            .lock()
            .map_err(|_| EnrollmentError::unexpected("enrollment store mutex poisoned"))
    }

    /// Snapshot of every stored enrollment in insertion order.
    pub fn snapshot(&self) -> Vec<Enrollment> {
        self.records
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn create(&self, enrollment: &mut Enrollment) -> Result<(), EnrollmentError> {
        let now = Utc::now();
        enrollment.id = Uuid::new_v4().to_string();
        enrollment.created_at = Some(now);
        enrollment.updated_at = Some(now);

        self.records()?.push(enrollment.clone());
        Ok(())
    }

    async fn get_all(
        &self,
        filters: &Filters,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Enrollment>, EnrollmentError> {
        let guard = self.records()?;
        // Later inserts sit at the back, so reversing yields newest first even when
        // two records share a timestamp.
        Ok(guard
            .iter()
            .rev()
            .filter(|enrollment| filters.matches(enrollment))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, update: &EnrollmentUpdate) -> Result<(), EnrollmentError> {
        let mut guard = self.records()?;
        let Some(record) = guard.iter_mut().find(|enrollment| enrollment.id == id) else {
            warn!(enrollment_id = %id, "enrollment doesn't exist");
            return Err(EnrollmentError::not_found(id));
        };

        if let Some(status) = &update.status {
            record.status = status.clone();
            record.updated_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn count(&self, filters: &Filters) -> Result<usize, EnrollmentError> {
        let guard = self.records()?;
        Ok(guard
            .iter()
            .filter(|enrollment| filters.matches(enrollment))
            .count())
    }
}
