use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use serde_json::Value;

use crate::config::PaginationConfig;
use crate::enrollment::domain::{Enrollment, EnrollmentUpdate, Filters};
use crate::enrollment::error::EnrollmentError;
use crate::enrollment::lookup::{Course, CourseLookup, LookupError, User, UserLookup};
use crate::enrollment::memory::InMemoryEnrollmentRepository;
use crate::enrollment::repository::EnrollmentRepository;
use crate::enrollment::{enrollment_router, EnrollmentService};

/// Lookup double answering every id with the same scripted outcome.
#[derive(Default)]
pub(super) struct ScriptedLookup {
    failure: Option<LookupError>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedLookup {
    pub(super) fn found() -> Self {
        Self::default()
    }

    pub(super) fn missing(message: &str) -> Self {
        Self {
            failure: Some(LookupError::NotFound(message.to_string())),
            requested: Mutex::default(),
        }
    }

    pub(super) fn broken(message: &str) -> Self {
        Self {
            failure: Some(LookupError::Unexpected(message.to_string())),
            requested: Mutex::default(),
        }
    }

    fn record(&self, id: &str) -> Result<(), LookupError> {
        self.requested
            .lock()
            .expect("lookup mutex poisoned")
            .push(id.to_string());
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    pub(super) fn requested(&self) -> Vec<String> {
        self.requested.lock().expect("lookup mutex poisoned").clone()
    }
}

#[async_trait]
impl UserLookup for ScriptedLookup {
    async fn get(&self, id: &str) -> Result<User, LookupError> {
        self.record(id)?;
        Ok(User {
            id: id.to_string(),
            first_name: format!("User {id}"),
            ..User::default()
        })
    }
}

#[async_trait]
impl CourseLookup for ScriptedLookup {
    async fn get(&self, id: &str) -> Result<Course, LookupError> {
        self.record(id)?;
        Ok(Course {
            id: id.to_string(),
            name: format!("Course {id}"),
        })
    }
}

/// Repository double that delegates to memory unless an operation is scripted to fail.
#[derive(Default)]
pub(super) struct ScriptedRepository {
    pub(super) inner: InMemoryEnrollmentRepository,
    pub(super) create_error: Option<EnrollmentError>,
    pub(super) get_all_error: Option<EnrollmentError>,
    pub(super) update_error: Option<EnrollmentError>,
    pub(super) count_error: Option<EnrollmentError>,
    pub(super) calls: Mutex<Vec<&'static str>>,
}

impl ScriptedRepository {
    fn record(
        &self,
        operation: &'static str,
        failure: &Option<EnrollmentError>,
    ) -> Result<(), EnrollmentError> {
        self.calls
            .lock()
            .expect("repository mutex poisoned")
            .push(operation);
        match failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    pub(super) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("repository mutex poisoned").clone()
    }
}

#[async_trait]
impl EnrollmentRepository for ScriptedRepository {
    async fn create(&self, enrollment: &mut Enrollment) -> Result<(), EnrollmentError> {
        self.record("create", &self.create_error)?;
        self.inner.create(enrollment).await
    }

    async fn get_all(
        &self,
        filters: &Filters,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Enrollment>, EnrollmentError> {
        self.record("get_all", &self.get_all_error)?;
        self.inner.get_all(filters, offset, limit).await
    }

    async fn update(&self, id: &str, update: &EnrollmentUpdate) -> Result<(), EnrollmentError> {
        self.record("update", &self.update_error)?;
        self.inner.update(id, update).await
    }

    async fn count(&self, filters: &Filters) -> Result<usize, EnrollmentError> {
        self.record("count", &self.count_error)?;
        self.inner.count(filters).await
    }
}

pub(super) type TestService =
    EnrollmentService<ScriptedRepository, ScriptedLookup, ScriptedLookup>;

pub(super) struct Harness {
    pub(super) repository: Arc<ScriptedRepository>,
    pub(super) users: Arc<ScriptedLookup>,
    pub(super) courses: Arc<ScriptedLookup>,
    pub(super) service: Arc<TestService>,
}

pub(super) fn harness(
    repository: ScriptedRepository,
    users: ScriptedLookup,
    courses: ScriptedLookup,
) -> Harness {
    let repository = Arc::new(repository);
    let users = Arc::new(users);
    let courses = Arc::new(courses);
    let service = Arc::new(EnrollmentService::new(
        repository.clone(),
        users.clone(),
        courses.clone(),
    ));
    Harness {
        repository,
        users,
        courses,
        service,
    }
}

pub(super) fn healthy_harness() -> Harness {
    harness(
        ScriptedRepository::default(),
        ScriptedLookup::found(),
        ScriptedLookup::found(),
    )
}

pub(super) fn unexpected(message: &str) -> EnrollmentError {
    EnrollmentError::Unexpected(message.to_string())
}

pub(super) fn router(harness: &Harness, default_limit: &str) -> axum::Router {
    enrollment_router(
        harness.service.clone(),
        PaginationConfig {
            default_limit: default_limit.to_string(),
        },
    )
}

pub(super) fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("valid request")
}

pub(super) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
