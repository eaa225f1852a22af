use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::domain::{EnrollmentUpdate, Filters};
use super::error::{EnrollmentError, ValidationError};
use super::lookup::{CourseLookup, UserLookup};
use super::repository::EnrollmentRepository;
use super::service::EnrollmentService;
use crate::config::PaginationConfig;
use crate::pagination::Meta;

/// Envelope shared by every enrollment response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub status: u16,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub course_id: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// Raw list query. Pagination values that are absent or not integers read as zero.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

fn lenient_number(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(0)
}

/// Status code for each failure kind.
pub fn status_for(error: &EnrollmentError) -> StatusCode {
    match error {
        EnrollmentError::Validation(_) => StatusCode::BAD_REQUEST,
        EnrollmentError::NotFound { .. } | EnrollmentError::UpstreamNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        EnrollmentError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for EnrollmentError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            error!(error = %self, "enrollment request failed");
        }

        let body = ApiResponse::<()> {
            message: self.to_string(),
            status: status.as_u16(),
            data: None,
            meta: None,
        };
        (status, Json(body)).into_response()
    }
}

fn success<T: Serialize>(status: StatusCode, data: Option<T>, meta: Option<Meta>) -> Response {
    let body = ApiResponse {
        message: "success".to_string(),
        status: status.as_u16(),
        data,
        meta,
    };
    (status, Json(body)).into_response()
}

/// Handler state: the service plus the raw paginator defaults.
pub struct EnrollmentState<R, U, C> {
    pub service: Arc<EnrollmentService<R, U, C>>,
    pub pagination: Arc<PaginationConfig>,
}

impl<R, U, C> Clone for EnrollmentState<R, U, C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            pagination: Arc::clone(&self.pagination),
        }
    }
}

/// Router exposing create, list, and status update endpoints.
pub fn enrollment_router<R, U, C>(
    service: Arc<EnrollmentService<R, U, C>>,
    pagination: PaginationConfig,
) -> Router
where
    R: EnrollmentRepository + 'static,
    U: UserLookup + 'static,
    C: CourseLookup + 'static,
{
    let state = EnrollmentState {
        service,
        pagination: Arc::new(pagination),
    };

    Router::new()
        .route(
            "/enrollments",
            get(list_handler::<R, U, C>).post(create_handler::<R, U, C>),
        )
        .route("/enrollments/:id", patch(update_handler::<R, U, C>))
        .with_state(state)
}

pub(crate) async fn create_handler<R, U, C>(
    State(state): State<EnrollmentState<R, U, C>>,
    Json(request): Json<CreateRequest>,
) -> Result<Response, EnrollmentError>
where
    R: EnrollmentRepository + 'static,
    U: UserLookup + 'static,
    C: CourseLookup + 'static,
{
    if request.user_id.is_empty() {
        return Err(ValidationError::UserIdRequired.into());
    }
    if request.course_id.is_empty() {
        return Err(ValidationError::CourseIdRequired.into());
    }

    let enrollment = state
        .service
        .create(&request.user_id, &request.course_id)
        .await?;
    Ok(success(StatusCode::CREATED, Some(enrollment), None))
}

pub(crate) async fn list_handler<R, U, C>(
    State(state): State<EnrollmentState<R, U, C>>,
    Query(params): Query<ListParams>,
) -> Result<Response, EnrollmentError>
where
    R: EnrollmentRepository + 'static,
    U: UserLookup + 'static,
    C: CourseLookup + 'static,
{
    let filters = Filters::new(params.user_id, params.course_id);
    let page = lenient_number(params.page.as_deref());
    let limit = lenient_number(params.limit.as_deref());

    let total = state.service.count(&filters).await?;
    let meta = Meta::new(page, limit, total, &state.pagination.default_limit)
        .map_err(EnrollmentError::unexpected)?;

    let enrollments = state
        .service
        .get_all(&filters, meta.offset(), meta.limit())
        .await?;
    Ok(success(StatusCode::OK, Some(enrollments), Some(meta)))
}

pub(crate) async fn update_handler<R, U, C>(
    State(state): State<EnrollmentState<R, U, C>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRequest>,
) -> Result<Response, EnrollmentError>
where
    R: EnrollmentRepository + 'static,
    U: UserLookup + 'static,
    C: CourseLookup + 'static,
{
    let status = match request.status {
        Some(status) if !status.is_empty() => status,
        _ => return Err(ValidationError::StatusRequired.into()),
    };

    state
        .service
        .update(&id, &EnrollmentUpdate::status(status))
        .await?;
    Ok(success::<()>(StatusCode::OK, None, None))
}
