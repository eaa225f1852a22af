use crate::infra::AppState;
use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json, Router};
use enrollments::config::PaginationConfig;
use enrollments::enrollment::{
    enrollment_router, CourseLookup, EnrollmentRepository, EnrollmentService, UserLookup,
};
use serde_json::json;
use std::sync::Arc;

const ALLOWED_METHODS: &str = "GET, POST, PATCH, OPTIONS, HEAD, DELETE";
const ALLOWED_HEADERS: &str = "Accept,Authorization,Cache-Control,Content-Type,DNT,\
If-Modified-Since,Keep-Alive,Origin,User-Agent,X-Requested-With";

/// Enrollment endpoints wired to concrete storage and lookup adapters.
pub(crate) fn enrollment_app<R, U, C>(
    repository: Arc<R>,
    users: Arc<U>,
    courses: Arc<C>,
    pagination: PaginationConfig,
) -> Router
where
    R: EnrollmentRepository + 'static,
    U: UserLookup + 'static,
    C: CourseLookup + 'static,
{
    let service = Arc::new(EnrollmentService::new(repository, users, courses));
    enrollment_router(service, pagination)
}

/// Adds health, readiness, and metrics routes plus permissive CORS headers.
pub(crate) fn with_operational_routes(router: Router) -> Router {
    router
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .layer(middleware::from_fn(access_control))
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

/// Preflight requests are answered here and never reach a handler.
pub(crate) async fn access_control(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };
    apply_cors_headers(response.headers_mut());
    response
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}
