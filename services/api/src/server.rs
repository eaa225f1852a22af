use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::{enrollment_app, with_operational_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use enrollments::config::AppConfig;
use enrollments::enrollment::{InMemoryEnrollmentRepository, PgEnrollmentRepository};
use enrollments::error::AppError;
use enrollments::telemetry;
use enrollments::upstream::{HttpCourseLookup, HttpUserLookup};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Some(Arc::new(prometheus_handle)),
    };

    let users = Arc::new(HttpUserLookup::from_config(&config.upstream)?);
    let courses = Arc::new(HttpCourseLookup::from_config(&config.upstream)?);
    let pagination = config.pagination.clone();

    let enrollments = if args.in_memory {
        info!("storing enrollments in memory");
        let repository = Arc::new(InMemoryEnrollmentRepository::default());
        enrollment_app(repository, users, courses, pagination)
    } else {
        let repository = Arc::new(PgEnrollmentRepository::connect(&config.database).await?);
        info!("connected to enrollment database");
        enrollment_app(repository, users, courses, pagination)
    };

    let app = with_operational_routes(enrollments)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        user_api = %config.upstream.user_url,
        course_api = %config.upstream.course_url,
        "enrollment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
