//! PostgreSQL-backed [`EnrollmentRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use tracing::{error, warn};
use uuid::Uuid;

use super::domain::{Enrollment, EnrollmentUpdate, Filters};
use super::error::EnrollmentError;
use super::repository::EnrollmentRepository;
use crate::config::DatabaseConfig;
use crate::error::AppError;

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, course_id, status, created_at, updated_at FROM enrollments";

#[derive(Debug, sqlx::FromRow)]
struct EnrollmentRow {
    id: String,
    user_id: String,
    course_id: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            course_id: row.course_id,
            status: row.status,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

#[derive(Clone)]
pub struct PgEnrollmentRepository {
    pool: PgPool,
}

impl PgEnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `DATABASE_URL` and applies pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(config.url()?)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

fn storage_error(err: sqlx::Error) -> EnrollmentError {
    error!(error = %err, "enrollment storage failure");
    EnrollmentError::from(err)
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &Filters) {
    let mut separator = " WHERE ";
    if let Some(user_id) = &filters.user_id {
        builder
            .push(separator)
            .push("user_id = ")
            .push_bind(user_id.clone());
        separator = " AND ";
    }
    if let Some(course_id) = &filters.course_id {
        builder
            .push(separator)
            .push("course_id = ")
            .push_bind(course_id.clone());
    }
}

fn to_bind(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn list_query(filters: &Filters, offset: usize, limit: usize) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_COLUMNS);
    push_filters(&mut builder, filters);
    builder
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(to_bind(limit))
        .push(" OFFSET ")
        .push_bind(to_bind(offset));
    builder
}

fn count_query(filters: &Filters) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM enrollments");
    push_filters(&mut builder, filters);
    builder
}

#[async_trait]
impl EnrollmentRepository for PgEnrollmentRepository {
    async fn create(&self, enrollment: &mut Enrollment) -> Result<(), EnrollmentError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO enrollments (id, user_id, course_id, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5)",
        )
        .bind(&id)
        .bind(&enrollment.user_id)
        .bind(&enrollment.course_id)
        .bind(&enrollment.status)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        enrollment.id = id;
        enrollment.created_at = Some(now);
        enrollment.updated_at = Some(now);
        Ok(())
    }

    async fn get_all(
        &self,
        filters: &Filters,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Enrollment>, EnrollmentError> {
        let rows = list_query(filters, offset, limit)
            .build_query_as::<EnrollmentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(Enrollment::from).collect())
    }

    async fn update(&self, id: &str, update: &EnrollmentUpdate) -> Result<(), EnrollmentError> {
        let matched = match &update.status {
            Some(status) => {
                sqlx::query("UPDATE enrollments SET status = $1, updated_at = $2 WHERE id = $3")
                    .bind(status)
                    .bind(Utc::now())
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(storage_error)?
                    .rows_affected()
            }
            // Nothing to write; the id must still exist.
            None => {
                let found: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE id = $1")
                        .bind(id)
                        .fetch_one(&self.pool)
                        .await
                        .map_err(storage_error)?;
                u64::try_from(found).unwrap_or(0)
            }
        };

        if matched == 0 {
            warn!(enrollment_id = %id, "enrollment doesn't exist");
            return Err(EnrollmentError::not_found(id));
        }
        Ok(())
    }

    async fn count(&self, filters: &Filters) -> Result<usize, EnrollmentError> {
        let total: i64 = count_query(filters)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        usize::try_from(total).map_err(EnrollmentError::unexpected)
    }
}
