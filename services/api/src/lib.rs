mod cli;
mod infra;
mod routes;
mod server;

use enrollments::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
