mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use mediguide::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
