mod cli;
mod commands;
mod infra;
mod routes;
mod server;
mod views;

use acft_score::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
