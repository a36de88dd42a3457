mod cli;
mod commands;
mod demo;
mod infra;
mod routes;
mod server;

use longevity_protocol::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
