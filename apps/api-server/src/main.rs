//! # Quill API Server
//!
//! HTTP entry point for the Quill posting service. Wires the database,
//! file storage, and auth services into Actix-web and exposes the JSON
//! API consumed by the web client.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use quill_core::ports::{PasswordService, TokenService};
use quill_infra::auth::{Argon2PasswordService, JwtTokenService};
use quill_infra::database::DatabaseConnections;
use quill_infra::storage::DiskFileStore;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill API server on {}:{}",
        config.host,
        config.port
    );

    let Some(db_config) = config.database.as_ref() else {
        tracing::error!("DATABASE_URL is not set, refusing to start without a database");
        return Err(std::io::Error::other("DATABASE_URL is not set"));
    };

    let connections = DatabaseConnections::init(db_config)
        .await
        .map_err(std::io::Error::other)?;

    let files = DiskFileStore::new(&config.storage.root);
    files.ensure_root().await.map_err(std::io::Error::other)?;
    tracing::info!("File storage ready at {}", config.storage.root);

    let state = AppState::new(connections, files, &config.storage);

    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            // Raw image uploads need more than the 256 KiB payload default.
            .app_data(web::PayloadConfig::new(4 * 1024 * 1024))
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
