//! CarePortal service
//!
//! Main entry point for the CarePortal triage and appointment API.

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use careportal::api::{self, middleware::cors, AppState};
use careportal::config::{self, LogConfig, LogFormat};
use careportal::engine::TriageProtocol;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = config::load_config().context("Failed to load configuration")?;

    // Initialize logger
    init_tracing(&config.log);

    let protocol = match &config.triage.protocol_path {
        Some(path) => TriageProtocol::from_json_file(path)
            .with_context(|| format!("Failed to load triage protocol from {}", path))?,
        None => TriageProtocol::standard(),
    };

    // Create app state
    let app_state = web::Data::new(AppState::new(protocol));
    let cors_origins = config.server.cors_origins.clone();

    info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting CarePortal API"
    );

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(cors(&cors_origins))
            .wrap(TracingLogger::default())
            .configure(api::configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
