//! # Quill API Server
//!
//! The Actix-web HTTP surface over the blog services.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::error::{configure_extractors, route_not_found};
use middleware::error_path::ErrorPath;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(config.database.as_ref(), config.default_page_size).await;

    HttpServer::new(move || {
        App::new()
            .wrap(ErrorPath)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(configure_app)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// Extractor settings, routes and the JSON 404 fallback.
fn configure_app(cfg: &mut web::ServiceConfig) {
    configure_extractors(cfg);
    handlers::configure_routes(cfg);
    cfg.default_service(web::to(route_not_found));
}
