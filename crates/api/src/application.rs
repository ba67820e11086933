use actix_web::{middleware::Logger, web, App, HttpServer};

use geetest_relay_domain::config::{ApiConfig, ConfigError};
use geetest_relay_domain::services::telemetry::{init_telemetry, TelemetryConfig, TelemetryError};
use geetest_relay_storage::SeaOrmStorage;
use thiserror::Error;
use tracing::info;

use crate::{
    handlers::{
        fallback_handler, json_error_handler, metrics_handler, save_result_handler,
        solve_page_handler, status_handler,
    },
    state::AppState,
};

pub async fn run() -> Result<(), BootstrapError> {
    let config = ApiConfig::load_from_env()?;

    let telemetry_config = TelemetryConfig::from_env("API");
    let telemetry = init_telemetry(&telemetry_config)?;

    let storage = SeaOrmStorage::builder()
        .database_url(config.database_url())
        .build()
        .await?;

    let state = AppState::new(storage.clone(), telemetry);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(Logger::default())
            .route("/", web::get().to(status_handler))
            .route(
                "/geetest/{game}/{discord_id}/{gt}/{challenge}",
                web::get().to(solve_page_handler),
            )
            .route(
                "/geetest/{game}/{discord_id}",
                web::post().to(save_result_handler),
            )
            .route("/metrics", web::get().to(metrics_handler))
            .default_service(web::route().to(fallback_handler))
    })
    .bind(config.api_bind_address())?
    .run();

    info!(address = config.api_bind_address(), "relay listening");
    server.await?;

    // The server future resolves only once the worker drain has finished, so
    // no in-flight handler can still be borrowing a pooled connection here.
    storage.close().await?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("storage error: {0}")]
    Storage(#[from] geetest_relay_domain::storage::StorageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
