use actix_web::{web, HttpServer};
use std::sync::Arc;
use tracing::info;

use wd_api::app::create_app;
use wd_api::routes::lockout::AppState;
use wd_api::telemetry::init_tracing;
use wd_core::services::AuthenticationLockout;
use wd_infra::{load_config, RedisClient, RedisLockoutStorage};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.logging)?;

    info!(environment = %config.environment, "Starting Warden API Server");

    let client = RedisClient::new(config.cache.clone()).await?;
    if !client.health_check().await? {
        anyhow::bail!("Redis health check failed");
    }

    let storage = Arc::new(RedisLockoutStorage::new(&client));
    let lockout = AuthenticationLockout::from_storage(config.lockout.clone(), storage);
    let state = web::Data::new(AppState::new(lockout));

    let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = match std::env::var("SERVER_PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("SERVER_PORT must be a valid port number: {}", e))?,
        Err(_) => 8080,
    };

    info!("Server will bind to: {}:{}", host, port);

    HttpServer::new(move || create_app(state.clone()))
        .bind((host.as_str(), port))?
        .run()
        .await?;

    Ok(())
}
