use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use log::{info, warn};
use std::sync::Arc;

use hearth_api::{app, config, routes::AppState};
use hearth_core::{
    InMemoryRevocationStore, RevocationStore, TokenCleanupConfig, TokenService, TokenServiceConfig,
};
use hearth_infra::RedisRevocationStore;
use hearth_shared::config::{AppConfig, RevocationBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load();

    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::new().default_filter_or(config.logging.level.as_str()))
        .format_module_path(config.logging.source_location)
        .init();

    info!("Starting Hearth API Server ({})", config.environment);
    for warning in config.security_warnings() {
        warn!("{}", warning);
    }

    let token_config = TokenServiceConfig::from_jwt_config(&config.auth.jwt)?;

    match config.auth.revocation.backend {
        RevocationBackend::Memory => {
            info!("Using in-memory revocation store");
            serve(config, Arc::new(InMemoryRevocationStore::new()), token_config).await
        }
        RevocationBackend::Redis => {
            info!("Using Redis revocation store");
            let store = RedisRevocationStore::connect(&config.cache, &config.auth.revocation).await?;
            serve(config, Arc::new(store), token_config).await
        }
    }
}

async fn serve<S: RevocationStore + 'static>(
    config: AppConfig,
    store: Arc<S>,
    token_config: TokenServiceConfig,
) -> anyhow::Result<()> {
    let token_service = Arc::new(TokenService::new(store, token_config)?);
    let state = web::Data::new(AppState::new(
        token_service,
        TokenCleanupConfig::from(&config.auth.revocation),
    ));

    let sweeper = Arc::clone(&state.cleanup_service).start_background_task();

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| app::configure(cfg, state))
            // Default 404 handler
            .default_service(web::route().to(|| async {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "not_found",
                    "message": "The requested resource was not found"
                }))
            }))
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    server.bind(&bind_address)?.run().await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }

    Ok(())
}
