use std::{net::SocketAddr, sync::Arc};

use axum::http::HeaderValue;
use configs::{AppConfig, CorsConfig, ServerConfig, StorageBackend, StorageConfig};
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::info;

use common::utils::logging::init_logging_from_env;
use service::{
    pagination::PageLimits,
    runtime,
    stock::{SeaOrmStockStore, StockService, StockStore},
    storage::{JsonStockStore, MemoryStockStore},
};

use crate::errors::StartupError;
use crate::routes;

/// Explicit origins get credentials; an empty list falls back to permissive CORS.
pub fn build_cors(cfg: &CorsConfig) -> Result<CorsLayer, StartupError> {
    if cfg.allowed_origins.is_empty() {
        return Ok(CorsLayer::very_permissive());
    }
    let origins = cfg
        .allowed_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|_| StartupError::InvalidConfig(format!("bad cors origin: {o}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

pub fn page_limits(cfg: &StorageConfig) -> PageLimits {
    PageLimits { default_limit: cfg.default_page_size, max_limit: cfg.max_page_size }
}

fn bind_addr(cfg: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}:{}: {e}", cfg.host, cfg.port)))
}

async fn serve<S: StockStore>(
    server: &ServerConfig,
    store: Arc<S>,
    limits: PageLimits,
    cors: CorsLayer,
) -> anyhow::Result<()> {
    let backend = store.backend();
    let svc = Arc::new(StockService::with_limits(store, limits));
    let app = routes::build_router(svc, cors);

    let addr = bind_addr(server)?;
    info!(%addr, backend, event = "listen", "starting stock api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
        })
        .await?;
    Ok(())
}

/// Public entry: load configuration, open the selected store and run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let cors = build_cors(&cfg.cors)?;
    let limits = page_limits(&cfg.storage);
    info!(backend = cfg.storage.backend.as_str(), "storage backend selected");

    match cfg.storage.backend {
        StorageBackend::Json => {
            runtime::ensure_data_dir(&cfg.storage.json_path).await?;
            let store = JsonStockStore::open(&cfg.storage.json_path)
                .await
                .map_err(StartupError::from)?;
            serve(&cfg.server, store, limits, cors).await
        }
        StorageBackend::Database => {
            let db = models::db::connect_with_config(&(&cfg.database).into()).await?;
            migration::Migrator::up(&db, None).await?;
            info!(event = "migrations_applied", "stocks schema up to date");
            serve(&cfg.server, Arc::new(SeaOrmStockStore::new(db)), limits, cors).await
        }
        StorageBackend::Memory => serve(&cfg.server, Arc::new(MemoryStockStore::new()), limits, cors).await,
    }
}
