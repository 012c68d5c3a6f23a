use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use common::utils::logging::{init_logging, LogFormat};
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::student::repo::seaorm::SeaOrmStudentRepository;

/// Browser clients of the API are not restricted to one origin.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load `config.toml` (or `CONFIG_PATH`) when present, otherwise env vars.
pub fn load_config() -> Result<AppConfig, StartupError> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = if Path::new(&path).exists() {
        AppConfig::load_and_validate()
    } else {
        AppConfig::from_env()
    };
    cfg.map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Install the subscriber selected by `[logging] format`.
pub fn init_logging_from(cfg: &AppConfig) {
    let format = cfg.logging.format.parse::<LogFormat>().unwrap_or_else(|e| {
        eprintln!("{e}; falling back to compact logs");
        LogFormat::Compact
    });
    init_logging(format);
}

/// `host:port` from `[server]`; already validated by the config loader.
fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// State backed by SeaORM on `db`.
pub fn build_state(db: DatabaseConnection) -> ServerState {
    ServerState::new(Arc::new(SeaOrmStudentRepository { db }))
}

/// Full router with CORS, tracing and the OpenAPI UI mounted.
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Resolves on Ctrl+C, or SIGTERM on unix. A listener that fails to install
/// never fires, so the other one still drives shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => { s.recv().await; }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

/// Public entry: load config, then build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = load_config()?;
    init_logging_from(&cfg);
    run_with(cfg).await
}

/// Run the server with an already loaded config until a shutdown signal.
pub async fn run_with(cfg: AppConfig) -> anyhow::Result<()> {
    // DB connection
    let db = models::db::connect_with_config(&models::db::DatabaseConfig::from(&cfg.database)).await?;

    // Schema: bring `students` up to date before accepting traffic
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    // Build router
    let app = build_app(build_state(db));

    // Bind and serve; in-flight requests finish before returning
    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting student records server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
