use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, DatabaseBackend, DatabaseConfig, ServerConfig};
use dotenvy::dotenv;
use migration::MigratorTrait;
use tracing::{info, warn};

use crate::{cors, routes, state::ServerState};

/// Load host/port from the validated config
fn load_bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

/// Build the gateways named by `[database]` and hand them to the services.
pub async fn build_state(db_cfg: &DatabaseConfig) -> anyhow::Result<ServerState> {
    match db_cfg.backend {
        DatabaseBackend::Memory => {
            warn!("using in-memory gateway; data is lost on exit");
            Ok(ServerState::in_memory())
        }
        DatabaseBackend::Postgres => {
            // 连接数据库并执行迁移
            let db = models::db::connect_with_config(db_cfg).await?;
            migration::Migrator::up(&db, None).await?;
            info!("database connected and migrated");
            Ok(ServerState::seaorm(db))
        }
    }
}

/// Assemble the router for a config: gateways, services, CORS, routes.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = build_state(&cfg.database).await?;
    let cors = cors::build_layers(&cfg.cors)?;
    Ok(routes::build_router(state, cors))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; shutdown only by kill");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: load config, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();
    let cfg = AppConfig::load_or_env()?;
    run_with_config(cfg).await
}

/// Serve until Ctrl+C.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    let addr = load_bind_addr(&cfg.server)?;
    info!(%addr, backend = ?cfg.database.backend, "starting server");
    // 绑定端口并启动服务
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
