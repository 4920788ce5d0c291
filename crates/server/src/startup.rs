use std::{env, net::SocketAddr, path::Path};

use anyhow::Context;
use axum::Router;
use configs::{AppConfig, BootstrapAdmin, ServerConfig};
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use service::auth::domain::RegisterInput;
use service::auth::AuthConfig;

use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `CONFIG_PATH` (default `config.toml`) when the file exists, environment variables otherwise.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        AppConfig::load_and_validate().with_context(|| format!("loading {path}"))
    } else {
        debug!(%path, "no config file, using environment");
        AppConfig::from_env()
    }
}

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

pub fn auth_config(cfg: &AppConfig) -> AuthConfig {
    AuthConfig::new(cfg.auth.jwt_secret.clone()).with_ttl_hours(cfg.auth.token_ttl_hours)
}

async fn bootstrap_admin(state: &ServerState, admin: Option<&BootstrapAdmin>) -> anyhow::Result<()> {
    let Some(admin) = admin else { return Ok(()) };
    let input = RegisterInput {
        name: admin.name.clone(),
        email: admin.email.clone(),
        password: admin.password.clone(),
        address: admin.address.clone(),
    };
    match state.auth.ensure_admin(input).await.context("creating bootstrap administrator")? {
        Some(user) => info!(user_id = %user.id, email = %user.email, "bootstrap administrator created"),
        None => debug!(email = %admin.email, "bootstrap administrator already present"),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Connect, migrate, seed and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await.context("running migrations")?;

    let state = ServerState::with_database(db, auth_config(&cfg));
    bootstrap_admin(&state, cfg.auth.bootstrap_admin.as_ref()).await?;

    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, "starting store rating server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
