use anyhow::Context;
use tracing::{Level, info};

use rbac_admin::config::AppConfig;
use rbac_admin::database::connect_repository;
use rbac_admin::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let permissions = connect_repository(&config.database)
        .await
        .context("Failed to open permission store")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = rbac_admin::build_router(AppState {
        permissions,
        config,
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
