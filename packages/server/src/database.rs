use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::repository::{
    MemoryPermissionRepository, PermissionRepository, SeaOrmPermissionRepository,
};

/// URL scheme selecting the in-process repository.
pub const MEMORY_URL_SCHEME: &str = "memory://";

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("rbac_admin::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Open the permission store named by `config.url`.
pub async fn connect_repository(
    config: &DatabaseConfig,
) -> Result<Arc<dyn PermissionRepository>, DbErr> {
    if config.url.starts_with(MEMORY_URL_SCHEME) {
        info!("Using in-memory permission repository");
        return Ok(Arc::new(MemoryPermissionRepository::new()));
    }

    let db = init_db(&config.url).await?;
    info!("Connected to database");
    Ok(Arc::new(SeaOrmPermissionRepository::new(db)))
}
