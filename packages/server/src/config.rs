use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// `postgres://...` for the SeaORM backend, `memory://` for the in-process one.
    pub url: String,
}

/// Page sizes used by list and profile views.
#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    /// Default page size of the permission list. Default: 15.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Upper bound for a client-supplied `per_page`. Default: 100.
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u64,
    /// Page size of the users/roles/groups lists on the profile view. Default: 10.
    #[serde(default = "default_profile_page_size")]
    pub profile_page_size: u64,
}

fn default_per_page() -> u64 {
    15
}
fn default_max_per_page() -> u64 {
    100
}
fn default_profile_page_size() -> u64 {
    10
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            max_per_page: default_max_per_page(),
            profile_page_size: default_profile_page_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("RBAC_ADMIN_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600_i64)?
            .set_default("listing.per_page", 15_i64)?
            .set_default("listing.max_per_page", 100_i64)?
            .set_default("listing.profile_page_size", 10_i64)?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., RBAC_ADMIN__DATABASE__URL)
            .add_source(Environment::with_prefix("RBAC_ADMIN").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
