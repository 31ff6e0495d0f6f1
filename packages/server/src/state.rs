use std::sync::Arc;

use crate::config::AppConfig;
use crate::repository::PermissionRepository;

#[derive(Clone)]
pub struct AppState {
    pub permissions: Arc<dyn PermissionRepository>,
    pub config: AppConfig,
}
