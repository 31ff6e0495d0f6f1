pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::handlers::permission;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RBAC Admin API",
        version = "1.0.0",
        description = "Administration of permissions and their role, group and user assignments"
    ),
    paths(
        permission::index,
        permission::create,
        permission::store,
        permission::edit,
        permission::update,
        permission::destroy,
        permission::submit_form,
        permission::list_roles,
        permission::list_groups,
        permission::list_users,
        permission::profile,
    ),
    tags(
        (name = "Permissions", description = "Permission CRUD pages"),
        (name = "Permission Relations", description = "Roles, groups and users holding a permission"),
    ),
)]
pub struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    routes::routes()
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(cors)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .max_age(Duration::from_secs(config.max_age))
}
