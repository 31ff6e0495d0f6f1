use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

/// Root of the permission administration pages.
pub const PERMISSIONS_PATH: &str = "/permissions";

pub fn permission_path(id: i32) -> String {
    format!("{PERMISSIONS_PATH}/{id}")
}

pub fn routes() -> Router<AppState> {
    Router::new().nest(PERMISSIONS_PATH, permission_routes())
}

fn permission_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::permission::index).post(handlers::permission::store),
        )
        .route("/create", get(handlers::permission::create))
        .route(
            "/{id}",
            get(handlers::permission::profile)
                .post(handlers::permission::submit_form)
                .put(handlers::permission::update)
                .patch(handlers::permission::update)
                .delete(handlers::permission::destroy),
        )
        .route("/{id}/edit", get(handlers::permission::edit))
        .route("/{id}/roles", get(handlers::permission::list_roles))
        .route("/{id}/groups", get(handlers::permission::list_groups))
        .route("/{id}/users", get(handlers::permission::list_users))
}
