// libs/professional-cell/src/router.rs
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_storage::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn professional_routes(state: AppState) -> Router {
    // Catalog writes are admin-only via permissions; reads need a token too
    let protected_routes = Router::new()
        .route("/specialties", post(handlers::create_specialty))
        .route("/specialties", get(handlers::list_specialties))
        .route("/", post(handlers::create_professional))
        .route("/", get(handlers::list_professionals))
        .route("/{professional_id}", get(handlers::get_professional))
        .route("/{professional_id}/windows", post(handlers::create_window))
        .route("/{professional_id}/windows", get(handlers::list_windows))
        .route("/windows/{window_id}", get(handlers::get_window))
        .route("/windows/{window_id}", put(handlers::update_window))
        .route("/windows/{window_id}", delete(handlers::delete_window))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
