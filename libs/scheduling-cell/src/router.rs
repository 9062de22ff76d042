// libs/scheduling-cell/src/router.rs
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_storage::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn scheduling_routes(state: AppState) -> Router {
    // All scheduling operations require authentication
    let protected_routes = Router::new()
        .route(
            "/availability/{professional_id}/{date}",
            get(handlers::get_availability),
        )
        .route("/appointments", post(handlers::reserve_appointment))
        .route("/appointments", get(handlers::list_appointments))
        .route("/appointments/{appointment_id}", get(handlers::get_appointment))
        .route(
            "/appointments/{appointment_id}/status",
            patch(handlers::update_appointment_status),
        )
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
