// libs/checkin-cell/src/router.rs
use axum::{middleware, routing::get, Router};

use shared_storage::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn checkin_routes(state: AppState) -> Router {
    // Tokens carry patient identity, so minting requires authentication
    let protected_routes = Router::new()
        .route(
            "/token/{appointment_id}",
            get(handlers::mint_checkin_token),
        )
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
