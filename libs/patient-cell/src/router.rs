// libs/patient-cell/src/router.rs
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_storage::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn patient_routes(state: AppState) -> Router {
    // All patient registry operations require authentication
    let protected_routes = Router::new()
        .route("/", post(handlers::create_patient))
        .route("/", get(handlers::list_patients))
        .route("/{patient_id}", get(handlers::get_patient))
        .route("/cpf/{cpf}", get(handlers::get_patient_by_cpf))
        .route("/{patient_id}/fingerprint", put(handlers::upload_fingerprint))
        .route("/{patient_id}/fingerprint", get(handlers::download_fingerprint))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
