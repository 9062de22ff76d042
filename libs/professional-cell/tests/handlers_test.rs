use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use professional_cell::router::professional_routes;
use shared_storage::AppState;
use shared_utils::test_utils::{
    seed_professional, seed_specialty, seed_window, test_app_state, JwtTestUtils, TestUser,
};

async fn seeded_state() -> (AppState, i64, i64) {
    let state = test_app_state();
    let store = state.store.as_ref();

    let specialty = seed_specialty(store, "Cardiologia").await;
    let professional =
        seed_professional(store, "Dra. Helena Prado", "CRM-11223", specialty.id).await;

    (state, specialty.id, professional.id)
}

fn app(state: &AppState) -> Router {
    professional_routes(state.clone())
}

fn bearer(state: &AppState, user: &TestUser) -> String {
    let token = JwtTestUtils::create_test_token(user, &state.config.jwt_secret, Some(24));
    format!("Bearer {}", token)
}

fn get_request(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, auth: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", auth)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_catalog_requires_auth() {
    let (state, _, _) = seeded_state().await;

    let request = Request::builder()
        .method("GET")
        .uri("/specialties")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_builds_catalog_end_to_end() {
    let state = test_app_state();
    let auth = bearer(&state, &TestUser::admin());

    let specialty = app(&state)
        .oneshot(json_request(
            "POST",
            "/specialties",
            &auth,
            json!({"name": "Dermatologia", "description": "Pele e anexos"}),
        ))
        .await
        .unwrap();
    assert_eq!(specialty.status(), StatusCode::CREATED);
    let specialty_id = body_json(specialty).await["id"].as_i64().unwrap();

    let professional = app(&state)
        .oneshot(json_request(
            "POST",
            "/",
            &auth,
            json!({
                "name": "Dr. Otávio Ramos",
                "license_number": "CRM-90210",
                "specialty_id": specialty_id,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(professional.status(), StatusCode::CREATED);
    let professional_id = body_json(professional).await["id"].as_i64().unwrap();

    let window = app(&state)
        .oneshot(json_request(
            "POST",
            &format!("/{}/windows", professional_id),
            &auth,
            json!({"day_of_week": 0, "start_time": "08:00", "end_time": "12:00"}),
        ))
        .await
        .unwrap();
    assert_eq!(window.status(), StatusCode::CREATED);
    let window_body = body_json(window).await;
    assert_eq!(window_body["day_of_week"], 0);
    assert_eq!(window_body["start_time"], "08:00");
    assert_eq!(window_body["slot_duration_minutes"], 15);

    let listed = app(&state)
        .oneshot(get_request(&format!("/{}/windows", professional_id), &auth))
        .await
        .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(body_json(listed).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bot_cannot_write_catalog() {
    let (state, specialty_id, professional_id) = seeded_state().await;
    let auth = bearer(&state, &TestUser::bot());

    let writes = [
        json_request("POST", "/specialties", &auth, json!({"name": "Nova"})),
        json_request(
            "POST",
            "/",
            &auth,
            json!({"name": "Dr. X", "license_number": "CRM-1", "specialty_id": specialty_id}),
        ),
        json_request(
            "POST",
            &format!("/{}/windows", professional_id),
            &auth,
            json!({"day_of_week": 0, "start_time": "08:00", "end_time": "12:00"}),
        ),
        empty_request("DELETE", "/windows/1", &auth),
    ];

    for request in writes {
        let response = app(&state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_bot_reads_catalog() {
    let (state, specialty_id, professional_id) = seeded_state().await;
    seed_window(state.store.as_ref(), professional_id, 0, (8, 0), (12, 0), 30).await;
    let auth = bearer(&state, &TestUser::bot());

    let specialties = app(&state)
        .oneshot(get_request("/specialties", &auth))
        .await
        .unwrap();
    assert_eq!(specialties.status(), StatusCode::OK);

    let filtered = app(&state)
        .oneshot(get_request(&format!("/?specialty_id={}", specialty_id), &auth))
        .await
        .unwrap();
    assert_eq!(filtered.status(), StatusCode::OK);
    assert_eq!(body_json(filtered).await.as_array().unwrap().len(), 1);

    let fetched = app(&state)
        .oneshot(get_request(&format!("/{}", professional_id), &auth))
        .await
        .unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(body_json(fetched).await["license_number"], "CRM-11223");

    let windows = app(&state)
        .oneshot(get_request(&format!("/{}/windows", professional_id), &auth))
        .await
        .unwrap();
    assert_eq!(windows.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_specialty_is_409() {
    let (state, _, _) = seeded_state().await;
    let auth = bearer(&state, &TestUser::admin());

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/specialties",
            &auth,
            json!({"name": "Cardiologia"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_professional_with_unknown_specialty_is_404() {
    let (state, _, _) = seeded_state().await;
    let auth = bearer(&state, &TestUser::admin());

    let response = app(&state)
        .oneshot(json_request(
            "POST",
            "/",
            &auth,
            json!({"name": "Dr. X", "license_number": "CRM-1", "specialty_id": 4242}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_windows_are_400() {
    let (state, _, professional_id) = seeded_state().await;
    let auth = bearer(&state, &TestUser::admin());
    let uri = format!("/{}/windows", professional_id);

    let bodies = [
        json!({"day_of_week": 7, "start_time": "08:00", "end_time": "12:00"}),
        json!({"day_of_week": 0, "start_time": "12:00", "end_time": "08:00"}),
        json!({"day_of_week": 0, "start_time": "08:00", "end_time": "08:00"}),
        json!({"day_of_week": 0, "start_time": "8h00", "end_time": "12:00"}),
        json!({"day_of_week": 0, "start_time": "08:00", "end_time": "12:00", "slot_duration_minutes": 5}),
        json!({"day_of_week": 0, "start_time": "08:00", "end_time": "12:00", "slot_duration_minutes": 180}),
    ];

    for body in bodies {
        let response = app(&state)
            .oneshot(json_request("POST", &uri, &auth, body.clone()))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "window body {} should be rejected",
            body
        );
    }
}

#[tokio::test]
async fn test_window_update_and_delete_flow() {
    let (state, _, professional_id) = seeded_state().await;
    let window =
        seed_window(state.store.as_ref(), professional_id, 0, (8, 0), (12, 0), 30).await;
    let auth = bearer(&state, &TestUser::admin());
    let uri = format!("/windows/{}", window.id);

    let updated = app(&state)
        .oneshot(json_request(
            "PUT",
            &uri,
            &auth,
            json!({"slot_duration_minutes": 20}),
        ))
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(body_json(updated).await["slot_duration_minutes"], 20);

    let deleted = app(&state)
        .oneshot(empty_request("DELETE", &uri, &auth))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = app(&state).oneshot(get_request(&uri, &auth)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
