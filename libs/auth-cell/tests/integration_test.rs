use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_cell::router::auth_routes;
use shared_utils::jwt;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn app() -> Router {
    auth_routes(TestConfig::default().to_arc())
}

fn token_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/token")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap()
}

fn validate_request(token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/validate")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_token_endpoint_issues_for_each_identity() {
    let secret = TestConfig::default().jwt_secret;

    for (username, password, role) in [
        ("admin", "admin-pass", "admin"),
        ("bot", "bot-pass", "bot"),
        ("device", "device-pass", "device"),
    ] {
        let response = app().oneshot(token_request(username, password)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "login failed for {}", username);

        let body = body_json(response).await;
        assert_eq!(body["token_type"], "bearer");
        assert_eq!(body["expires_in"], 2_592_000);

        let user = jwt::validate_token(body["access_token"].as_str().unwrap(), &secret).unwrap();
        assert_eq!(user.id, username);
        assert_eq!(user.role.as_deref(), Some(role));
    }
}

#[tokio::test]
async fn test_token_endpoint_rejects_bad_credentials() {
    for (username, password) in [("admin", "device-pass"), ("ghost", "admin-pass"), ("bot", "")] {
        let response = app().oneshot(token_request(username, password)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "expected rejection for {}/{}",
            username,
            password
        );

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid username or password");
    }
}

#[tokio::test]
async fn test_issued_token_passes_validate() {
    let app = app();

    let response = app
        .clone()
        .oneshot(token_request("bot", "bot-pass"))
        .await
        .unwrap();
    let token = body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.oneshot(validate_request(&token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["user_id"], "bot");
    assert_eq!(body["role"], "bot");
    assert_eq!(body["permissions"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_validate_requires_a_valid_bearer() {
    let no_header = Request::builder()
        .method("POST")
        .uri("/validate")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(no_header).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app().oneshot(validate_request("not-a-token")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let expired = JwtTestUtils::create_expired_token(
        &TestUser::bot(),
        &TestConfig::default().jwt_secret,
    );
    let response = app().oneshot(validate_request(&expired)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unsupported_methods() {
    let request = Request::builder()
        .method("GET")
        .uri("/token")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_nonexistent_routes() {
    let request = Request::builder()
        .method("POST")
        .uri("/nonexistent")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
