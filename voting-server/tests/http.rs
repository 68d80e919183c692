mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{FlakyStore, app_state, bearer};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use voting_server::http::{AppState, router};

fn app() -> (Router, AppState) {
    let state = app_state(&["alice", "bob"], Arc::new(FlakyStore::default()));
    (router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    credential: Option<String>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(credential) = credential {
        request = request.header(header::AUTHORIZATION, credential);
    }

    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

async fn create(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/sessions",
        Some(bearer("alice")),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["sessionID"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_returns_the_generated_id_and_pushes_it() {
    let (app, state) = app();
    let mut subscription = state.hub.subscribe();

    let id = create(&app, "Ship v2?").await;

    let frame: Value = serde_json::from_str(&subscription.try_next_frame().unwrap()).unwrap();
    assert_eq!(
        frame,
        json!({ "name": "Ship v2?", "id": id, "yesCount": [], "noCount": [] })
    );
}

#[tokio::test]
async fn vote_then_repeat_is_a_conflict() {
    let (app, _) = app();
    let id = create(&app, "Ship v2?").await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/sessions",
        Some(bearer("alice")),
        Some(json!({ "id": id, "vote": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["yesCount"], json!(["alice"]));

    let (status, body) = send(
        &app,
        "PATCH",
        "/sessions",
        Some(bearer("alice")),
        Some(json!({ "id": id, "vote": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);

    let (_, body) = send(&app, "GET", &format!("/sessions/{id}"), None, None).await;
    assert_eq!(body["yesCount"], json!(["alice"]));
    assert_eq!(body["noCount"], json!([]));
}

#[tokio::test]
async fn vote_by_path_records_a_no() {
    let (app, _) = app();
    let id = create(&app, "Lunch").await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/sessions/{id}"),
        Some(bearer("bob")),
        Some(json!({ "vote": false })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["noCount"], json!(["bob"]));
}

#[tokio::test]
async fn vote_without_credential_is_unauthorized_and_silent() {
    let (app, state) = app();
    let id = create(&app, "Lunch").await;
    let mut subscription = state.hub.subscribe();

    let (status, body) = send(
        &app,
        "PATCH",
        "/sessions",
        None,
        Some(json!({ "id": id, "vote": true })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let (status, _) = send(
        &app,
        "PATCH",
        "/sessions",
        Some(String::from("Token alice-token")),
        Some(json!({ "id": id, "vote": true })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(subscription.try_next_frame().is_none());
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let (app, _) = app();

    let (status, body) = send(&app, "GET", "/sessions/never-created", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, _) = send(
        &app,
        "PATCH",
        "/sessions",
        Some(bearer("alice")),
        Some(json!({ "id": "never-created", "vote": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        "POST",
        "/sessions",
        Some(bearer("alice")),
        Some(json!({ "title": "Lunch" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn list_is_public_and_ordered() {
    let (app, _) = app();
    let first = create(&app, "first").await;
    let second = create(&app, "second").await;

    let (status, body) = send(&app, "GET", "/sessions", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], first);
    assert_eq!(body[1]["id"], second);
}

#[tokio::test]
async fn account_routes_forward_to_the_identity_service() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "username": "alice", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "alice-token");

    let (status, _) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "carol", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration successful");

    let (status, _) = send(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "bob", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(
        &app,
        "POST",
        "/logout",
        None,
        Some(json!({ "username": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/logout",
        Some(bearer("alice")),
        Some(json!({ "username": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "logged out");
}
