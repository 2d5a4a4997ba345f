// SPDX-License-Identifier: MIT

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use lingualink::config::Config;
use lingualink::db::Store;
use lingualink::routes::create_router;
use lingualink::services::ChatProvider;
use lingualink::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app backed by the in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let chat = ChatProvider::new_mock(
        config.stream_api_key.clone(),
        config.stream_api_secret.clone(),
    );

    let state = Arc::new(AppState {
        config,
        store: Store::in_memory(),
        chat,
    });

    (create_router(state.clone()), state)
}

/// Create a test app whose store errors on any access.
#[allow(dead_code)]
pub fn create_offline_app() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let chat = ChatProvider::new_mock(
        config.stream_api_key.clone(),
        config.stream_api_secret.clone(),
    );

    let state = Arc::new(AppState {
        config,
        store: Store::offline(),
        chat,
    });

    (create_router(state.clone()), state)
}

/// Send a request with an optional JSON body and session cookie.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Read the response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Extract the `jwt=...` pair from the Set-Cookie header.
#[allow(dead_code)]
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("jwt="))
        .map(|v| v.split(';').next().unwrap().to_string())
}

/// Sign up a user, returning the session cookie and the user's id (hex).
#[allow(dead_code)]
pub async fn signup(app: &Router, name: &str, email: &str, password: &str) -> (String, String) {
    let response = send(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(serde_json::json!({
            "fullName": name,
            "email": email,
            "password": password,
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED, "signup should succeed");
    let cookie = session_cookie(&response).expect("signup should set the jwt cookie");
    let body = body_json(response).await;
    let id = body["user"]["id"].as_str().unwrap().to_string();
    (cookie, id)
}

/// Complete onboarding for a signed-in user so they show up in the
/// recommended-partners directory.
#[allow(dead_code)]
pub async fn onboard(app: &Router, cookie: &str, name: &str) {
    let response = send(
        app,
        Method::POST,
        "/api/auth/onboarding",
        Some(cookie),
        Some(serde_json::json!({
            "fullName": name,
            "bio": "learning languages",
            "nativeLanguage": "english",
            "learningLanguage": "finnish",
            "location": "Helsinki",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "onboarding should succeed");
}
