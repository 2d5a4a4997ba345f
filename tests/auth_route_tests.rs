// SPDX-License-Identifier: MIT

//! Signup, login, logout, and onboarding flow tests.

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;

#[tokio::test]
async fn test_signup_sets_session_cookie() {
    let (app, _) = common::create_test_app();

    let response = common::send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "fullName": "Mika Tanaka",
            "email": "mika@example.com",
            "password": "hunter42",
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = common::session_cookie(&response).expect("jwt cookie should be set");
    assert!(cookie.starts_with("jwt="));

    // Full cookie attributes
    let raw = response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("jwt="))
        .unwrap()
        .to_string();
    assert!(raw.contains("HttpOnly"));
    assert!(raw.contains("SameSite=Strict"));
    assert!(raw.contains("Path=/"));
    assert!(!raw.contains("Secure"), "no Secure flag in development");

    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["fullName"], "Mika Tanaka");
    assert_eq!(body["user"]["isOnboarded"], false);
    assert!(body["user"]["profilePic"]
        .as_str()
        .unwrap()
        .starts_with("https://avatar.iran.liara.run/public/"));
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let (app, _) = common::create_test_app();

    let response = common::send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "fullName": "Mika",
            "email": "mika@example.com",
            "password": "12345",
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_signup_rejects_bad_email() {
    let (app, _) = common::create_test_app();

    let response = common::send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "fullName": "Mika",
            "email": "not-an-email",
            "password": "hunter42",
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email() {
    let (app, _) = common::create_test_app();
    common::signup(&app, "Mika", "mika@example.com", "hunter42").await;

    let response = common::send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "fullName": "Other Mika",
            "email": "mika@example.com",
            "password": "different42",
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(
        body["message"],
        "Email already exists, please use a different one"
    );
}

#[tokio::test]
async fn test_login_succeeds_with_correct_password() {
    let (app, _) = common::create_test_app();
    common::signup(&app, "Mika", "mika@example.com", "hunter42").await;

    let response = common::send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "mika@example.com", "password": "hunter42" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::session_cookie(&response).is_some());
    let body = common::body_json(response).await;
    assert_eq!(body["user"]["email"], "mika@example.com");
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_email_alike() {
    let (app, _) = common::create_test_app();
    common::signup(&app, "Mika", "mika@example.com", "hunter42").await;

    for payload in [
        json!({ "email": "mika@example.com", "password": "wrong-password" }),
        json!({ "email": "nobody@example.com", "password": "hunter42" }),
    ] {
        let response =
            common::send(&app, Method::POST, "/api/auth/login", None, Some(payload)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = common::body_json(response).await;
        assert_eq!(body["message"], "Invalid email or password");
    }
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (app, _) = common::create_test_app();
    let (cookie, _) = common::signup(&app, "Mika", "mika@example.com", "hunter42").await;

    let response = common::send(&app, Method::POST, "/api/auth/logout", Some(&cookie), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let raw = response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("jwt="))
        .expect("logout should clear the jwt cookie")
        .to_string();
    assert!(raw.contains("Max-Age=0"));
    assert!(raw.contains("Path=/"));

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Logout successful");
}

#[tokio::test]
async fn test_me_returns_authenticated_user() {
    let (app, _) = common::create_test_app();
    let (cookie, id) = common::signup(&app, "Mika", "mika@example.com", "hunter42").await;

    let response = common::send(&app, Method::GET, "/api/auth/me", Some(&cookie), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["user"]["id"], id);
    assert_eq!(body["user"]["fullName"], "Mika");
}

#[tokio::test]
async fn test_onboarding_requires_all_fields() {
    let (app, _) = common::create_test_app();
    let (cookie, _) = common::signup(&app, "Mika", "mika@example.com", "hunter42").await;

    let response = common::send(
        &app,
        Method::POST,
        "/api/auth/onboarding",
        Some(&cookie),
        Some(json!({ "fullName": "Mika", "bio": "hello" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("nativeLanguage"));
    assert!(message.contains("learningLanguage"));
    assert!(message.contains("location"));
}

#[tokio::test]
async fn test_onboarding_completes_profile() {
    let (app, _) = common::create_test_app();
    let (cookie, _) = common::signup(&app, "Mika", "mika@example.com", "hunter42").await;

    let response = common::send(
        &app,
        Method::POST,
        "/api/auth/onboarding",
        Some(&cookie),
        Some(json!({
            "fullName": "Mika Tanaka",
            "bio": "language nerd",
            "nativeLanguage": "japanese",
            "learningLanguage": "finnish",
            "location": "Tokyo",
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["user"]["isOnboarded"], true);
    assert_eq!(body["user"]["nativeLanguage"], "japanese");

    // The change is durable, not just echoed
    let me = common::send(&app, Method::GET, "/api/auth/me", Some(&cookie), None).await;
    let body = common::body_json(me).await;
    assert_eq!(body["user"]["isOnboarded"], true);
    assert_eq!(body["user"]["location"], "Tokyo");
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = common::create_offline_app();
    let response = common::send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
