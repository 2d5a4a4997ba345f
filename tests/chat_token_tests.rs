// SPDX-License-Identifier: MIT

//! Chat provider token route tests.

use axum::http::{Method, StatusCode};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use lingualink::services::chat::ProviderClaims;

mod common;

#[tokio::test]
async fn test_token_route_requires_session() {
    let (app, _) = common::create_test_app();

    let response = common::send(&app, Method::GET, "/api/chat/token", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_is_scoped_to_the_session_user() {
    let (app, state) = common::create_test_app();
    let (cookie, user_id) = common::signup(&app, "Mika", "mika@example.com", "hunter42").await;

    let response = common::send(&app, Method::GET, "/api/chat/token", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    let token = body["token"].as_str().expect("token field");

    // Verifiable with the provider secret, scoped to the caller
    let data = decode::<ProviderClaims>(
        token,
        &DecodingKey::from_secret(state.config.stream_api_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .expect("token should verify with the provider secret");

    assert_eq!(data.claims.user_id, user_id);
    assert!(data.claims.exp > data.claims.iat);
}

#[tokio::test]
async fn test_provider_token_is_not_a_session_token() {
    let (app, state) = common::create_test_app();
    let (cookie, _) = common::signup(&app, "Mika", "mika@example.com", "hunter42").await;

    let response = common::send(&app, Method::GET, "/api/chat/token", Some(&cookie), None).await;
    let body = common::body_json(response).await;
    let token = body["token"].as_str().unwrap();

    // Signed with the provider secret, not the session secret
    let result = decode::<ProviderClaims>(
        token,
        &DecodingKey::from_secret(&state.config.jwt_secret),
        &Validation::new(Algorithm::HS256),
    );
    assert!(result.is_err());
}
