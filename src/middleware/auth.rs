// SPDX-License-Identifier: MIT

//! Session verification middleware.
//!
//! Resolves the signed session cookie to a `CurrentUser` and threads it
//! through request extensions as a typed authenticated context. Rejections
//! happen in a fixed order: missing cookie, bad signature/expiry, unknown
//! user. The store is only touched after the token checks out, so an
//! unauthenticated request never performs a lookup.

use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "jwt";

/// Session lifetime: 7 days.
pub const SESSION_TTL_SECS: usize = 7 * 24 * 60 * 60;

/// Session JWT claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user document ID, hex)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user resolved from the session cookie.
///
/// Handlers receive this via `Extension<CurrentUser>`; there is no other
/// channel for the caller's identity.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

/// Middleware that requires a valid session cookie.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AppError::Unauthenticated)?;

    let key = DecodingKey::from_secret(&state.config.jwt_secret);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(&token, &key, &validation).map_err(|_| AppError::InvalidCredential)?;

    let user_id = ObjectId::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::InvalidCredential)?;

    let user = state
        .store
        .find_user_by_id(&user_id)
        .await?
        .ok_or(AppError::UnknownUser)?;

    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}

/// Create a session JWT for a user.
pub fn create_session_jwt(user_id: &ObjectId, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_hex(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
