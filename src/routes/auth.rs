// SPDX-License-Identifier: MIT

//! Registration, login, logout, and onboarding routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::db::OnboardingProfile;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_session_jwt, CurrentUser, SESSION_COOKIE};
use crate::models::{User, UserResponse};
use crate::services::ChatUserProfile;
use crate::AppState;

/// Public auth routes (no session required).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

/// Auth routes behind the session verifier.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/onboarding", post(onboard))
        .route("/api/auth/me", get(me))
}

// ─── Requests / Responses ────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

// ─── Handlers ────────────────────────────────────────────────

/// Register a new account and open a session.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(CookieJar, (StatusCode, Json<AuthResponse>))> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(first_validation_message(&e)))?;

    if state
        .store
        .find_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "Email already exists, please use a different one".to_string(),
        ));
    }

    // Random avatar, same CDN and index range the SPA expects
    let avatar_idx = rand::thread_rng().gen_range(1..=100);
    let profile_pic = format!("https://avatar.iran.liara.run/public/{}.png", avatar_idx);

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(payload.email, password_hash, payload.full_name, profile_pic);

    state.store.insert_user(&user).await?;

    tracing::info!(user_id = %user.id, "New user registered");

    // Best effort: the account works even if the chat profile lags
    upsert_chat_profile(&state, &user).await;

    let jar = add_session_cookie(jar, &state, &user)?;

    Ok((
        jar,
        (
            StatusCode::CREATED,
            Json(AuthResponse {
                success: true,
                user: UserResponse::from(&user),
            }),
        ),
    ))
}

/// Authenticate with email + password and open a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    // Same rejection for unknown email and wrong password
    let user = state
        .store
        .find_user_by_email(&payload.email)
        .await?
        .ok_or(AppError::InvalidLogin)?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::InvalidLogin);
    }

    let jar = add_session_cookie(jar, &state, &user)?;

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            user: UserResponse::from(&user),
        }),
    ))
}

/// Close the session by clearing the cookie. Stateless on the server.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));

    (
        jar,
        Json(LogoutResponse {
            success: true,
            message: "Logout successful".to_string(),
        }),
    )
}

/// Complete the one-time onboarding profile.
async fn onboard(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<OnboardingRequest>,
) -> Result<Json<AuthResponse>> {
    let profile = validate_onboarding(payload)?;

    let user = state
        .store
        .complete_onboarding(&current.user.id, &profile)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, "Onboarding completed");

    upsert_chat_profile(&state, &user).await;

    Ok(Json(AuthResponse {
        success: true,
        user: UserResponse::from(&user),
    }))
}

/// Return the authenticated user.
async fn me(Extension(current): Extension<CurrentUser>) -> Json<AuthResponse> {
    Json(AuthResponse {
        success: true,
        user: UserResponse::from(&current.user),
    })
}

// ─── Helpers ─────────────────────────────────────────────────

/// All five onboarding fields are required; the rejection names the
/// missing ones so the SPA can highlight them.
fn validate_onboarding(payload: OnboardingRequest) -> Result<OnboardingProfile> {
    fn required(
        field: Option<String>,
        name: &'static str,
        missing: &mut Vec<&'static str>,
    ) -> String {
        match field {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        }
    }

    let mut missing = Vec::new();
    let profile = OnboardingProfile {
        full_name: required(payload.full_name, "fullName", &mut missing),
        bio: required(payload.bio, "bio", &mut missing),
        native_language: required(payload.native_language, "nativeLanguage", &mut missing),
        learning_language: required(payload.learning_language, "learningLanguage", &mut missing),
        location: required(payload.location, "location", &mut missing),
    };

    if missing.is_empty() {
        Ok(profile)
    } else {
        Err(AppError::BadRequest(format!(
            "All fields are required. Missing: {}",
            missing.join(", ")
        )))
    }
}

fn hash_password(password: &str) -> Result<String> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
    use argon2::Argon2;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use argon2::Argon2;

    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Sign a session JWT and attach it as the `jwt` cookie.
fn add_session_cookie(jar: CookieJar, state: &AppState, user: &User) -> Result<CookieJar> {
    let token = create_session_jwt(&user.id, &state.config.jwt_secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_max_age(time::Duration::days(7));
    cookie.set_secure(state.config.env.is_production());

    Ok(jar.add(cookie))
}

/// Push the user's profile to the chat provider, logging failures instead
/// of failing the request.
async fn upsert_chat_profile(state: &AppState, user: &User) {
    let profile = ChatUserProfile {
        id: user.id.to_hex(),
        name: user.full_name.clone(),
        image: user.profile_pic.clone(),
    };

    if let Err(e) = state.chat.upsert_user(&profile).await {
        tracing::warn!(user_id = %user.id, error = %e, "Chat profile upsert failed");
    }
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request".to_string())
}
