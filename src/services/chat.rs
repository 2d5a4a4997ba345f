// SPDX-License-Identifier: MIT

//! Chat provider client (Stream-compatible).
//!
//! Two responsibilities:
//! - Mint short-lived, user-scoped tokens the SPA hands to the provider's
//!   own SDK. Tokens are HS256 JWTs signed with the provider API secret;
//!   nothing is persisted.
//! - Upsert the user's chat profile with the provider at signup and
//!   onboarding so channels can render names and avatars.
//!
//! Message transport, presence, and call signaling all stay provider-side.

use crate::error::AppError;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "https://chat.stream-io-api.com";

/// Provider token lifetime: 24 hours.
pub const CHAT_TOKEN_TTL_SECS: usize = 24 * 60 * 60;

/// Claims for a user-scoped provider token.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderClaims {
    pub user_id: String,
    pub iat: usize,
    pub exp: usize,
}

/// Server-to-server claims for provider REST calls.
#[derive(Serialize)]
struct ServerClaims {
    server: bool,
    iat: usize,
}

/// User profile as the provider stores it.
#[derive(Debug, Clone, Serialize)]
pub struct ChatUserProfile {
    pub id: String,
    pub name: String,
    pub image: String,
}

/// Chat provider API client.
#[derive(Clone)]
pub struct ChatProvider {
    /// `None` in mock mode: tokens are still minted, HTTP calls are skipped.
    http: Option<reqwest::Client>,
    base_url: String,
    api_key: String,
    api_secret: String,
}

impl ChatProvider {
    /// Create a provider client with API credentials.
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            http: Some(reqwest::Client::new()),
            base_url: BASE_URL.to_string(),
            api_key,
            api_secret,
        }
    }

    /// Create a mock client for testing (no network).
    pub fn new_mock(api_key: String, api_secret: String) -> Self {
        Self {
            http: None,
            base_url: BASE_URL.to_string(),
            api_key,
            api_secret,
        }
    }

    fn now_secs() -> Result<usize, AppError> {
        Ok(SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Provider(format!("System time error: {}", e)))?
            .as_secs() as usize)
    }

    /// Mint a token granting `user_id` access to the chat service.
    ///
    /// The caller must already be authenticated; this trusts the id it is
    /// given and only scopes the credential.
    pub fn token_for(&self, user_id: &str) -> Result<String, AppError> {
        let now = Self::now_secs()?;

        let claims = ProviderClaims {
            user_id: user_id.to_string(),
            iat: now,
            exp: now + CHAT_TOKEN_TTL_SECS,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )
        .map_err(|e| AppError::Provider(format!("Token signing failed: {}", e)))
    }

    /// Register or update a user's chat profile with the provider.
    ///
    /// Callers treat failure as non-fatal: the account still works, the
    /// chat profile just lags until the next upsert.
    pub async fn upsert_user(&self, profile: &ChatUserProfile) -> Result<(), AppError> {
        let Some(http) = &self.http else {
            tracing::debug!(user_id = %profile.id, "Mock chat provider: skipping upsert");
            return Ok(());
        };

        let server_token = self.server_token()?;
        let url = format!("{}/users?api_key={}", self.base_url, self.api_key);

        let mut users = serde_json::Map::new();
        users.insert(
            profile.id.clone(),
            serde_json::to_value(profile)
                .map_err(|e| AppError::Provider(format!("Profile serialization failed: {}", e)))?,
        );
        let body = serde_json::json!({ "users": users });

        let response = http
            .post(&url)
            .header("Authorization", server_token)
            .header("stream-auth-type", "jwt")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "User upsert failed ({}): {}",
                status, detail
            )));
        }

        tracing::debug!(user_id = %profile.id, "Chat user upserted");
        Ok(())
    }

    /// Server-scoped JWT for the provider's REST API.
    fn server_token(&self) -> Result<String, AppError> {
        let claims = ServerClaims {
            server: true,
            iat: Self::now_secs()?,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )
        .map_err(|e| AppError::Provider(format!("Server token signing failed: {}", e)))
    }
}
