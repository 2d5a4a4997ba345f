// SPDX-License-Identifier: MIT

//! Chat provider token route.

use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/chat/token", get(get_chat_token))
}

#[derive(Serialize)]
pub struct ChatTokenResponse {
    pub token: String,
}

/// Mint a provider token scoped to the authenticated user.
async fn get_chat_token(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ChatTokenResponse>> {
    let token = state.chat.token_for(&current.user.id.to_hex())?;
    Ok(Json(ChatTokenResponse { token }))
}
