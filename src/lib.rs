// SPDX-License-Identifier: MIT

//! LinguaLink: backend API for a language-exchange social app.
//!
//! Users register, complete an onboarding profile, connect with partners
//! via friend requests, and chat through an external chat/video provider.
//! This crate owns the session verification, the friend-request state
//! machine, and provider token issuance; message transport, presence and
//! call signaling live entirely in the provider.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Store;
use services::ChatProvider;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub chat: ChatProvider,
}
