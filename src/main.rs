// SPDX-License-Identifier: MIT

//! LinguaLink API Server
//!
//! Backend for a language-exchange social app: accounts and onboarding,
//! friend requests, and token issuance for the external chat provider.

use lingualink::{config::Config, db::Store, services::ChatProvider, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, env = ?config.env, "Starting LinguaLink API");

    // Connect to MongoDB
    let store = Store::connect(&config.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");

    // Chat provider client
    let chat = ChatProvider::new(
        config.stream_api_key.clone(),
        config.stream_api_secret.clone(),
    );
    tracing::info!("Chat provider client initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        chat,
    });

    // Build router
    let app = lingualink::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lingualink=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
