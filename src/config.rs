//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup into an explicit `Config` struct and
//! shared through `AppState`; nothing reads the process environment after
//! that point.

use std::env;

/// Deployment environment, selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == AppEnv::Production
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// MongoDB connection string
    pub mongodb_uri: String,
    /// Session JWT signing key (raw bytes)
    pub jwt_secret: Vec<u8>,
    /// Chat provider API key (public)
    pub stream_api_key: String,
    /// Chat provider API secret (signs provider tokens)
    pub stream_api_secret: String,
    /// Frontend origin for CORS
    pub frontend_url: String,
    /// Directory holding the built SPA bundle (served in production)
    pub static_dir: String,
    /// development | production
    pub env: AppEnv,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            mongodb_uri: env::var("MONGODB_URI").map_err(|_| ConfigError::Missing("MONGODB_URI"))?,
            jwt_secret: env::var("JWT_SECRET_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SECRET_KEY"))?
                .into_bytes(),
            stream_api_key: env::var("STREAM_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STREAM_API_KEY"))?,
            stream_api_secret: env::var("STREAM_API_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STREAM_API_SECRET"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "frontend/dist".to_string()),
            env: AppEnv::from_env(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 3000,
            mongodb_uri: "mongodb://localhost:27017/lingualink_test".to_string(),
            jwt_secret: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            stream_api_key: "test_stream_key".to_string(),
            stream_api_secret: "test_stream_secret_32_bytes_long".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            static_dir: "frontend/dist".to_string(),
            env: AppEnv::Development,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("MONGODB_URI", "mongodb://localhost:27017/lingualink");
        env::set_var("JWT_SECRET_KEY", "test_jwt_key_32_bytes_minimum!!!");
        env::set_var("STREAM_API_KEY", "key");
        env::set_var("STREAM_API_SECRET", "secret");
        env::remove_var("APP_ENV");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 3000);
        assert_eq!(config.stream_api_key, "key");
        assert_eq!(config.env, AppEnv::Development);
        assert!(!config.env.is_production());
    }

    #[test]
    fn test_default_is_development() {
        let config = Config::test_default();
        assert_eq!(config.env, AppEnv::Development);
    }
}
