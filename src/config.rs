//! Application configuration, resolved once at startup.
//!
//! Every environment variable the server consumes is read here and nowhere
//! else; request handlers receive the resolved values through shared state.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

/// Fallback signing secret used when `JWT_SECRET` is unset. Fine for local
/// development; `run()` refuses to start in production with this value.
pub const DEFAULT_JWT_SECRET: &str = "default-jwt-secret-change-in-production";

/// Stored profile name that marks a stale placeholder row. The profile GET
/// path deletes and recreates any row still carrying it (one-time shim).
pub const LEGACY_PROFILE_PLACEHOLDER: &str = "My Name";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub database_url: Option<String>,
    pub db_pool_max: u32,
    pub db_pool_min: u32,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub admin_username: String,
    pub admin_password: String,
    pub allowed_origins: Vec<String>,
    pub leetcode_api_url: String,
    /// Explicit log level; when unset the environment decides (debug in
    /// development, info in production).
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Resolve the full configuration from the environment, falling back to
    /// development defaults for anything unset.
    pub fn load() -> Self {
        Self {
            host: env_or("HOST", "127.0.0.1"),
            port: parse_or("PORT", 5000),
            environment: env_or("ENVIRONMENT", "development"),
            database_url: std::env::var("DATABASE_URL").ok(),
            db_pool_max: parse_or("DB_POOL_MAX", 10),
            db_pool_min: parse_or("DB_POOL_MIN", 2),
            jwt_secret: env_or("JWT_SECRET", DEFAULT_JWT_SECRET),
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", 24),
            admin_username: env_or("ADMIN_USERNAME", "admin"),
            admin_password: env_or("ADMIN_PASSWORD", "admin123"),
            allowed_origins: load_origins(),
            leetcode_api_url: env_or("LEETCODE_API_URL", "https://leetcode.com/graphql"),
            log_level: std::env::var("LOG_LEVEL").ok(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid {} value ({}), using default", key, e);
            default
        }),
        Err(_) => default,
    }
}

/// `ALLOWED_ORIGINS` is a comma-separated list; `FRONTEND_ORIGIN` is the
/// single-origin shorthand. With neither set, allow the local dev hosts.
fn load_origins() -> Vec<String> {
    if let Ok(raw) = std::env::var("ALLOWED_ORIGINS") {
        let origins: Vec<String> = raw
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if !origins.is_empty() {
            return origins;
        }
    }
    if let Ok(origin) = std::env::var("FRONTEND_ORIGIN") {
        if !origin.trim().is_empty() {
            return vec![origin.trim().to_string()];
        }
    }
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_has_sane_defaults() {
        let config = AppConfig::load();
        assert!(!config.host.is_empty());
        assert!(config.port > 0);
        assert!(config.db_pool_max >= 1);
        assert!(config.token_ttl_hours >= 1);
        assert!(!config.admin_username.is_empty());
        assert!(!config.allowed_origins.is_empty());
    }

    #[test]
    fn test_default_environment_is_not_production() {
        let config = AppConfig::load();
        assert!(!config.is_production());
    }
}
