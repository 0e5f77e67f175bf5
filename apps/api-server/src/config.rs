//! Application configuration loaded from environment variables.

use std::env;

use blog_core::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use blog_infra::JwtConfig;
use blog_infra::database::DatabaseConfig;

/// Page size bounds for listings.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    fn from_env() -> Self {
        let max_page_size = env::var("MAX_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n: &u64| n >= 1)
            .unwrap_or(MAX_PAGE_SIZE);

        let default_page_size = env::var("DEFAULT_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n: &u64| n >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(max_page_size);

        Self {
            default_page_size,
            max_page_size,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub pagination: PaginationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            pagination: PaginationConfig::from_env(),
        }
    }
}
