//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::database::DatabaseConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub storage: StorageConfig,
}

/// Where uploaded files land on disk and how they are addressed publicly.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: String,
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        });

        let storage = StorageConfig {
            root: env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
        };

        Self {
            host,
            port,
            database,
            storage,
        }
    }
}
