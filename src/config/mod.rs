//! Configuration module for the opsboard backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for API authentication (required in production)
    pub api_token: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_token = env::var("OPSBOARD_API_TOKEN").ok();

        let db_path = env::var("OPSBOARD_DB_PATH")
            .unwrap_or_else(|_| "./data/opsboard.sqlite".to_string())
            .into();

        let bind_addr = env::var("OPSBOARD_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .expect("Invalid OPSBOARD_BIND_ADDR format");

        let log_level = env::var("OPSBOARD_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            api_token,
            db_path,
            bind_addr,
            log_level,
        }
    }
}
