use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration loaded from environment variables or TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path to the DuckDB database file. If not set, an in-memory
    /// database is used (data does not survive a restart).
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    /// Origin allowed to call the API cross-origin.
    /// If not set, all origins are allowed.
    #[serde(default)]
    pub allowed_origin: Option<String>,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8600
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: None,
            allowed_origin: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults.
    ///
    /// Environment variables override file values:
    /// - `ENCORE_HOST` → host
    /// - `ENCORE_PORT` → port
    /// - `ENCORE_DB_PATH` → db_path
    /// - `ENCORE_ALLOWED_ORIGIN` → allowed_origin
    /// - `ENCORE_REQUEST_TIMEOUT` → request_timeout_secs
    pub fn load(config_path: Option<&Path>) -> Self {
        let mut config =
            config_path.map_or_else(Self::default, |path| match std::fs::read_to_string(path) {
                Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                    tracing::warn!("Failed to parse config file: {e}, using defaults");
                    Self::default()
                }),
                Err(e) => {
                    tracing::warn!("Failed to read config file: {e}, using defaults");
                    Self::default()
                }
            });

        // Environment variable overrides
        if let Ok(host) = std::env::var("ENCORE_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("ENCORE_PORT") {
            if let Ok(p) = port.parse() {
                config.port = p;
            }
        }
        if let Ok(db_path) = std::env::var("ENCORE_DB_PATH") {
            config.db_path = Some(PathBuf::from(db_path));
        }
        if let Ok(origin) = std::env::var("ENCORE_ALLOWED_ORIGIN") {
            config.allowed_origin = Some(origin);
        }
        if let Ok(val) = std::env::var("ENCORE_REQUEST_TIMEOUT") {
            if let Ok(t) = val.parse() {
                config.request_timeout_secs = t;
            }
        }

        config
    }
}
