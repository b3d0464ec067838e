//! Configuration module for the Ogiri backend.
//!
//! All configuration is loaded from environment variables (and an optional
//! `.env` file) with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Which store implementation backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process memory only; data is lost on restart.
    Memory,
    /// A JSON document rewritten on every mutation.
    JsonFile,
}

impl StoreBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Some(StoreBackend::Memory),
            "json" | "file" => Some(StoreBackend::JsonFile),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {0:?}")]
    InvalidBindAddr(String),
    #[error("invalid PORT {0:?}")]
    InvalidPort(String),
    #[error("unknown store backend {0:?} (expected \"memory\" or \"json\")")]
    UnknownBackend(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Store implementation
    pub store_backend: StoreBackend,
    /// Backing file for the JSON store
    pub data_file: PathBuf,
    /// Directory served for non-API paths, if any
    pub static_dir: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = match (lookup("OGIRI_BIND_ADDR"), lookup("PORT")) {
            (Some(addr), _) => addr
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr(addr))?,
            (None, Some(port)) => {
                let port: u16 = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
            (None, None) => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let store_backend = match lookup("OGIRI_STORE") {
            Some(value) => {
                StoreBackend::parse(&value).ok_or(ConfigError::UnknownBackend(value))?
            }
            None => StoreBackend::Memory,
        };

        let data_file = lookup("OGIRI_DATA_FILE")
            .unwrap_or_else(|| "./data/ogiri.json".to_string())
            .into();

        let static_dir = lookup("OGIRI_STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let log_level = lookup("OGIRI_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_json = lookup("OGIRI_LOG_JSON")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            store_backend,
            data_file,
            static_dir,
            log_level,
            log_json,
        })
    }
}
