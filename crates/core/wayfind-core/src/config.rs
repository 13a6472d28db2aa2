//! Configuration management and environment variable loading

use crate::{Result, WayfindError};
use std::env;

/// Default acceptance threshold for semantic search (L2 distance).
///
/// Calibrated empirically against paraphrase-multilingual-mpnet-base-v2;
/// recalibrate via `WAYFIND_SEARCH_THRESHOLD` when switching models.
pub const DEFAULT_SEARCH_THRESHOLD: f32 = 1.052;

/// Default number of concurrent embedding workers
pub const DEFAULT_EMBEDDING_WORKERS: usize = 2;

/// Default timeout for a single embedding computation, in seconds
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Default bearer-token lifetime, in days
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// Load environment variables from a .env file
///
/// Safe to call multiple times (only loads once). Missing .env files are
/// not an error; the system environment is used as-is.
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(WayfindError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::warn!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(WayfindError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Get required environment variable
///
/// Returns an error if the variable is not set
pub fn get_required_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| {
        WayfindError::config(format!(
            "Required environment variable '{}' is not set. \
             Check your .env file or system environment.",
            key
        ))
    })
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as integer
pub fn get_env_int<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Get environment variable as float
pub fn get_env_float(key: &str, default: f32) -> f32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<f32>().ok())
        .unwrap_or(default)
}

/// Runtime configuration for the API server, assembled from the environment
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// PostgreSQL connection string
    pub database_url: String,
    /// Host to bind the HTTP listener to
    pub host: String,
    /// Port to bind the HTTP listener to
    pub port: u16,
    /// Secret used to sign bearer tokens
    pub jwt_secret: String,
    /// Bearer-token lifetime in days
    pub token_ttl_days: i64,
    /// L2-distance acceptance threshold for semantic search
    pub search_threshold: f32,
    /// Number of concurrent embedding workers
    pub embedding_workers: usize,
    /// Timeout for a single embedding computation, in seconds
    pub embedding_timeout_secs: u64,
    /// Sentence-embedding model name
    pub embedding_model: String,
}

impl ApiConfig {
    /// Assemble the configuration from environment variables.
    ///
    /// `DATABASE_URL` and `WAYFIND_JWT_SECRET` are required; everything
    /// else falls back to documented defaults.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: get_required_env("DATABASE_URL")?,
            host: get_env_or("WAYFIND_HOST", "0.0.0.0"),
            port: get_env_int("WAYFIND_PORT", 8000),
            jwt_secret: get_required_env("WAYFIND_JWT_SECRET")?,
            token_ttl_days: get_env_int("WAYFIND_TOKEN_TTL_DAYS", DEFAULT_TOKEN_TTL_DAYS),
            search_threshold: get_env_float("WAYFIND_SEARCH_THRESHOLD", DEFAULT_SEARCH_THRESHOLD),
            embedding_workers: get_env_int("WAYFIND_EMBEDDING_WORKERS", DEFAULT_EMBEDDING_WORKERS),
            embedding_timeout_secs: get_env_int(
                "WAYFIND_EMBEDDING_TIMEOUT_SECS",
                DEFAULT_EMBEDDING_TIMEOUT_SECS,
            ),
            embedding_model: get_env_or(
                "WAYFIND_EMBEDDING_MODEL",
                "paraphrase-multilingual-mpnet-base-v2",
            ),
        })
    }
}
