//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::warn;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};
use crate::compute::DEFAULT_MAX_CONCURRENT;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached predictions
    pub max_entries: usize,
    /// Lifetime of a cached prediction in seconds
    pub cache_ttl: u64,
    /// Maximum number of predictions computed at once
    pub max_concurrent: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Location of the model artifact
    pub model_path: PathBuf,
    /// Whether predictions are recorded to the datastore
    pub persist_enabled: bool,
    /// Location of the datastore credentials file
    pub persist_credentials: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first
    /// when present.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 60)
    /// - `MAX_CONCURRENT_PREDICTIONS` - Compute permits (default: 5)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `MODEL_PATH` - Model artifact (default: model.json)
    /// - `PERSIST_ENABLED` - "true" to record predictions (default: false)
    /// - `PERSIST_CREDENTIALS` - Credentials file (default: credentials.json)
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }

        let defaults = Self::default();
        Self {
            max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            max_concurrent: permit_count(parse_var("MAX_CONCURRENT_PREDICTIONS")),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            persist_enabled: env::var("PERSIST_ENABLED")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.persist_enabled),
            persist_credentials: env::var("PERSIST_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or(defaults.persist_credentials),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Permit count for the limiter. Zero would stall every cache miss and
/// anything above the semaphore maximum cannot be built, so both fall back
/// to the default.
fn permit_count(raw: Option<usize>) -> usize {
    match raw {
        None => DEFAULT_MAX_CONCURRENT,
        Some(permits) if permits == 0 || permits > Semaphore::MAX_PERMITS => {
            warn!(
                "MAX_CONCURRENT_PREDICTIONS={} is out of range (1..={}), using {}",
                permits,
                Semaphore::MAX_PERMITS,
                DEFAULT_MAX_CONCURRENT
            );
            DEFAULT_MAX_CONCURRENT
        }
        Some(permits) => permits,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            cache_ttl: DEFAULT_TTL_SECS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            server_port: 8000,
            cleanup_interval: 1,
            model_path: PathBuf::from("model.json"),
            persist_enabled: false,
            persist_credentials: PathBuf::from("credentials.json"),
        }
    }
}
