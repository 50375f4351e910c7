use std::time::Duration;

use petitions_source::api::DEFAULT_BASE_URL;
use petitions_source::CacheConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Base URL of the petitions API.
    pub petitions_api_url: String,
    /// Per-request timeout for upstream calls in seconds (default: `10`).
    pub upstream_timeout_secs: u64,
    /// Fetch cache TTL in seconds (default: `30`).
    pub cache_ttl_secs: u64,
    /// Maximum number of cached upstream responses (default: `1024`).
    pub cache_max_entries: usize,
    /// Milestone sweep interval in seconds; `0` disables the sweep (default: `300`).
    pub milestone_check_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                          |
    /// |---------------------------------|----------------------------------|
    /// | `HOST`                          | `0.0.0.0`                        |
    /// | `PORT`                          | `5000`                           |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                             |
    /// | `SHUTDOWN_TIMEOUT_SECS`         | `30`                             |
    /// | `PETITIONS_API_URL`             | `https://petition.parliament.uk` |
    /// | `UPSTREAM_TIMEOUT_SECS`         | `10`                             |
    /// | `CACHE_TTL_SECS`                | `30`                             |
    /// | `CACHE_MAX_ENTRIES`             | `1024`                           |
    /// | `MILESTONE_CHECK_INTERVAL_SECS` | `300`                            |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let petitions_api_url =
            std::env::var("PETITIONS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_u64("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_u64("SHUTDOWN_TIMEOUT_SECS", 30),
            petitions_api_url,
            upstream_timeout_secs: env_u64("UPSTREAM_TIMEOUT_SECS", 10),
            cache_ttl_secs: env_u64("CACHE_TTL_SECS", 30),
            cache_max_entries: std::env::var("CACHE_MAX_ENTRIES")
                .unwrap_or_else(|_| "1024".into())
                .parse()
                .expect("CACHE_MAX_ENTRIES must be a valid usize"),
            milestone_check_interval_secs: env_u64("MILESTONE_CHECK_INTERVAL_SECS", 300),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(self.cache_ttl_secs),
            max_entries: self.cache_max_entries,
        }
    }

    /// Sweep interval, or `None` when the sweep is disabled.
    pub fn milestone_check_interval(&self) -> Option<Duration> {
        (self.milestone_check_interval_secs > 0)
            .then(|| Duration::from_secs(self.milestone_check_interval_secs))
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid u64")),
        Err(_) => default,
    }
}
