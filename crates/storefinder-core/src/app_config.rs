use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Dataset location and result caps. Shared by the CLI and the server.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub log_level: String,
    /// GeoJSON `FeatureCollection` loaded once at startup.
    pub dataset_path: PathBuf,
    /// Result cap applied when a search request does not name one.
    pub default_result_limit: usize,
    /// Upper bound for a caller-supplied result cap.
    pub max_result_limit: usize,
}

impl SearchConfig {
    /// Clamp a caller-supplied limit into `1..=max_result_limit`, falling back
    /// to the configured default when absent.
    #[must_use]
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_result_limit)
            .clamp(1, self.max_result_limit)
    }
}

/// Fixed-window request budget for the store routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub search: SearchConfig,
    pub rate_limit: RateLimitConfig,
}
