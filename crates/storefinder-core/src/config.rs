use std::env::VarError;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment, RateLimitConfig, SearchConfig};
use crate::ConfigError;

/// Load server configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load server configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load only the search settings, for callers that never bind a socket.
///
/// Loads `.env` like [`load_app_config`]. Server-only variables such as
/// `STOREFINDER_BIND_ADDR` are not read, so a bad value there is ignored.
///
/// # Errors
///
/// Returns `ConfigError` if a search setting is present but invalid.
pub fn load_search_config() -> Result<SearchConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_search_config(&|key: &str| std::env::var(key))
}

fn or_default<F>(lookup: &F, var: &str, default: &str) -> String
where
    F: Fn(&str) -> Result<String, VarError>,
{
    lookup(var).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, VarError>,
{
    or_default(lookup, var, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_positive<F>(lookup: &F, var: &str, default: &str) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let value: usize = parse_var(lookup, var, default)?;
    if value == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

fn build_search_config<F>(lookup: &F) -> Result<SearchConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let max_result_limit = parse_positive(lookup, "STOREFINDER_MAX_LIMIT", "50")?;
    let default_result_limit: usize = parse_var(lookup, "STOREFINDER_DEFAULT_LIMIT", "8")?;
    if default_result_limit == 0 || default_result_limit > max_result_limit {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_DEFAULT_LIMIT".to_string(),
            reason: format!("must be between 1 and {max_result_limit}"),
        });
    }

    Ok(SearchConfig {
        log_level: or_default(lookup, "STOREFINDER_LOG_LEVEL", "info"),
        dataset_path: or_default(lookup, "STOREFINDER_DATASET_PATH", "./data/steder.geojson")
            .into(),
        default_result_limit,
        max_result_limit,
    })
}

/// Build server configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let env = parse_environment(&or_default(&lookup, "STOREFINDER_ENV", "development"));
    let bind_addr = parse_var(&lookup, "STOREFINDER_BIND_ADDR", "0.0.0.0:3000")?;
    let search = build_search_config(&lookup)?;

    let max_requests = parse_positive(&lookup, "STOREFINDER_RATE_LIMIT_REQUESTS", "120")?;
    let window_secs: u64 = parse_var(&lookup, "STOREFINDER_RATE_LIMIT_WINDOW_SECS", "60")?;
    if window_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_RATE_LIMIT_WINDOW_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        search,
        rate_limit: RateLimitConfig {
            max_requests,
            window: std::time::Duration::from_secs(window_secs),
        },
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
