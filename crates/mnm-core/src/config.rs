use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `GNEWS_API_KEY=` in a .env disables the source.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("MNM_ENV", "development"))?;

    let bind_addr = or_default("MNM_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "MNM_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;
    let log_level = or_default("MNM_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("MNM_REQUEST_TIMEOUT_SECS", "10")?;
    let source_deadline_secs = parse_u64("MNM_SOURCE_DEADLINE_SECS", "30")?;
    let user_agent = or_default("MNM_USER_AGENT", "mnm/0.1 (market-news-monitor)");

    let news_language = or_default("MNM_NEWS_LANGUAGE", "pt-BR");
    let news_country = or_default("MNM_NEWS_COUNTRY", "BR");

    let company_sites_path = optional("MNM_COMPANY_SITES_PATH").map(PathBuf::from);
    let disabled_sources = parse_list(&or_default("MNM_DISABLED_SOURCES", ""));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        request_timeout_secs,
        source_deadline_secs,
        user_agent,
        news_language,
        news_country,
        company_sites_path,
        disabled_sources,
        gnews_api_key: optional("GNEWS_API_KEY"),
        serp_api_key: optional("SERP_API_KEY"),
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MNM_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Split a comma-separated list, trimming and lower-casing each entry.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
