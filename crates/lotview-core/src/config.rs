use crate::app_config::{AppConfig, CsvLocation, Environment, SourceMode};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Load application configuration with `overrides` taking precedence over
/// both `.env` and the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_with_overrides(
    overrides: &[(&str, String)],
) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(overlay(overrides, |key| std::env::var(key)))
}

fn overlay<'a, F>(
    overrides: &'a [(&'a str, String)],
    lookup: F,
) -> impl Fn(&str) -> Result<String, std::env::VarError> + 'a
where
    F: Fn(&str) -> Result<String, std::env::VarError> + 'a,
{
    move |key| {
        overrides
            .iter()
            .find(|(var, _)| *var == key)
            .map_or_else(|| lookup(key), |(_, value)| Ok(value.clone()))
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("LOTVIEW_ENV", "development"))?;

    let bind_addr = or_default("LOTVIEW_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("LOTVIEW_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("LOTVIEW_LOG_LEVEL", "info");

    let source_mode = parse_source_mode(&or_default("LOTVIEW_SOURCE_MODE", "live"))?;
    let api_url = optional("LOTVIEW_API_URL");
    if source_mode == SourceMode::Live && api_url.is_none() {
        return Err(ConfigError::MissingEnvVar("LOTVIEW_API_URL".to_string()));
    }
    let csv_source = CsvLocation::parse(&or_default(
        "LOTVIEW_CSV_SOURCE",
        "./public/data/inventory.csv",
    ));
    let refresh_url = optional("LOTVIEW_REFRESH_URL");
    let refresh_secret = optional("LOTVIEW_REFRESH_SECRET");
    let dealer_name = or_default("LOTVIEW_DEALER_NAME", "Used Inventory");

    let request_timeout_secs = parse_u64("LOTVIEW_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("LOTVIEW_USER_AGENT", "lotview/0.1 (inventory-browser)");
    let max_retries = parse_u32("LOTVIEW_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("LOTVIEW_RETRY_BACKOFF_BASE_SECS", "1")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        source_mode,
        api_url,
        csv_source,
        refresh_url,
        refresh_secret,
        dealer_name,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LOTVIEW_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_source_mode(s: &str) -> Result<SourceMode, ConfigError> {
    match s {
        "live" | "api" => Ok(SourceMode::Live),
        "csv" => Ok(SourceMode::Csv),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LOTVIEW_SOURCE_MODE".to_string(),
            reason: format!("expected \"live\" or \"csv\", got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
