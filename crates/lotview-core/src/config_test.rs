use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with the live source configured.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("LOTVIEW_API_URL", "https://inventory.example.com/api/scrape");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "LOTVIEW_ENV"));
}

#[test]
fn build_app_config_fails_without_api_url_in_live_mode() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "LOTVIEW_API_URL"),
        "expected MissingEnvVar(LOTVIEW_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_csv_mode_needs_no_api_url() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("LOTVIEW_SOURCE_MODE", "csv");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.source_mode, SourceMode::Csv);
    assert!(cfg.api_url.is_none());
}

#[test]
fn build_app_config_blank_api_url_counts_as_missing() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("LOTVIEW_API_URL", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_fails_with_invalid_source_mode() {
    let mut map = full_env();
    map.insert("LOTVIEW_SOURCE_MODE", "scrape");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOTVIEW_SOURCE_MODE"),
        "expected InvalidEnvVar(LOTVIEW_SOURCE_MODE), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("LOTVIEW_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOTVIEW_BIND_ADDR"),
        "expected InvalidEnvVar(LOTVIEW_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.source_mode, SourceMode::Live);
    assert_eq!(
        cfg.api_url.as_deref(),
        Some("https://inventory.example.com/api/scrape")
    );
    assert_eq!(
        cfg.csv_source,
        CsvLocation::Path(PathBuf::from("./public/data/inventory.csv"))
    );
    assert!(cfg.refresh_url.is_none());
    assert!(cfg.refresh_secret.is_none());
    assert_eq!(cfg.dealer_name, "Used Inventory");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "lotview/0.1 (inventory-browser)");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_secs, 1);
}

#[test]
fn csv_source_url_is_detected() {
    let mut map = full_env();
    map.insert("LOTVIEW_CSV_SOURCE", "https://cdn.example.com/inventory.csv");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.csv_source,
        CsvLocation::Url("https://cdn.example.com/inventory.csv".to_string())
    );
}

#[test]
fn request_timeout_secs_override() {
    let mut map = full_env();
    map.insert("LOTVIEW_REQUEST_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 60);
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = full_env();
    map.insert("LOTVIEW_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOTVIEW_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(LOTVIEW_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_invalid() {
    let mut map = full_env();
    map.insert("LOTVIEW_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOTVIEW_MAX_RETRIES"),
        "expected InvalidEnvVar(LOTVIEW_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn refresh_secret_is_redacted_in_debug() {
    let mut map = full_env();
    map.insert("LOTVIEW_REFRESH_URL", "https://inventory.example.com/api/trigger-scrape");
    map.insert("LOTVIEW_REFRESH_SECRET", "hunter2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.refresh_secret.as_deref(), Some("hunter2"));
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("[redacted]"));
}

#[test]
fn overrides_take_precedence_over_lookup() {
    let mut map = full_env();
    map.insert("LOTVIEW_SOURCE_MODE", "live");
    map.insert("LOTVIEW_DEALER_NAME", "Northside Motors");
    let overrides = [("LOTVIEW_SOURCE_MODE", "csv".to_string())];
    let cfg = build_app_config(overlay(&overrides, lookup_from_map(&map))).unwrap();
    assert_eq!(cfg.source_mode, SourceMode::Csv);
    assert_eq!(cfg.dealer_name, "Northside Motors");
}

#[test]
fn csv_override_lifts_api_url_requirement() {
    let map: HashMap<&str, &str> = HashMap::new();
    let overrides = [("LOTVIEW_SOURCE_MODE", "csv".to_string())];
    let cfg = build_app_config(overlay(&overrides, lookup_from_map(&map))).unwrap();
    assert_eq!(cfg.source_mode, SourceMode::Csv);
}

#[test]
fn only_production_hides_error_details() {
    let mut map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.exposes_error_details());

    map.insert("LOTVIEW_ENV", "production");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.exposes_error_details());
}
