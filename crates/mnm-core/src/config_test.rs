use std::collections::HashMap;
use std::env::VarError;

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

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
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
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "MNM_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.source_deadline_secs, 30);
    assert_eq!(cfg.user_agent, "mnm/0.1 (market-news-monitor)");
    assert_eq!(cfg.news_language, "pt-BR");
    assert_eq!(cfg.news_country, "BR");
    assert!(cfg.company_sites_path.is_none());
    assert!(cfg.disabled_sources.is_empty());
    assert!(cfg.gnews_api_key.is_none());
    assert!(cfg.serp_api_key.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("MNM_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MNM_BIND_ADDR"),
        "expected InvalidEnvVar(MNM_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("MNM_REQUEST_TIMEOUT_SECS", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 25);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("MNM_REQUEST_TIMEOUT_SECS", "ten");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MNM_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(MNM_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn source_deadline_rejects_zero() {
    let mut map = HashMap::new();
    map.insert("MNM_SOURCE_DEADLINE_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MNM_SOURCE_DEADLINE_SECS"),
        "expected InvalidEnvVar(MNM_SOURCE_DEADLINE_SECS), got: {result:?}"
    );
}

#[test]
fn api_keys_are_read_when_present() {
    let mut map = HashMap::new();
    map.insert("GNEWS_API_KEY", "gnews-token");
    map.insert("SERP_API_KEY", " serp-token ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.gnews_api_key.as_deref(), Some("gnews-token"));
    assert_eq!(cfg.serp_api_key.as_deref(), Some("serp-token"));
}

#[test]
fn blank_api_key_counts_as_unset() {
    let mut map = HashMap::new();
    map.insert("GNEWS_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.gnews_api_key.is_none());
}

#[test]
fn disabled_sources_are_split_and_lowercased() {
    let mut map = HashMap::new();
    map.insert("MNM_DISABLED_SOURCES", "Publisher_Feed, ,social_search");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.disabled_sources, vec!["publisher_feed", "social_search"]);
}

#[test]
fn debug_output_redacts_api_keys() {
    let mut map = HashMap::new();
    map.insert("SERP_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn company_sites_path_is_optional() {
    let mut map = HashMap::new();
    map.insert("MNM_COMPANY_SITES_PATH", "./config/sites.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.company_sites_path.as_deref(),
        Some(std::path::Path::new("./config/sites.yaml"))
    );
}
