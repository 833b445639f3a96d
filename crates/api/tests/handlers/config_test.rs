use std::collections::HashMap;

use bookslot_api::config::ApiConfig;
use bookslot_core::engine::MeridiemPolicy;
use pretty_assertions::assert_eq;
use tracing::Level;

fn load(vars: &[(&str, &str)]) -> eyre::Result<ApiConfig> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ApiConfig::from_vars(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = load(&[("DATABASE_URL", "postgres://localhost/bookslot")]).unwrap();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert_eq!(config.server_addr(), "0.0.0.0:3000");
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.cors_origins, None);
    assert_eq!(config.request_timeout, 30);
    assert_eq!(config.timezone, chrono_tz::UTC);
    assert_eq!(config.meridiem_policy, MeridiemPolicy::Convert);
}

#[test]
fn test_overrides() {
    let config = load(&[
        ("DATABASE_URL", "postgres://localhost/bookslot"),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("LOG_LEVEL", "DEBUG"),
        ("API_CORS_ORIGINS", "http://localhost:5173, https://book.example.com,"),
        ("API_REQUEST_TIMEOUT_SECONDS", "5"),
        ("APP_TIMEZONE", "Europe/Berlin"),
        ("SCHEDULE_MERIDIEM_POLICY", "strip"),
    ])
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(
        config.cors_origins,
        Some(vec![
            "http://localhost:5173".to_string(),
            "https://book.example.com".to_string()
        ])
    );
    assert_eq!(config.request_timeout, 5);
    assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
    assert_eq!(config.meridiem_policy, MeridiemPolicy::StripLegacy);
}

#[test]
fn test_database_url_is_required() {
    let error = load(&[]).unwrap_err();

    assert!(error.to_string().contains("DATABASE_URL"));
}

#[test]
fn test_invalid_values_are_rejected() {
    let base = ("DATABASE_URL", "postgres://localhost/bookslot");

    assert!(load(&[base, ("API_PORT", "http")]).is_err());
    assert!(load(&[base, ("APP_TIMEZONE", "Mars/Olympus")]).is_err());
    assert!(load(&[base, ("SCHEDULE_MERIDIEM_POLICY", "guess")]).is_err());
}

#[test]
fn test_lenient_fallbacks() {
    let config = load(&[
        ("DATABASE_URL", "postgres://localhost/bookslot"),
        ("LOG_LEVEL", "verbose"),
        ("API_REQUEST_TIMEOUT_SECONDS", "soon"),
    ])
    .unwrap();

    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.request_timeout, 30);
}
