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

/// Returns a map with a roster path and login credentials populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("ROOSTER_ROSTER_PATH", "/diegrenze/rooster");
    m.insert("ROOSTER_USERNAME", "jan@example.com");
    m.insert("ROOSTER_PASSWORD", "hunter2");
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
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "ROOSTER_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.portal_origin, "https://app.planning.nu");
    assert_eq!(cfg.login_path, "/diegrenze/login");
    assert!(cfg.roster_path.is_none());
    assert_eq!(cfg.session_cookie, "PHPSESSID");
    assert!(cfg.session_token.is_none());
    assert!(cfg.username.is_none());
    assert!(cfg.password.is_none());
    assert_eq!(cfg.user_agent, "rooster/0.1 (roster-sync)");
    assert_eq!(cfg.timezone, chrono_tz::Europe::Amsterdam);
    assert_eq!(cfg.fetch_deadline_secs, 60);
    assert_eq!(cfg.rate_limit_per_minute, 30);
}

#[test]
fn build_app_config_reads_portal_settings() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.roster_path.as_deref(), Some("/diegrenze/rooster"));
    assert_eq!(cfg.username.as_deref(), Some("jan@example.com"));
    assert_eq!(cfg.password.as_deref(), Some("hunter2"));
}

#[test]
fn build_app_config_accepts_legacy_names() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("EMAIL", "legacy@example.com");
    map.insert("PASSWORD", "legacy-pass");
    map.insert("PHPSESSID", "abc123");
    map.insert("HEADERPATH", "/legacy/rooster");
    map.insert("LOGINPATH", "/legacy/login/");
    map.insert("PORT", "8080");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.username.as_deref(), Some("legacy@example.com"));
    assert_eq!(cfg.password.as_deref(), Some("legacy-pass"));
    assert_eq!(cfg.session_token.as_deref(), Some("abc123"));
    assert_eq!(cfg.roster_path.as_deref(), Some("/legacy/rooster"));
    assert_eq!(cfg.login_path, "/legacy/login/");
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
}

#[test]
fn build_app_config_prefers_rooster_names_over_legacy() {
    let mut map = full_env();
    map.insert("EMAIL", "legacy@example.com");
    map.insert("ROOSTER_BIND_ADDR", "127.0.0.1:4000");
    map.insert("PORT", "8080");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.username.as_deref(), Some("jan@example.com"));
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:4000");
}

#[test]
fn build_app_config_treats_blank_values_as_unset() {
    let mut map = full_env();
    map.insert("ROOSTER_SESSION_TOKEN", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.session_token.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("ROOSTER_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ROOSTER_BIND_ADDR"),
        "expected InvalidEnvVar(ROOSTER_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_port() {
    let mut map = full_env();
    map.insert("PORT", "eighty");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PORT"),
        "expected InvalidEnvVar(PORT), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_unknown_timezone() {
    let mut map = full_env();
    map.insert("ROOSTER_TIMEZONE", "Europe/Atlantis");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ROOSTER_TIMEZONE"),
        "expected InvalidEnvVar(ROOSTER_TIMEZONE), got: {result:?}"
    );
}

#[test]
fn build_app_config_fetch_deadline_override() {
    let mut map = full_env();
    map.insert("ROOSTER_FETCH_DEADLINE_SECS", "15");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.fetch_deadline_secs, 15);
}

#[test]
fn build_app_config_fetch_deadline_rejects_zero() {
    let mut map = full_env();
    map.insert("ROOSTER_FETCH_DEADLINE_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ROOSTER_FETCH_DEADLINE_SECS"),
        "expected InvalidEnvVar(ROOSTER_FETCH_DEADLINE_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rate_limit_invalid() {
    let mut map = full_env();
    map.insert("ROOSTER_RATE_LIMIT_PER_MINUTE", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ROOSTER_RATE_LIMIT_PER_MINUTE"),
        "expected InvalidEnvVar(ROOSTER_RATE_LIMIT_PER_MINUTE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rate_limit_rejects_zero() {
    let mut map = full_env();
    map.insert("ROOSTER_RATE_LIMIT_PER_MINUTE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ROOSTER_RATE_LIMIT_PER_MINUTE"),
        "expected InvalidEnvVar(ROOSTER_RATE_LIMIT_PER_MINUTE), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_on_invalid_rooster_env() {
    let mut map = full_env();
    map.insert("ROOSTER_ENV", "producton");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ROOSTER_ENV"),
        "expected InvalidEnvVar(ROOSTER_ENV), got: {result:?}"
    );
}

#[test]
fn app_config_debug_redacts_secrets() {
    let mut map = full_env();
    map.insert("ROOSTER_SESSION_TOKEN", "very-secret-token");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("hunter2"), "password leaked: {rendered}");
    assert!(
        !rendered.contains("very-secret-token"),
        "session token leaked: {rendered}"
    );
    assert!(rendered.contains("[redacted]"));
}
