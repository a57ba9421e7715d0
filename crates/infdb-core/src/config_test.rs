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

/// Returns a map with the store credentials populated from parts.
fn parts_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("INFDB_DB_NAME", "influence");
    m.insert("INFDB_DB_USER", "app");
    m.insert("INFDB_DB_PASSWORD", "hunter2");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "INFDB_ENV"));
}

#[test]
fn build_app_config_requires_credentials_without_database_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "INFDB_DB_NAME"),
        "expected MissingEnvVar(INFDB_DB_NAME), got: {result:?}"
    );
}

#[test]
fn build_app_config_requires_password() {
    let mut map = parts_env();
    map.remove("INFDB_DB_PASSWORD");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "INFDB_DB_PASSWORD"),
        "expected MissingEnvVar(INFDB_DB_PASSWORD), got: {result:?}"
    );
}

#[test]
fn build_app_config_from_parts_uses_defaults() {
    let map = parts_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(
        cfg.store,
        StoreTarget::Parts {
            host: "localhost".to_string(),
            port: 5432,
            database: "influence".to_string(),
            user: "app".to_string(),
            password: "hunter2".to_string(),
        }
    );
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:50000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.db_min_connections, 1);
    assert_eq!(cfg.db_max_connections, 3);
    assert_eq!(cfg.db_acquire_timeout_secs, 60);
    assert_eq!(cfg.shutdown_grace_secs, 10);
}

#[test]
fn database_url_overrides_parts() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("DATABASE_URL", "postgres://app:pw@db:5433/influence");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(
        cfg.store,
        StoreTarget::Url("postgres://app:pw@db:5433/influence".to_string())
    );
}

#[test]
fn blank_database_url_falls_back_to_parts() {
    let mut map = parts_env();
    map.insert("DATABASE_URL", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert!(matches!(cfg.store, StoreTarget::Parts { .. }));
}

#[test]
fn invalid_port_is_rejected() {
    let mut map = parts_env();
    map.insert("INFDB_DB_PORT", "99999");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "INFDB_DB_PORT"),
        "expected InvalidEnvVar(INFDB_DB_PORT), got: {result:?}"
    );
}

#[test]
fn invalid_bind_addr_is_rejected() {
    let mut map = parts_env();
    map.insert("INFDB_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "INFDB_BIND_ADDR"),
        "expected InvalidEnvVar(INFDB_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn pool_overrides_are_parsed() {
    let mut map = parts_env();
    map.insert("INFDB_DB_MIN_CONNECTIONS", "2");
    map.insert("INFDB_DB_MAX_CONNECTIONS", "8");
    map.insert("INFDB_DB_ACQUIRE_TIMEOUT_SECS", "5");
    map.insert("INFDB_SHUTDOWN_GRACE_SECS", "30");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(cfg.db_min_connections, 2);
    assert_eq!(cfg.db_max_connections, 8);
    assert_eq!(cfg.db_acquire_timeout_secs, 5);
    assert_eq!(cfg.shutdown_grace_secs, 30);
}

#[test]
fn min_connections_above_max_is_rejected() {
    let mut map = parts_env();
    map.insert("INFDB_DB_MIN_CONNECTIONS", "5");
    map.insert("INFDB_DB_MAX_CONNECTIONS", "2");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "INFDB_DB_MIN_CONNECTIONS"),
        "expected InvalidEnvVar(INFDB_DB_MIN_CONNECTIONS), got: {result:?}"
    );
}

#[test]
fn zero_max_connections_is_rejected() {
    let mut map = parts_env();
    map.insert("INFDB_DB_MIN_CONNECTIONS", "0");
    map.insert("INFDB_DB_MAX_CONNECTIONS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "INFDB_DB_MAX_CONNECTIONS"),
        "expected InvalidEnvVar(INFDB_DB_MAX_CONNECTIONS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_password() {
    let map = parts_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("hunter2"), "password leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}
