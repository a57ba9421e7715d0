use crate::app_config::{AppConfig, Environment, StoreTarget};
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
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing is decoupled from the real environment so tests can drive it with
/// a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
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

    let store = match lookup("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => StoreTarget::Url(url),
        _ => StoreTarget::Parts {
            host: or_default("INFDB_DB_HOST", "localhost"),
            port: parse_u16("INFDB_DB_PORT", "5432")?,
            database: require("INFDB_DB_NAME")?,
            user: require("INFDB_DB_USER")?,
            password: require("INFDB_DB_PASSWORD")?,
        },
    };

    let env = parse_environment(&or_default("INFDB_ENV", "development"))?;
    let bind_addr = parse_addr("INFDB_BIND_ADDR", "0.0.0.0:50000")?;
    let log_level = or_default("INFDB_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("INFDB_DB_MAX_CONNECTIONS", "3")?;
    let db_min_connections = parse_u32("INFDB_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("INFDB_DB_ACQUIRE_TIMEOUT_SECS", "60")?;
    let shutdown_grace_secs = parse_u64("INFDB_SHUTDOWN_GRACE_SECS", "10")?;

    if db_max_connections == 0 {
        return Err(invalid(
            "INFDB_DB_MAX_CONNECTIONS",
            "must be at least 1".to_string(),
        ));
    }
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "INFDB_DB_MIN_CONNECTIONS",
            format!("{db_min_connections} exceeds max connections {db_max_connections}"),
        ));
    }

    Ok(AppConfig {
        store,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        shutdown_grace_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "INFDB_ENV".to_string(),
            reason: format!("expected development, test, or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
