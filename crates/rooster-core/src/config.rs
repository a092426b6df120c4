use std::env::VarError;
use std::net::SocketAddr;

use chrono_tz::Tz;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files, for tests
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every `ROOSTER_*` variable may also be supplied under the legacy name used
/// by older `.env` files (`EMAIL`, `PASSWORD`, `PHPSESSID`, `HEADERPATH`,
/// `LOGINPATH`, `PORT`). The `ROOSTER_*` name wins when both are set.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    // Empty values count as unset; `.env` files often carry `PHPSESSID=`.
    let optional = |var: &str, legacy: Option<&str>| -> Option<String> {
        std::iter::once(var)
            .chain(legacy)
            .filter_map(|key| lookup(key).ok())
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var, None).unwrap_or_else(|| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("ROOSTER_ENV", "development"))?;
    let bind_addr = parse_bind_addr(
        optional("ROOSTER_BIND_ADDR", None),
        optional("PORT", None),
    )?;
    let log_level = or_default("ROOSTER_LOG_LEVEL", "info");

    let portal_origin = or_default("ROOSTER_PORTAL_ORIGIN", "https://app.planning.nu");
    let login_path = optional("ROOSTER_LOGIN_PATH", Some("LOGINPATH"))
        .unwrap_or_else(|| "/diegrenze/login".to_string());
    let roster_path = optional("ROOSTER_ROSTER_PATH", Some("HEADERPATH"));
    let session_cookie = or_default("ROOSTER_SESSION_COOKIE", "PHPSESSID");
    let session_token = optional("ROOSTER_SESSION_TOKEN", Some("PHPSESSID"));
    let username = optional("ROOSTER_USERNAME", Some("EMAIL"));
    let password = optional("ROOSTER_PASSWORD", Some("PASSWORD"));
    let user_agent = or_default("ROOSTER_USER_AGENT", "rooster/0.1 (roster-sync)");

    let timezone = parse_timezone(&or_default("ROOSTER_TIMEZONE", "Europe/Amsterdam"))?;
    let fetch_deadline_secs = parse_u64("ROOSTER_FETCH_DEADLINE_SECS", "60")?;
    let rate_limit_per_minute = parse_usize("ROOSTER_RATE_LIMIT_PER_MINUTE", "30")?;

    if fetch_deadline_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ROOSTER_FETCH_DEADLINE_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    if rate_limit_per_minute == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ROOSTER_RATE_LIMIT_PER_MINUTE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        portal_origin,
        login_path,
        roster_path,
        session_cookie,
        session_token,
        username,
        password,
        user_agent,
        timezone,
        fetch_deadline_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ROOSTER_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Resolves the listen address. `ROOSTER_BIND_ADDR` is a full socket address;
/// the legacy `PORT` only carries a port and binds on all interfaces.
fn parse_bind_addr(
    bind_addr: Option<String>,
    port: Option<String>,
) -> Result<SocketAddr, ConfigError> {
    match (bind_addr, port) {
        (Some(raw), _) => raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "ROOSTER_BIND_ADDR".to_string(),
                reason: e.to_string(),
            }),
        (None, Some(raw)) => raw
            .parse::<u16>()
            .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "PORT".to_string(),
                reason: e.to_string(),
            }),
        (None, None) => Ok(SocketAddr::from(([0, 0, 0, 0], 3000))),
    }
}

fn parse_timezone(raw: &str) -> Result<Tz, ConfigError> {
    raw.parse::<Tz>().map_err(|e| ConfigError::InvalidEnvVar {
        var: "ROOSTER_TIMEZONE".to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
